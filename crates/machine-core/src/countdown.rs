//! Cosmetic countdown to the next tick.
//!
//! The runner publishes a [`CycleWindow`] on a `watch` channel at the start
//! of every cycle and `None` while the clock is stopped. Renderers read it at
//! their own frame rate; nothing here feeds back into the simulation.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// The cycle currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWindow {
    /// When the cycle began.
    pub started_at: Instant,
    /// Period latched for this cycle.
    pub period: Duration,
}

impl CycleWindow {
    /// Open a window starting now.
    pub fn starting_now(period: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            period,
        }
    }

    /// When the cycle's tick fires.
    pub fn deadline(&self) -> Instant {
        self.started_at
            .checked_add(self.period)
            .unwrap_or(self.started_at)
    }

    /// Time left until the tick at `now`, zero once it is due.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.deadline().saturating_duration_since(now)
    }

    /// Fraction of the cycle elapsed at `now`, in `[0, 1]`.
    pub fn progress_at(&self, now: Instant) -> f64 {
        if self.period.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.period.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Sender side held by the runner.
pub type CountdownSender = watch::Sender<Option<CycleWindow>>;

/// Receiver side handed to renderers.
pub type CountdownReceiver = watch::Receiver<Option<CycleWindow>>;

/// Create a countdown channel with no cycle in flight.
pub fn channel() -> (CountdownSender, CountdownReceiver) {
    watch::channel(None)
}

/// Render a fixed-width progress bar such as `[#####-----] 1.0s`.
pub fn render_bar(window: &CycleWindow, now: Instant, width: usize) -> String {
    let progress = window.progress_at(now);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((progress * width as f64).round() as usize).min(width);
    let remaining = window.remaining_at(now).as_secs_f64();
    format!(
        "[{}{}] {remaining:.1}s",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn progress_tracks_elapsed_time() {
        let window = CycleWindow::starting_now(Duration::from_millis(2_000));
        let start = window.started_at;

        assert!((window.progress_at(start) - 0.0).abs() < f64::EPSILON);
        assert_eq!(window.remaining_at(start), Duration::from_millis(2_000));

        let half = start + Duration::from_millis(1_000);
        assert!((window.progress_at(half) - 0.5).abs() < 1e-9);
        assert_eq!(window.remaining_at(half), Duration::from_millis(1_000));

        let late = start + Duration::from_millis(5_000);
        assert!((window.progress_at(late) - 1.0).abs() < f64::EPSILON);
        assert_eq!(window.remaining_at(late), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn bar_fills_with_progress() {
        let window = CycleWindow::starting_now(Duration::from_millis(2_000));
        let half = window.started_at + Duration::from_millis(1_000);
        assert_eq!(render_bar(&window, half, 10), "[#####-----] 1.0s");
        assert_eq!(render_bar(&window, window.deadline(), 4), "[####] 0.0s");
    }
}
