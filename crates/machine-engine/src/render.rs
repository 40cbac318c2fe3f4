//! Terminal rendering of machine snapshots.
//!
//! [`ConsoleRenderer`] is the runner callback: it logs every tick and action
//! and prints a one-line summary (or the full snapshot as JSON when
//! `presentation.json_snapshots` is set). [`run_countdown`] draws the
//! progress bar toward the next tick on stderr.

use std::fmt::Write as _;
use std::io::Write as _;
use std::time::Duration;

use machine_core::countdown::{self, CountdownReceiver};
use machine_core::runner::{ControlEvent, MachineCallback};
use machine_core::session::StartOutcome;
use machine_core::tick::TickSummary;
use machine_types::{ActionOutcome, MachineSnapshot};
use rust_decimal::Decimal;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Width of the countdown bar in characters.
const BAR_WIDTH: usize = 20;

/// Write one line to stdout.
pub fn emit(text: &str) {
    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "{text}") {
        debug!(error = %e, "stdout write failed");
    }
}

/// One-line summary of the resources.
pub fn resource_line(snapshot: &MachineSnapshot) -> String {
    let mut line = format!(
        "tick {:>4} | energy {}/{} | tokens {}/{} | wear {}%",
        snapshot.tick,
        snapshot.energy.current.round_dp(2),
        snapshot.energy.capacity.round_dp(2),
        snapshot.output.current.round_dp(2),
        snapshot.output.capacity.round_dp(2),
        snapshot
            .wear
            .current
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or_default()
            .round_dp(1),
    );
    if let Some(heat) = &snapshot.heat {
        let _ = write!(line, " | heat {}/{}", heat.current.round_dp(1), heat.max);
    }
    if let Some(reason) = snapshot.halted {
        let _ = write!(line, " | HALTED ({reason:?})");
    } else if !snapshot.running {
        line.push_str(" | stopped");
    }
    line
}

/// Multi-line description of the whole machine for `status`.
pub fn status_text(snapshot: &MachineSnapshot) -> String {
    let mut text = resource_line(snapshot);
    let _ = write!(
        text,
        "\ninterval {}ms | drain {}/tick | production {}/tick | wear {}/tick",
        snapshot.tick_interval_ms,
        snapshot.energy.consumption_per_tick,
        snapshot.output.production_per_tick,
        snapshot.wear.base_rate_per_tick,
    );

    text.push_str("\nmodules:");
    for module in &snapshot.modules {
        let effects = module
            .effects
            .iter()
            .map(|e| format!("{:?} {:+}", e.kind, e.total))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            text,
            "\n  {:<18} lvl {}/{}  next {}  [{}]",
            module.id.as_str(),
            module.level,
            module.max_level,
            module.cost,
            effects
        );
    }

    text.push_str("\nactions:");
    for action in &snapshot.actions {
        let mark = if action.enabled { '*' } else { ' ' };
        let _ = write!(text, "\n {mark} {:<26} cost {}", action.id, action.cost);
    }
    text
}

/// Runner callback that reports to the terminal.
pub struct ConsoleRenderer {
    json: bool,
}

impl ConsoleRenderer {
    /// Create a renderer; `json` prints full snapshots instead of summaries.
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    fn show(&self, snapshot: &MachineSnapshot) {
        if self.json {
            match serde_json::to_string(snapshot) {
                Ok(line) => emit(&line),
                Err(e) => warn!(error = %e, "failed to serialize snapshot"),
            }
        } else {
            emit(&resource_line(snapshot));
        }
    }
}

impl MachineCallback for ConsoleRenderer {
    fn on_tick(&mut self, summary: &TickSummary, snapshot: &MachineSnapshot) {
        debug!(
            tick = summary.tick,
            produced = %summary.produced,
            consumed = %summary.consumed,
            wear_added = %summary.wear_added,
            output_capped = summary.output_capped,
            "Tick rendered"
        );
        self.show(snapshot);
        if let Some(reason) = summary.halt {
            emit(&format!(
                "machine halted ({reason:?}); buy energy or repair wear, then `start`"
            ));
        }
    }

    fn on_action(&mut self, outcome: &ActionOutcome, snapshot: &MachineSnapshot) {
        match outcome {
            ActionOutcome::Executed { action, cost } => {
                info!(action = %action, cost = %cost, "Action executed");
                emit(&format!("{action}: done (-{cost} tokens)"));
            }
            ActionOutcome::Rejected { action, reason } => {
                info!(action = %action, reason = ?reason, "Action rejected");
                emit(&format!("{action}: refused ({reason:?})"));
            }
        }
        self.show(snapshot);
    }

    fn on_control(&mut self, event: &ControlEvent, snapshot: &MachineSnapshot) {
        let message = match event {
            ControlEvent::Start(StartOutcome::Started) => "clock started".to_owned(),
            ControlEvent::Start(StartOutcome::AlreadyRunning) => "already running".to_owned(),
            ControlEvent::Start(StartOutcome::Blocked(reason)) => {
                format!("cannot start while halted ({reason:?})")
            }
            ControlEvent::Stop { was_running: true } => "clock stopped".to_owned(),
            ControlEvent::Stop { was_running: false } => "already stopped".to_owned(),
            ControlEvent::IntervalChanged {
                previous_ms,
                interval_ms,
            } => format!("interval {previous_ms}ms -> {interval_ms}ms from the next tick"),
            ControlEvent::IntervalRejected(e) => e.to_string(),
            ControlEvent::Reset => "new game".to_owned(),
        };
        emit(&message);
        self.show(snapshot);
    }
}

/// Redraw the countdown bar every `frame` until the runner drops its sender.
pub async fn run_countdown(mut windows: CountdownReceiver, frame: Duration) {
    let mut frames = tokio::time::interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let window = *windows.borrow();
                if let Some(window) = window {
                    let bar = countdown::render_bar(&window, Instant::now(), BAR_WIDTH);
                    let mut err = std::io::stderr().lock();
                    if write!(err, "\r{bar} ").and_then(|()| err.flush()).is_err() {
                        break;
                    }
                }
            }
            changed = windows.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use machine_core::config::MachineConfig;
    use machine_core::session::Session;
    use machine_types::{Action, ServiceAction};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn resource_line_shows_pools() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        session.tick().unwrap();
        let line = resource_line(&session.snapshot());
        assert!(line.contains("energy 9/10"), "{line}");
        assert!(line.contains("tokens 2/10"), "{line}");
        assert!(line.contains("wear 2"), "{line}");
        assert!(!line.contains("HALTED"));
    }

    #[test]
    fn halted_machine_is_flagged() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        session.state_mut().energy.current = dec!(1);
        session.tick().unwrap();
        let line = resource_line(&session.snapshot());
        assert!(line.contains("HALTED (EnergyDepleted)"), "{line}");
    }

    #[test]
    fn status_lists_modules_and_actions() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        session.state_mut().output.current = dec!(10);
        session.state_mut().energy.current = dec!(4);
        session
            .execute(&Action::Service(ServiceAction::BuyEnergy))
            .unwrap();
        let text = status_text(&session.snapshot());
        assert!(text.contains("capacitor"));
        assert!(text.contains("upgrade-service-contract"));
        assert!(text.contains("* buy-energy"), "{text}");
    }
}
