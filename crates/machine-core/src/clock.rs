//! Tick clock for the Idle Machine simulation.
//!
//! The clock is the single source of truth for the tick counter and for
//! whether the machine is running. It does not sleep by itself: the runner
//! reads [`TickClock::interval_ms`] once at the start of every cycle, so an
//! interval change only affects the *next* cycle, never the one in flight.
//!
//! # Design Principles
//!
//! - The tick counter only moves forward, with checked arithmetic.
//! - `start` and `stop` are idempotent.
//! - A halt is recorded on the clock and stops it; only an explicit start
//!   or a reset re-arms it.

use machine_types::HaltReason;
use tracing::info;

use crate::config::ClockConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Requested interval is shorter than the configured minimum.
    #[error("tick interval {requested_ms}ms is below the minimum of {minimum_ms}ms")]
    IntervalTooShort {
        /// The rejected interval.
        requested_ms: u64,
        /// The configured minimum.
        minimum_ms: u64,
    },
}

/// Fixed-period tick clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickClock {
    /// Ticks completed so far.
    tick: u64,

    /// Whether the clock is armed.
    running: bool,

    /// Period between ticks, latched by the runner at cycle start.
    interval_ms: u64,

    /// Lowest accepted interval.
    min_interval_ms: u64,

    /// Set when a halt condition stopped the clock.
    halted: Option<HaltReason>,
}

impl TickClock {
    /// Create a stopped clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::IntervalTooShort`] if the configured interval is
    /// below the configured minimum.
    pub fn new(config: &ClockConfig) -> Result<Self, ClockError> {
        if config.tick_interval_ms < config.min_tick_interval_ms {
            return Err(ClockError::IntervalTooShort {
                requested_ms: config.tick_interval_ms,
                minimum_ms: config.min_tick_interval_ms,
            });
        }
        Ok(Self {
            tick: 0,
            running: false,
            interval_ms: config.tick_interval_ms,
            min_interval_ms: config.min_tick_interval_ms,
            halted: None,
        })
    }

    /// Arm the clock. Returns `false` if it was already running.
    ///
    /// Starting clears any recorded halt reason.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.halted = None;
        info!(tick = self.tick, interval_ms = self.interval_ms, "Clock started");
        true
    }

    /// Disarm the clock. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        info!(tick = self.tick, "Clock stopped");
        true
    }

    /// Stop the clock because the machine reached a terminal state.
    pub fn halt(&mut self, reason: HaltReason) {
        self.running = false;
        self.halted = Some(reason);
        info!(tick = self.tick, reason = ?reason, "Clock halted");
    }

    /// Advance the tick counter by one. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Change the tick period. Returns the previous period.
    ///
    /// The new value applies from the next cycle on.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::IntervalTooShort`] below the minimum; the
    /// interval is left unchanged.
    pub fn set_interval_ms(&mut self, ms: u64) -> Result<u64, ClockError> {
        if ms < self.min_interval_ms {
            return Err(ClockError::IntervalTooShort {
                requested_ms: ms,
                minimum_ms: self.min_interval_ms,
            });
        }
        let previous = core::mem::replace(&mut self.interval_ms, ms);
        info!(previous_ms = previous, interval_ms = ms, "Tick interval changed");
        Ok(previous)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether the clock is armed.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Current tick period in milliseconds.
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Lowest accepted tick period.
    pub const fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Why the clock last halted, if it has not been restarted since.
    pub const fn halted(&self) -> Option<HaltReason> {
        self.halted
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn default_clock() -> TickClock {
        TickClock::new(&ClockConfig::default()).unwrap()
    }

    #[test]
    fn clock_starts_stopped_at_tick_zero() {
        let clock = default_clock();
        assert_eq!(clock.tick(), 0);
        assert!(!clock.is_running());
        assert_eq!(clock.interval_ms(), 2000);
        assert_eq!(clock.halted(), None);
    }

    #[test]
    fn clock_advances() {
        let mut clock = default_clock();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn start_is_idempotent() {
        let mut clock = default_clock();
        assert!(clock.start());
        let after_first = clock.clone();
        assert!(!clock.start());
        assert_eq!(clock, after_first);
    }

    #[test]
    fn stop_twice_equals_stop_once() {
        let mut clock = default_clock();
        clock.start();
        assert!(clock.stop());
        let after_first = clock.clone();
        assert!(!clock.stop());
        assert_eq!(clock, after_first);
    }

    #[test]
    fn halt_stops_and_records_reason() {
        let mut clock = default_clock();
        clock.start();
        clock.halt(HaltReason::WearMaxed);
        assert!(!clock.is_running());
        assert_eq!(clock.halted(), Some(HaltReason::WearMaxed));

        // An explicit restart clears the halt.
        assert!(clock.start());
        assert_eq!(clock.halted(), None);
    }

    #[test]
    fn set_interval_returns_previous() {
        let mut clock = default_clock();
        assert_eq!(clock.set_interval_ms(4000), Ok(2000));
        assert_eq!(clock.interval_ms(), 4000);
    }

    #[test]
    fn reject_interval_below_minimum() {
        let mut clock = default_clock();
        let result = clock.set_interval_ms(50);
        assert_eq!(
            result,
            Err(ClockError::IntervalTooShort {
                requested_ms: 50,
                minimum_ms: 100
            })
        );
        assert_eq!(clock.interval_ms(), 2000);
    }

    #[test]
    fn invalid_config_interval_below_minimum() {
        let cfg = ClockConfig {
            tick_interval_ms: 10,
            ..ClockConfig::default()
        };
        assert!(TickClock::new(&cfg).is_err());
    }

    #[test]
    fn tick_overflow_is_reported() {
        let mut clock = default_clock();
        clock.tick = u64::MAX;
        assert_eq!(clock.advance(), Err(ClockError::TickOverflow));
    }
}
