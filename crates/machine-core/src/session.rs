//! A single play session: configuration, state, and clock together.
//!
//! [`Session`] is the unit the runner drives. It owns everything a game in
//! progress needs and exposes the operations a player can trigger, plus
//! [`Session::snapshot`] for the presentation layer.

use chrono::{DateTime, Utc};
use machine_types::{
    Action, ActionOutcome, EffectView, HaltReason, MachineSnapshot, ModuleView, SessionId,
};
use tracing::info;

use crate::actions;
use crate::clock::{ClockError, TickClock};
use crate::config::MachineConfig;
use crate::math::ArithmeticError;
use crate::state::MachineState;
use crate::tick::{self, TickError, TickSummary};

/// Result of asking the clock to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The clock was stopped and is now running.
    Started,
    /// The clock was already running; nothing changed.
    AlreadyRunning,
    /// A halt condition still holds; buy energy or repair wear first.
    Blocked(HaltReason),
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    config: MachineConfig,
    state: MachineState,
    clock: TickClock,
}

impl Session {
    /// Build a fresh session from configuration.
    ///
    /// The clock starts immediately when `clock.auto_start` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::IntervalTooShort`] if the configured interval is
    /// below the configured minimum.
    pub fn new(config: MachineConfig) -> Result<Self, ClockError> {
        let state = MachineState::from_config(&config);
        let mut clock = TickClock::new(&config.clock)?;
        let id = SessionId::new();

        info!(
            session_id = %id,
            modules = state.modules.len(),
            heat = state.heat.is_some(),
            interval_ms = clock.interval_ms(),
            "Session created"
        );

        if config.clock.auto_start && state.halt_condition().is_none() {
            clock.start();
        }

        Ok(Self {
            id,
            started_at: Utc::now(),
            config,
            state,
            clock,
        })
    }

    /// Start the clock unless it is running or the machine is halted.
    pub fn start(&mut self) -> StartOutcome {
        if self.clock.is_running() {
            return StartOutcome::AlreadyRunning;
        }
        if let Some(reason) = self.state.halt_condition() {
            info!(reason = ?reason, "Start refused while halted");
            return StartOutcome::Blocked(reason);
        }
        self.clock.start();
        StartOutcome::Started
    }

    /// Stop the clock. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        self.clock.stop()
    }

    /// Change the tick period from the next cycle on. Returns the previous
    /// period.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::IntervalTooShort`] below the configured minimum.
    pub fn set_interval_ms(&mut self, ms: u64) -> Result<u64, ClockError> {
        self.clock.set_interval_ms(ms)
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::NotRunning`] while the clock is stopped or
    /// halted; nothing changes in that case. Returns other [`TickError`]s if
    /// the counter or a resource overflows.
    pub fn tick(&mut self) -> Result<TickSummary, TickError> {
        if !self.clock.is_running() {
            return Err(TickError::NotRunning);
        }
        tick::run_tick(&mut self.state, &mut self.clock)
    }

    /// Dispatch a player action.
    ///
    /// Actions are accepted whether or not the clock is running. Clearing a
    /// halt condition does not restart the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError`] if a resource update overflows.
    pub fn execute(&mut self, action: &Action) -> Result<ActionOutcome, ArithmeticError> {
        actions::execute(&mut self.state, action)
    }

    /// Throw the current game away and start over from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if the configured clock is invalid.
    pub fn reset(&mut self) -> Result<(), ClockError> {
        let previous = self.id;
        *self = Self::new(self.config.clone())?;
        info!(previous_session = %previous, session_id = %self.id, "Session reset");
        Ok(())
    }

    /// Read-only view of everything the presentation layer shows.
    pub fn snapshot(&self) -> MachineSnapshot {
        let modules = self
            .state
            .modules
            .iter()
            .map(|module| ModuleView {
                id: module.id.clone(),
                name: module.name.clone(),
                description: module.description.clone(),
                level: module.level,
                max_level: module.max_level,
                cost: module.cost,
                effects: module
                    .effects
                    .iter()
                    .map(|effect| EffectView {
                        kind: effect.kind,
                        sign: effect.sign,
                        per_level: effect.per_level,
                        total: effect.display_magnitude(module.level),
                    })
                    .collect(),
            })
            .collect();

        MachineSnapshot {
            session_id: self.id,
            started_at: self.started_at,
            tick: self.clock.tick(),
            running: self.clock.is_running(),
            tick_interval_ms: self.clock.interval_ms(),
            halted: self.clock.halted(),
            energy: self.state.energy.clone(),
            output: self.state.output.clone(),
            wear: self.state.wear.clone(),
            heat: self.state.heat.clone(),
            modules,
            actions: actions::action_views(&self.state),
        }
    }

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Whether the clock is running.
    pub const fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Ticks completed.
    pub const fn tick_count(&self) -> u64 {
        self.clock.tick()
    }

    /// Current tick period in milliseconds.
    pub const fn interval_ms(&self) -> u64 {
        self.clock.interval_ms()
    }

    /// The machine state.
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable machine state, for scripted setups.
    pub const fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// The configuration this session was built from.
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use machine_types::{ModuleId, ServiceAction};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn manual_config() -> MachineConfig {
        let mut config = MachineConfig::default();
        config.clock.auto_start = false;
        config
    }

    #[test]
    fn auto_start_arms_the_clock() {
        let session = Session::new(MachineConfig::default()).unwrap();
        assert!(session.is_running());
        let session = Session::new(manual_config()).unwrap();
        assert!(!session.is_running());
    }

    #[test]
    fn start_is_idempotent() {
        let mut session = Session::new(manual_config()).unwrap();
        assert_eq!(session.start(), StartOutcome::Started);
        assert_eq!(session.start(), StartOutcome::AlreadyRunning);
        assert!(session.stop());
        assert!(!session.stop());
    }

    #[test]
    fn halted_machine_refuses_start_until_repaired() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        session.state_mut().wear.current = dec!(0.99);
        let summary = session.tick().unwrap();
        assert_eq!(summary.halt, Some(HaltReason::WearMaxed));
        assert!(!session.is_running());

        assert_eq!(session.start(), StartOutcome::Blocked(HaltReason::WearMaxed));

        session.state_mut().output.current = dec!(10);
        let outcome = session
            .execute(&Action::Service(ServiceAction::RepairWear))
            .unwrap();
        assert!(outcome.is_executed());
        assert!(!session.is_running());
        assert_eq!(session.start(), StartOutcome::Started);
        assert_eq!(session.snapshot().halted, None);
    }

    #[test]
    fn stopped_or_halted_session_does_not_tick() {
        let mut session = Session::new(manual_config()).unwrap();
        assert_eq!(session.tick().unwrap_err(), TickError::NotRunning);
        assert_eq!(session.tick_count(), 0);

        assert_eq!(session.start(), StartOutcome::Started);
        session.state_mut().energy.current = dec!(1);
        let summary = session.tick().unwrap();
        assert_eq!(summary.halt, Some(HaltReason::EnergyDepleted));

        let before = session.snapshot();
        assert_eq!(session.tick().unwrap_err(), TickError::NotRunning);
        let after = session.snapshot();
        assert_eq!(after.tick, 1);
        assert_eq!(after.energy, before.energy);
        assert_eq!(after.wear, before.wear);
        assert_eq!(after.halted, Some(HaltReason::EnergyDepleted));
    }

    #[test]
    fn snapshot_reflects_state_and_actions() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        session.tick().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert!(snapshot.running);
        assert_eq!(snapshot.tick_interval_ms, 2_000);
        assert_eq!(snapshot.energy.current, dec!(9));
        assert_eq!(snapshot.output.current, dec!(2));
        assert_eq!(snapshot.modules.len(), session.state().modules.len());
        assert_eq!(snapshot.actions.len(), 2 + snapshot.modules.len());
    }

    #[test]
    fn snapshot_scales_per_level_effects() {
        let mut session = Session::new(manual_config()).unwrap();
        session.state_mut().output.current = dec!(10);
        session
            .execute(&Action::Upgrade(ModuleId::from("capacitor")))
            .unwrap();
        session.state_mut().output.current = dec!(20);
        session
            .execute(&Action::Upgrade(ModuleId::from("capacitor")))
            .unwrap();

        let snapshot = session.snapshot();
        let capacitor = snapshot
            .modules
            .iter()
            .find(|m| m.id.as_str() == "capacitor")
            .unwrap();
        assert_eq!(capacitor.level, 2);
        assert_eq!(capacitor.cost, dec!(16));
        assert_eq!(capacitor.effects[0].total, dec!(10));
        assert_eq!(snapshot.energy.capacity, dec!(20));
    }

    #[test]
    fn reset_restores_configured_state() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        let first_id = session.id();
        for _ in 0..3 {
            session.tick().unwrap();
        }
        session.set_interval_ms(500).unwrap();

        session.reset().unwrap();

        assert_ne!(session.id(), first_id);
        assert_eq!(session.tick_count(), 0);
        assert_eq!(session.interval_ms(), 2_000);
        assert_eq!(session.state().output.current, Decimal::ZERO);
        assert!(session.is_running());
    }

    #[test]
    fn interval_below_minimum_is_refused() {
        let mut session = Session::new(MachineConfig::default()).unwrap();
        assert!(session.set_interval_ms(50).is_err());
        assert_eq!(session.set_interval_ms(3_000).unwrap(), 2_000);
        assert_eq!(session.interval_ms(), 3_000);
    }
}
