//! End-to-end scenarios for `machine-core`.
//!
//! These drive the machine through [`Session`] and the async runner the way
//! the engine binary does, starting from the stock configuration.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use machine_core::config::MachineConfig;
use machine_core::countdown;
use machine_core::runner::{self, Command, NoOpCallback, RunEndReason};
use machine_core::session::{Session, StartOutcome};
use machine_types::{
    Action, ActionOutcome, HaltReason, ModuleId, RejectionReason, ServiceAction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// Helpers
// =============================================================================

fn manual_session() -> Session {
    let mut config = MachineConfig::default();
    config.clock.auto_start = false;
    Session::new(config).unwrap()
}

fn upgrade(id: &str) -> Action {
    Action::Upgrade(ModuleId::from(id))
}

// =============================================================================
// Tick scenarios
// =============================================================================

#[test]
fn stock_machine_after_one_and_five_ticks() {
    let mut session = Session::new(MachineConfig::default()).unwrap();

    session.tick().unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.energy.current, dec!(9));
    assert_eq!(snapshot.output.current, dec!(2));
    assert_eq!(snapshot.wear.current, dec!(0.02));

    for _ in 0..4 {
        session.tick().unwrap();
    }
    let snapshot = session.snapshot();
    assert_eq!(snapshot.tick, 5);
    assert_eq!(snapshot.energy.current, dec!(5));
    assert_eq!(snapshot.output.current, dec!(10));
    assert_eq!(snapshot.wear.current, dec!(0.10));
}

#[test]
fn invariants_hold_for_a_whole_game() {
    let mut config = MachineConfig::default();
    config.energy.cost_growth_per_tick = dec!(0.05);
    config.wear.overflow_penalty = dec!(0.02);
    config.heat = Some(machine_core::config::HeatConfig::default());
    let mut session = Session::new(config).unwrap();

    let mut previous_consumption = session.state().energy.consumption_per_tick;
    let mut ticks = 0_u32;
    while session.is_running() {
        session.tick().unwrap();
        ticks += 1;

        // Spend tokens whenever possible, like an attentive player would.
        for action in [
            Action::Service(ServiceAction::BuyEnergy),
            Action::Service(ServiceAction::RepairWear),
        ] {
            session.execute(&action).unwrap();
        }

        let state = session.state();
        assert!(state.energy.current >= Decimal::ZERO);
        assert!(state.energy.current <= state.energy.capacity);
        assert!(state.output.current >= Decimal::ZERO);
        assert!(state.output.current <= state.output.capacity);
        assert!(state.wear.current >= Decimal::ZERO);
        assert!(state.wear.current <= Decimal::ONE);
        let heat = state.heat.as_ref().unwrap();
        assert!(heat.current >= Decimal::ZERO && heat.current <= heat.max);
        assert!(state.energy.consumption_per_tick >= previous_consumption);
        previous_consumption = state.energy.consumption_per_tick;

        assert!(ticks < 10_000, "machine never halted");
    }
    assert!(session.snapshot().halted.is_some());
}

#[test]
fn wear_at_exactly_one_stops_the_machine_until_restart() {
    let mut session = Session::new(MachineConfig::default()).unwrap();
    session.state_mut().wear.current = dec!(0.98);
    session.state_mut().output.current = dec!(5);

    let summary = session.tick().unwrap();
    assert_eq!(session.state().wear.current, Decimal::ONE);
    assert_eq!(summary.halt, Some(HaltReason::WearMaxed));
    assert!(!session.is_running());
    assert_eq!(session.start(), StartOutcome::Blocked(HaltReason::WearMaxed));

    session
        .execute(&Action::Service(ServiceAction::RepairWear))
        .unwrap();
    assert_eq!(session.state().wear.current, dec!(0.80));
    assert_eq!(session.start(), StartOutcome::Started);
}

// =============================================================================
// Actions and purchases
// =============================================================================

#[test]
fn repair_scenario() {
    let mut session = manual_session();
    session.state_mut().wear.current = dec!(0.5);
    session.state_mut().output.current = dec!(9);

    let outcome = session
        .execute(&Action::Service(ServiceAction::RepairWear))
        .unwrap();

    assert!(outcome.is_executed());
    assert_eq!(session.state().wear.current, dec!(0.30));
    assert_eq!(session.state().output.current, dec!(4));
}

#[test]
fn unaffordable_purchase_changes_nothing() {
    let mut config = MachineConfig::default();
    config.clock.auto_start = false;
    config.modules[0].cost = dec!(9);
    let mut session = Session::new(config).unwrap();
    session.state_mut().output.current = dec!(8);
    let before = session.state().clone();

    let outcome = session.execute(&upgrade("capacitor")).unwrap();

    assert_eq!(
        outcome,
        ActionOutcome::Rejected {
            action: upgrade("capacitor"),
            reason: RejectionReason::InsufficientBalance {
                required: dec!(9),
                available: dec!(8),
            },
        }
    );
    assert_eq!(session.state(), &before);
    assert_eq!(session.snapshot().modules[0].level, 0);
}

#[test]
fn purchases_stack_until_max_level() {
    let mut session = manual_session();
    let max_level = session.state().modules.get(&ModuleId::from("bearings")).unwrap().max_level;

    for _ in 0..max_level {
        session.state_mut().output.capacity = dec!(100);
        session.state_mut().output.current = dec!(100);
        assert!(session.execute(&upgrade("bearings")).unwrap().is_executed());
    }
    // 0.02 - 3 * 0.005
    assert_eq!(session.state().wear.base_rate_per_tick, dec!(0.005));

    let outcome = session.execute(&upgrade("bearings")).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected {
            reason: RejectionReason::MaxLevelReached,
            ..
        }
    ));
}

#[test]
fn upgrades_change_later_ticks() {
    let mut session = manual_session();
    session.state_mut().output.current = dec!(10);
    assert!(session.execute(&upgrade("press")).unwrap().is_executed());
    assert_eq!(session.state().output.current, Decimal::ZERO);

    assert_eq!(session.start(), StartOutcome::Started);
    session.tick().unwrap();
    assert_eq!(session.state().output.current, dec!(3));
    assert_eq!(session.state().output.capacity, dec!(20));
}

#[test]
fn unknown_module_is_rejected() {
    let mut session = manual_session();
    session.state_mut().output.current = dec!(10);
    let outcome = session.execute(&upgrade("flux-capacitor")).unwrap();
    assert!(matches!(
        outcome,
        ActionOutcome::Rejected {
            reason: RejectionReason::UnknownModule,
            ..
        }
    ));
}

// =============================================================================
// Runner
// =============================================================================

#[tokio::test(start_paused = true)]
async fn runner_plays_a_scripted_game() {
    let session = Session::new(MachineConfig::default()).unwrap();
    let (tx, mut rx) = mpsc::channel(16);
    let (cd_tx, _cd_rx) = countdown::channel();

    let handle = tokio::spawn(async move {
        let mut session = session;
        let result = runner::run_machine(&mut session, &mut rx, &cd_tx, &mut NoOpCallback).await;
        (result, session)
    });

    // Five ticks, the first at start and then every 2s, fill the token store.
    tokio::time::sleep(std::time::Duration::from_millis(8_500)).await;
    tx.send(Command::Execute(Action::Service(ServiceAction::BuyEnergy)))
        .await
        .unwrap();

    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(Command::Status(reply_tx)).await.unwrap();
    let status = reply_rx.await.unwrap();
    assert_eq!(status.tick, 5);
    assert_eq!(status.energy.current, dec!(10));
    assert_eq!(status.output.current, dec!(5));

    tx.send(Command::Shutdown).await.unwrap();
    let (result, session) = handle.await.unwrap();
    let result = result.unwrap();
    assert_eq!(result.end_reason, RunEndReason::Shutdown);
    assert_eq!(result.total_ticks, 5);
    assert_eq!(session.tick_count(), 5);
}
