//! Action dispatcher: guarded state mutations for player actions.
//!
//! Every action is checked before it runs. A failed check is not an error:
//! the action becomes a no-op and the caller receives
//! [`ActionOutcome::Rejected`] with the reason. A service action runs only
//! when all of the following hold:
//!
//! - the token balance covers its cost
//! - its target is not saturated (energy below capacity, wear above zero)
//! - its amount is positive
//!
//! Upgrades defer to [`effects::check_purchase`](crate::effects::check_purchase).

use machine_types::{Action, ActionOutcome, ActionView, RejectionReason, ServiceAction};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::effects;
use crate::math::{self, ArithmeticError};
use crate::state::MachineState;

/// Why `action` would be refused right now, or `None` if it can run.
pub fn check(state: &MachineState, action: &Action) -> Option<RejectionReason> {
    match action {
        Action::Service(service) => check_service(state, *service),
        Action::Upgrade(id) => effects::check_purchase(state, id),
    }
}

/// Whether `action` would run right now.
pub fn can_execute(state: &MachineState, action: &Action) -> bool {
    check(state, action).is_none()
}

fn check_service(state: &MachineState, service: ServiceAction) -> Option<RejectionReason> {
    let spec = state.services.get(service);
    if state.output.current < spec.cost {
        return Some(RejectionReason::InsufficientBalance {
            required: spec.cost,
            available: state.output.current,
        });
    }
    let saturated = match service {
        ServiceAction::BuyEnergy => state.energy.is_full(),
        ServiceAction::RepairWear => state.wear.is_pristine(),
    };
    if saturated {
        return Some(RejectionReason::TargetSaturated);
    }
    if spec.amount <= Decimal::ZERO {
        return Some(RejectionReason::NoEffect);
    }
    None
}

/// Run `action` against the state.
///
/// # Errors
///
/// Returns [`ArithmeticError`] if a resource update overflows; the state is
/// left unchanged in that case.
pub fn execute(state: &mut MachineState, action: &Action) -> Result<ActionOutcome, ArithmeticError> {
    match action {
        Action::Service(service) => execute_service(state, *service),
        Action::Upgrade(id) => effects::purchase(state, id),
    }
}

fn execute_service(
    state: &mut MachineState,
    service: ServiceAction,
) -> Result<ActionOutcome, ArithmeticError> {
    let action = Action::Service(service);
    if let Some(reason) = check_service(state, service) {
        debug!(action = %action, reason = ?reason, "Action rejected");
        return Ok(ActionOutcome::Rejected { action, reason });
    }

    let spec = state.services.get(service).clone();
    let balance = math::sub(state.output.current, spec.cost, "action debit")?;

    match service {
        ServiceAction::BuyEnergy => {
            let energy = &mut state.energy;
            let refilled = math::add(energy.current, spec.amount, "energy purchase")?;
            energy.current = refilled.min(energy.capacity);
            info!(energy = %energy.current, paid = %spec.cost, "Energy bought");
        }
        ServiceAction::RepairWear => {
            let fraction = math::div(spec.amount, Decimal::ONE_HUNDRED, "repair amount")?;
            let wear = &mut state.wear;
            wear.current = math::non_negative(math::sub(wear.current, fraction, "wear repair")?);
            info!(wear = %wear.current, paid = %spec.cost, "Wear repaired");
        }
    }
    state.output.current = balance;

    Ok(ActionOutcome::Executed {
        action,
        cost: spec.cost,
    })
}

/// Every action with its current cost, amount, and availability.
///
/// Service actions come first, then one upgrade per module in catalog order.
pub fn action_views(state: &MachineState) -> Vec<ActionView> {
    let services = ServiceAction::ALL.into_iter().map(|service| {
        let spec = state.services.get(service);
        ActionView {
            id: service.as_str().to_owned(),
            cost: spec.cost,
            amount: spec.amount,
            enabled: check_service(state, service).is_none(),
        }
    });
    let upgrades = state.modules.iter().map(|module| ActionView {
        id: Action::Upgrade(module.id.clone()).to_string(),
        cost: module.cost,
        amount: Decimal::from(module.max_level.saturating_sub(module.level)),
        enabled: effects::check_purchase(state, &module.id).is_none(),
    });
    services.chain(upgrades).collect()
}
