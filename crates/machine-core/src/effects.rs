//! Module registry and the effect system.
//!
//! Buying a module level deducts its cost from the token pool, applies every
//! effect in the module's list exactly once, bumps the level, and raises the
//! price by `cost_increase`. Effects change resource *parameters* only:
//!
//! - Additive kinds shift a rate or capacity by the signed magnitude, floored
//!   at zero. Lowering a capacity pulls the current value down with it.
//! - Rescale kinds multiply a service action's cost or amount by
//!   `1 + signed magnitude`, floored at zero.
//! - Heat kinds do nothing when heat is not modeled.

use machine_types::{
    Action, ActionOutcome, Effect, EffectKind, Module, ModuleId, RejectionReason, ServiceAction,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::math::{self, ArithmeticError};
use crate::state::MachineState;

/// Ordered module catalog with lookup by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    /// Wrap a catalog. Order is preserved for display.
    pub const fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Look up a module.
    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    fn get_mut(&mut self, id: &ModuleId) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| &m.id == id)
    }

    /// Iterate modules in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Number of modules in the catalog.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Why buying the next level of `id` would fail right now, if it would.
pub fn check_purchase(state: &MachineState, id: &ModuleId) -> Option<RejectionReason> {
    let Some(module) = state.modules.get(id) else {
        return Some(RejectionReason::UnknownModule);
    };
    if module.is_maxed() {
        return Some(RejectionReason::MaxLevelReached);
    }
    if state.output.current < module.cost {
        return Some(RejectionReason::InsufficientBalance {
            required: module.cost,
            available: state.output.current,
        });
    }
    None
}

/// Buy the next level of module `id`.
///
/// Returns [`ActionOutcome::Rejected`] with state untouched when the module
/// is unknown, maxed, or unaffordable.
///
/// # Errors
///
/// Returns [`ArithmeticError`] if an effect overflows the decimal range.
pub fn purchase(state: &mut MachineState, id: &ModuleId) -> Result<ActionOutcome, ArithmeticError> {
    let action = Action::Upgrade(id.clone());
    if let Some(reason) = check_purchase(state, id) {
        debug!(module = %id, reason = ?reason, "Purchase rejected");
        return Ok(ActionOutcome::Rejected { action, reason });
    }
    let Some(module) = state.modules.get(id) else {
        return Ok(ActionOutcome::Rejected {
            action,
            reason: RejectionReason::UnknownModule,
        });
    };
    let cost = module.cost;
    let effects = module.effects.clone();

    // Work on a copy so an overflow part-way through leaves the state intact.
    let mut next = state.clone();
    next.output.current = math::sub(next.output.current, cost, "module purchase debit")?;
    for effect in &effects {
        apply_effect(&mut next, effect)?;
    }
    if let Some(module) = next.modules.get_mut(id) {
        module.level = module.level.saturating_add(1);
        module.cost = math::add(module.cost, module.cost_increase, "module cost increase")?;
        info!(
            module = %id,
            level = module.level,
            paid = %cost,
            next_cost = %module.cost,
            "Module purchased"
        );
    }
    *state = next;

    Ok(ActionOutcome::Executed { action, cost })
}

/// Apply one effect to the state's parameters.
///
/// # Errors
///
/// Returns [`ArithmeticError`] if the new parameter overflows.
pub fn apply_effect(state: &mut MachineState, effect: &Effect) -> Result<(), ArithmeticError> {
    let delta = effect.signed_magnitude();
    debug!(kind = ?effect.kind, delta = %delta, "Applying effect");

    match effect.kind {
        EffectKind::EnergyCapacity => {
            let energy = &mut state.energy;
            energy.capacity = shift(energy.capacity, delta, "energy capacity")?;
            energy.current = energy.current.min(energy.capacity);
        }
        EffectKind::ConsumptionRate => {
            let energy = &mut state.energy;
            energy.consumption_per_tick =
                shift(energy.consumption_per_tick, delta, "consumption rate")?;
        }
        EffectKind::ConsumptionGrowth => {
            let energy = &mut state.energy;
            energy.cost_growth_per_tick =
                shift(energy.cost_growth_per_tick, delta, "consumption growth")?;
        }
        EffectKind::OutputCapacity => {
            let output = &mut state.output;
            output.capacity = shift(output.capacity, delta, "output capacity")?;
            output.current = output.current.min(output.capacity);
        }
        EffectKind::ProductionRate => {
            let output = &mut state.output;
            output.production_per_tick =
                shift(output.production_per_tick, delta, "production rate")?;
        }
        EffectKind::WearRate => {
            let wear = &mut state.wear;
            wear.base_rate_per_tick = shift(wear.base_rate_per_tick, delta, "wear rate")?;
        }
        EffectKind::OverflowPenalty => {
            let wear = &mut state.wear;
            wear.overflow_penalty = shift(wear.overflow_penalty, delta, "overflow penalty")?;
        }
        EffectKind::HeatCapacity => {
            if let Some(heat) = state.heat.as_mut() {
                heat.max = shift(heat.max, delta, "heat capacity")?;
                heat.current = heat.current.min(heat.max);
            } else {
                skip_heat(effect.kind);
            }
        }
        EffectKind::HeatGain => {
            if let Some(heat) = state.heat.as_mut() {
                heat.gain_per_tick = shift(heat.gain_per_tick, delta, "heat gain")?;
            } else {
                skip_heat(effect.kind);
            }
        }
        EffectKind::HeatDissipation => {
            if let Some(heat) = state.heat.as_mut() {
                heat.dissipation_per_tick =
                    shift(heat.dissipation_per_tick, delta, "heat dissipation")?;
            } else {
                skip_heat(effect.kind);
            }
        }
        EffectKind::HeatWearMultiplier => {
            if let Some(heat) = state.heat.as_mut() {
                heat.wear_multiplier = shift(heat.wear_multiplier, delta, "heat wear multiplier")?;
            } else {
                skip_heat(effect.kind);
            }
        }
        EffectKind::BuyEnergyCost => {
            let spec = state.services.get_mut(ServiceAction::BuyEnergy);
            spec.cost = rescale(spec.cost, delta, "buy-energy cost")?;
        }
        EffectKind::BuyEnergyAmount => {
            let spec = state.services.get_mut(ServiceAction::BuyEnergy);
            spec.amount = rescale(spec.amount, delta, "buy-energy amount")?;
        }
        EffectKind::RepairWearCost => {
            let spec = state.services.get_mut(ServiceAction::RepairWear);
            spec.cost = rescale(spec.cost, delta, "repair-wear cost")?;
        }
        EffectKind::RepairWearAmount => {
            let spec = state.services.get_mut(ServiceAction::RepairWear);
            spec.amount = rescale(spec.amount, delta, "repair-wear amount")?;
        }
    }
    Ok(())
}

fn shift(value: Decimal, delta: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    Ok(math::non_negative(math::add(value, delta, context)?))
}

fn rescale(value: Decimal, delta: Decimal, context: &'static str) -> Result<Decimal, ArithmeticError> {
    let factor = math::non_negative(math::add(Decimal::ONE, delta, context)?);
    math::mul(value, factor, context)
}

fn skip_heat(kind: EffectKind) {
    debug!(kind = ?kind, "Heat is not modeled, effect skipped");
}
