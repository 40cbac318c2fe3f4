//! Tick cycle: the fixed-order update that advances the machine one step.
//!
//! Each tick runs these steps in order:
//!
//! 1. **Count** -- advance the clock's tick counter.
//! 2. **Produce** -- add production to the token pool, capped at capacity
//!    and snapped onto it when within `1e-9`.
//! 3. **Escalate** -- add the consumption growth to the per-tick drain.
//! 4. **Drain** -- subtract the drain from energy, floored at zero.
//! 5. **Heat** -- when heat is modeled, add gain and shed dissipation,
//!    clamped to `[0, max]`.
//! 6. **Wear** -- add the base rate plus `heat * wear_multiplier / 100`,
//!    clamped to `[0, 1]`.
//! 7. **Overflow stress** -- if the token pool went from below capacity to
//!    full on this tick, add the overflow penalty.
//! 8. **Halt check** -- stop the clock when energy is gone or wear is 100%.
//!
//! Growth runs before the drain so costs ratchet up tick over tick, and wear
//! runs after production so overflow detection sees the post-production pool.

use machine_types::HaltReason;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::clock::{ClockError, TickClock};
use crate::math::{self, ArithmeticError, SNAP_EPSILON};
use crate::state::MachineState;

/// Errors that can occur during tick execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A resource update overflowed.
    #[error("resource update failed: {source}")]
    Arithmetic {
        /// The underlying arithmetic error.
        #[from]
        source: ArithmeticError,
    },

    /// The clock is stopped, by the player or by a halt.
    #[error("clock is not running")]
    NotRunning,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Tokens actually added this tick.
    pub produced: Decimal,
    /// Energy actually drained this tick.
    pub consumed: Decimal,
    /// Wear actually added this tick, overflow stress included.
    pub wear_added: Decimal,
    /// Whether the token pool filled up on this tick.
    pub output_capped: bool,
    /// Set when this tick put the machine into a terminal state.
    pub halt: Option<HaltReason>,
}

/// Execute one tick against `state`, advancing `clock`.
///
/// On a halt the clock is stopped and the reason recorded on it.
///
/// # Errors
///
/// Returns [`TickError`] if the tick counter or a resource overflows. The
/// state is left unchanged in that case.
pub fn run_tick(state: &mut MachineState, clock: &mut TickClock) -> Result<TickSummary, TickError> {
    // Step 1: count. Done on a copy so a later overflow does not skip a tick number.
    let mut next_clock = clock.clone();
    let tick = next_clock.advance()?;
    let mut next = state.clone();

    // Step 2: produce.
    let output = &mut next.output;
    let output_before = output.current;
    let was_below_capacity = output.current < output.capacity;
    let produced = math::add(output.current, output.production_per_tick, "output production")?;
    output.current = produced.min(output.capacity);
    if math::sub(output.capacity, output.current, "output snap")? <= SNAP_EPSILON {
        output.current = output.capacity;
    }
    let output_capped = was_below_capacity && output.current >= output.capacity;
    let produced = math::sub(output.current, output_before, "production delta")?;

    // Step 3: escalate.
    let energy = &mut next.energy;
    energy.consumption_per_tick = math::add(
        energy.consumption_per_tick,
        energy.cost_growth_per_tick,
        "consumption growth",
    )?;

    // Step 4: drain.
    let energy_before = energy.current;
    energy.current =
        math::non_negative(math::sub(energy.current, energy.consumption_per_tick, "energy drain")?);
    let consumed = math::sub(energy_before, energy.current, "drain delta")?;

    // Step 5: heat.
    let heat_contribution = match next.heat.as_mut() {
        Some(heat) => {
            let warmed = math::add(heat.current, heat.gain_per_tick, "heat gain")?;
            let cooled = math::sub(warmed, heat.dissipation_per_tick, "heat dissipation")?;
            heat.current = cooled.clamp(Decimal::ZERO, heat.max);
            let scaled = math::mul(heat.current, heat.wear_multiplier, "heat wear")?;
            math::div(scaled, Decimal::ONE_HUNDRED, "heat wear")?
        }
        None => Decimal::ZERO,
    };

    // Step 6: wear.
    let wear = &mut next.wear;
    let wear_before = wear.current;
    let increment = math::add(wear.base_rate_per_tick, heat_contribution, "wear rate")?;
    wear.current = math::clamp01(math::add(wear.current, increment, "wear accumulation")?);

    // Step 7: overflow stress.
    if output_capped && wear.overflow_penalty > Decimal::ZERO {
        wear.current = math::clamp01(math::add(
            wear.current,
            wear.overflow_penalty,
            "overflow penalty",
        )?);
        debug!(tick, penalty = %wear.overflow_penalty, "Overflow stress applied");
    }
    let wear_added = math::sub(wear.current, wear_before, "wear delta")?;

    // Step 8: halt check.
    let halt = next.halt_condition();
    if let Some(reason) = halt {
        next_clock.halt(reason);
    }

    *state = next;
    *clock = next_clock;

    info!(
        tick,
        energy = %state.energy.current,
        output = %state.output.current,
        wear = %state.wear.current,
        heat = ?state.heat.as_ref().map(|h| h.current),
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        produced,
        consumed,
        wear_added,
        output_capped,
        halt,
    })
}
