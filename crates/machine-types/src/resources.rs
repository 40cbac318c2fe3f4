//! Resource pools advanced by the tick cycle.
//!
//! Every quantity is a [`Decimal`] so per-tick deltas such as `0.02` wear
//! accumulate exactly. Each pool keeps its current value inside its valid
//! range; the tick cycle and the action dispatcher are the only writers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Stored energy that the machine burns every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnergyResource {
    /// Energy currently stored (`0 <= current <= capacity`).
    #[ts(as = "String")]
    pub current: Decimal,
    /// Maximum storable energy.
    #[ts(as = "String")]
    pub capacity: Decimal,
    /// Energy drained per tick.
    #[ts(as = "String")]
    pub consumption_per_tick: Decimal,
    /// Amount added to `consumption_per_tick` every tick (0 = flat cost).
    #[ts(as = "String")]
    pub cost_growth_per_tick: Decimal,
}

impl EnergyResource {
    /// Whether the pool is full.
    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }

    /// Whether the pool is exhausted.
    pub fn is_depleted(&self) -> bool {
        self.current <= Decimal::ZERO
    }
}

/// Produced tokens. Doubles as the currency for actions and upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OutputResource {
    /// Tokens currently held (`0 <= current <= capacity`).
    #[ts(as = "String")]
    pub current: Decimal,
    /// Maximum tokens the machine can hold.
    #[ts(as = "String")]
    pub capacity: Decimal,
    /// Tokens produced per tick.
    #[ts(as = "String")]
    pub production_per_tick: Decimal,
}

impl OutputResource {
    /// Whether the token store is full.
    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }
}

/// Cumulative damage as a fraction in `[0, 1]`. The machine halts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WearResource {
    /// Current wear fraction.
    #[ts(as = "String")]
    pub current: Decimal,
    /// Wear added every tick before heat.
    #[ts(as = "String")]
    pub base_rate_per_tick: Decimal,
    /// Extra wear on the tick the output store fills up (0 disables it).
    #[ts(as = "String")]
    pub overflow_penalty: Decimal,
}

impl WearResource {
    /// Whether the machine is worn out.
    pub fn is_maxed(&self) -> bool {
        self.current >= Decimal::ONE
    }

    /// Whether there is nothing left to repair.
    pub fn is_pristine(&self) -> bool {
        self.current <= Decimal::ZERO
    }
}

/// Optional heat pool. Hot machines wear faster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HeatResource {
    /// Current heat (`0 <= current <= max`).
    #[ts(as = "String")]
    pub current: Decimal,
    /// Heat ceiling.
    #[ts(as = "String")]
    pub max: Decimal,
    /// Heat generated per tick.
    #[ts(as = "String")]
    pub gain_per_tick: Decimal,
    /// Heat shed per tick.
    #[ts(as = "String")]
    pub dissipation_per_tick: Decimal,
    /// Wear added per tick is `current * wear_multiplier / 100`.
    #[ts(as = "String")]
    pub wear_multiplier: Decimal,
}
