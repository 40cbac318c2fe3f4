//! Purchasable modules and the effects they apply.
//!
//! A module is bought one level at a time. Each purchase applies the
//! module's effect list exactly once as flat deltas on resource *parameters*
//! (capacities, rates, action costs), never on resource values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ModuleId;

/// What an [`Effect`] changes.
///
/// Additive kinds shift a parameter by the signed magnitude. The four
/// action kinds (`BuyEnergyCost` .. `RepairWearAmount`) rescale an action
/// parameter by `1 + signed magnitude` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EffectKind {
    /// Energy capacity.
    EnergyCapacity,
    /// Energy drained per tick.
    ConsumptionRate,
    /// Per-tick growth of the energy drain.
    ConsumptionGrowth,
    /// Token capacity.
    OutputCapacity,
    /// Tokens produced per tick.
    ProductionRate,
    /// Base wear per tick.
    WearRate,
    /// Extra wear when the token store fills.
    OverflowPenalty,
    /// Heat ceiling.
    HeatCapacity,
    /// Heat generated per tick.
    HeatGain,
    /// Heat shed per tick.
    HeatDissipation,
    /// How strongly heat converts into wear.
    HeatWearMultiplier,
    /// Token cost of `buy-energy` (rescale).
    BuyEnergyCost,
    /// Energy granted by `buy-energy` (rescale).
    BuyEnergyAmount,
    /// Token cost of `repair-wear` (rescale).
    RepairWearCost,
    /// Wear percentage removed by `repair-wear` (rescale).
    RepairWearAmount,
}

impl EffectKind {
    /// Whether this kind rescales an action parameter instead of adding to it.
    pub const fn is_rescale(self) -> bool {
        matches!(
            self,
            Self::BuyEnergyCost
                | Self::BuyEnergyAmount
                | Self::RepairWearCost
                | Self::RepairWearAmount
        )
    }
}

/// Direction of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EffectSign {
    /// Raise the parameter.
    #[default]
    Increase,
    /// Lower the parameter.
    Decrease,
}

/// One typed change applied when a module level is bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Effect {
    /// The parameter this effect changes.
    pub kind: EffectKind,
    /// Unsigned size of the change.
    #[ts(as = "String")]
    pub magnitude: Decimal,
    /// Whether the displayed value scales with the module level.
    #[serde(default)]
    pub per_level: bool,
    /// Direction of the change.
    #[serde(default)]
    pub sign: EffectSign,
}

impl Effect {
    /// The magnitude with its sign applied.
    pub fn signed_magnitude(&self) -> Decimal {
        match self.sign {
            EffectSign::Increase => self.magnitude,
            EffectSign::Decrease => -self.magnitude,
        }
    }

    /// Cumulative value to show for a module at `level`.
    ///
    /// Per-level effects read as `magnitude * level`; others show the flat
    /// magnitude. Display only: purchases always apply the flat delta.
    pub fn display_magnitude(&self, level: u32) -> Decimal {
        if self.per_level {
            self.signed_magnitude()
                .checked_mul(Decimal::from(level))
                .unwrap_or(Decimal::MAX)
        } else {
            self.signed_magnitude()
        }
    }
}

/// A purchasable upgrade with leveled, stacking effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Module {
    /// Catalog slug.
    pub id: ModuleId,
    /// Display name.
    pub name: String,
    /// One-line description for the presentation layer.
    #[serde(default)]
    pub description: String,
    /// Levels bought so far.
    #[serde(default)]
    pub level: u32,
    /// Highest purchasable level.
    pub max_level: u32,
    /// Token cost of the next level.
    #[ts(as = "String")]
    pub cost: Decimal,
    /// Added to `cost` after each purchase (must be positive).
    #[ts(as = "String")]
    pub cost_increase: Decimal,
    /// Effects applied, in order, on every purchase.
    pub effects: Vec<Effect>,
}

impl Module {
    /// Whether no further levels can be bought.
    pub const fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}
