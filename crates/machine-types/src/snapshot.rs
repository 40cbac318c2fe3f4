//! Read-only views handed to the presentation layer.
//!
//! A snapshot is rebuilt after every tick and every player action, so the
//! `enabled` flag on each [`ActionView`] always reflects the current state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::actions::HaltReason;
use crate::ids::{ModuleId, SessionId};
use crate::modules::{EffectKind, EffectSign};
use crate::resources::{EnergyResource, HeatResource, OutputResource, WearResource};

/// A control the presentation layer can bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionView {
    /// Action identifier (`buy-energy`, `upgrade-capacitor`, ...).
    pub id: String,
    /// Token cost of triggering it now.
    #[ts(as = "String")]
    pub cost: Decimal,
    /// Effect size: energy granted, wear percent removed, or for upgrades
    /// the number of levels still purchasable.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Whether triggering it now would succeed.
    pub enabled: bool,
}

/// Display form of one module effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EffectView {
    /// The parameter changed.
    pub kind: EffectKind,
    /// Direction of the change.
    pub sign: EffectSign,
    /// Whether `total` scales with level.
    pub per_level: bool,
    /// Signed value to display at the current level.
    #[ts(as = "String")]
    pub total: Decimal,
}

/// Display form of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ModuleView {
    /// Catalog slug.
    pub id: ModuleId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Levels bought.
    pub level: u32,
    /// Highest level.
    pub max_level: u32,
    /// Cost of the next level.
    #[ts(as = "String")]
    pub cost: Decimal,
    /// Effects at the current level.
    pub effects: Vec<EffectView>,
}

/// Complete machine state as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MachineSnapshot {
    /// Session this snapshot belongs to.
    pub session_id: SessionId,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Ticks completed.
    pub tick: u64,
    /// Whether the clock is running.
    pub running: bool,
    /// Interval between ticks in milliseconds.
    pub tick_interval_ms: u64,
    /// Why the clock last halted, if it did.
    pub halted: Option<HaltReason>,
    /// Energy pool.
    pub energy: EnergyResource,
    /// Token pool.
    pub output: OutputResource,
    /// Wear.
    pub wear: WearResource,
    /// Heat, when modeled.
    pub heat: Option<HeatResource>,
    /// Module catalog with current levels.
    pub modules: Vec<ModuleView>,
    /// Every action with its current cost and availability.
    pub actions: Vec<ActionView>,
}
