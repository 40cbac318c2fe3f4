//! Shared type definitions for the Idle Machine simulation.
//!
//! This crate is the single source of truth for the data model shared by the
//! core engine and any presentation layer. Types flow to `TypeScript` via
//! `ts-rs` so a browser view can render snapshots directly.
//!
//! # Modules
//!
//! - [`ids`] -- Session and module identifiers
//! - [`resources`] -- Energy, output, wear, and heat pools
//! - [`modules`] -- Purchasable modules and their typed effects
//! - [`actions`] -- Player actions, parameters, and outcomes
//! - [`snapshot`] -- Read-only views for rendering

pub mod actions;
pub mod ids;
pub mod modules;
pub mod resources;
pub mod snapshot;

pub use actions::{
    Action, ActionOutcome, ActionParseError, ActionSpec, HaltReason, RejectionReason,
    ServiceAction, UPGRADE_PREFIX,
};
pub use ids::{ModuleId, SessionId};
pub use modules::{Effect, EffectKind, EffectSign, Module};
pub use resources::{EnergyResource, HeatResource, OutputResource, WearResource};
pub use snapshot::{ActionView, EffectView, MachineSnapshot, ModuleView};
