//! Clock, tick cycle, effects, and action dispatch for the Idle Machine.
//!
//! This crate owns the fixed-order tick update that drives the machine
//! (produce, escalate, drain, heat, wear, overflow, halt) and the two ways a
//! player changes it: service actions and module purchases.
//!
//! # Modules
//!
//! - [`actions`] -- Guarded dispatch of player actions and action views.
//! - [`clock`] -- Tick counter, running flag, interval, and halt reason.
//! - [`config`] -- Configuration loading from `machine-config.yaml` into
//!   strongly-typed structs.
//! - [`countdown`] -- Cosmetic progress toward the next tick.
//! - [`effects`] -- Module registry and purchase with effect application.
//! - [`math`] -- Checked decimal helpers.
//! - [`runner`] -- The async loop interleaving ticks and player commands.
//! - [`session`] -- One game in progress and its snapshot.
//! - [`state`] -- The mutable machine state.
//! - [`tick`] -- The per-tick update.

pub mod actions;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod effects;
pub mod math;
pub mod runner;
pub mod session;
pub mod state;
pub mod tick;
