//! Configuration loading and typed config structures for the Idle Machine.
//!
//! The canonical configuration lives in `machine-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure, provides a
//! loader, and validates the loaded values before a session is built from
//! them. Every field has a default, so an empty file (or no file at all)
//! yields the stock machine.

use std::collections::BTreeSet;
use std::path::Path;

use machine_types::{
    ActionSpec, Effect, EffectKind, EffectSign, EnergyResource, HeatResource, Module, ModuleId,
    OutputResource, WearResource,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

/// Environment variable that overrides `clock.tick_interval_ms`.
pub const TICK_INTERVAL_ENV: &str = "MACHINE_TICK_INTERVAL_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible machine.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MachineConfig {
    /// Tick timing.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Starting energy pool.
    #[serde(default)]
    pub energy: EnergyConfig,

    /// Starting token pool.
    #[serde(default)]
    pub output: OutputConfig,

    /// Starting wear.
    #[serde(default)]
    pub wear: WearConfig,

    /// Heat pool; omitted means heat is not modeled.
    #[serde(default)]
    pub heat: Option<HeatConfig>,

    /// Service action parameters.
    #[serde(default)]
    pub actions: ActionsConfig,

    /// Module catalog, in display order.
    #[serde(default = "default_modules")]
    pub modules: Vec<Module>,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Front-end settings.
    #[serde(default)]
    pub presentation: PresentationConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            energy: EnergyConfig::default(),
            output: OutputConfig::default(),
            wear: WearConfig::default(),
            heat: None,
            actions: ActionsConfig::default(),
            modules: default_modules(),
            simulation: SimulationBoundsConfig::default(),
            logging: LoggingConfig::default(),
            presentation: PresentationConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// `MACHINE_TICK_INTERVAL_MS` overrides `clock.tick_interval_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.clock.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every cross-field invariant the tick cycle relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.min_tick_interval_ms == 0 {
            return invalid("clock.min_tick_interval_ms must be at least 1");
        }
        if self.clock.tick_interval_ms < self.clock.min_tick_interval_ms {
            return invalid(format!(
                "clock.tick_interval_ms ({}) is below clock.min_tick_interval_ms ({})",
                self.clock.tick_interval_ms, self.clock.min_tick_interval_ms
            ));
        }

        check_pool("energy", self.energy.initial, self.energy.capacity)?;
        check_non_negative("energy.consumption_per_tick", self.energy.consumption_per_tick)?;
        check_non_negative("energy.cost_growth_per_tick", self.energy.cost_growth_per_tick)?;

        check_pool("output", self.output.initial, self.output.capacity)?;
        check_non_negative("output.production_per_tick", self.output.production_per_tick)?;

        check_pool("wear", self.wear.initial, Decimal::ONE)?;
        check_non_negative("wear.base_rate_per_tick", self.wear.base_rate_per_tick)?;
        check_non_negative("wear.overflow_penalty", self.wear.overflow_penalty)?;

        if let Some(heat) = &self.heat {
            check_pool("heat", heat.initial, heat.max)?;
            check_non_negative("heat.gain_per_tick", heat.gain_per_tick)?;
            check_non_negative("heat.dissipation_per_tick", heat.dissipation_per_tick)?;
            check_non_negative("heat.wear_multiplier", heat.wear_multiplier)?;
        }

        check_non_negative("actions.buy_energy.cost", self.actions.buy_energy.cost)?;
        check_non_negative("actions.buy_energy.amount", self.actions.buy_energy.amount)?;
        check_non_negative("actions.repair_wear.cost", self.actions.repair_wear.cost)?;
        check_non_negative("actions.repair_wear.amount", self.actions.repair_wear.amount)?;

        let mut seen = BTreeSet::new();
        for module in &self.modules {
            validate_module(module)?;
            if !seen.insert(&module.id) {
                return invalid(format!("duplicate module id: {}", module.id));
            }
        }

        Ok(())
    }
}

fn validate_module(module: &Module) -> Result<(), ConfigError> {
    let id = &module.id;
    if id.as_str().trim().is_empty() {
        return invalid("module id must not be empty");
    }
    if id.as_str().chars().any(char::is_whitespace) {
        return invalid(format!("module id {id:?} must not contain whitespace"));
    }
    if module.max_level == 0 {
        return invalid(format!("module {id}: max_level must be at least 1"));
    }
    if module.level != 0 {
        return invalid(format!(
            "module {id}: level must start at 0 (got {}); levels are bought in play",
            module.level
        ));
    }
    if module.cost < Decimal::ZERO {
        return invalid(format!("module {id}: cost must not be negative"));
    }
    if module.cost_increase <= Decimal::ZERO {
        return invalid(format!("module {id}: cost_increase must be positive"));
    }
    if module.effects.iter().any(|e| e.magnitude < Decimal::ZERO) {
        return invalid(format!(
            "module {id}: effect magnitudes must not be negative (use sign: decrease)"
        ));
    }
    Ok(())
}

fn check_pool(name: &str, initial: Decimal, capacity: Decimal) -> Result<(), ConfigError> {
    if capacity < Decimal::ZERO {
        return invalid(format!("{name}: capacity must not be negative"));
    }
    if initial < Decimal::ZERO || initial > capacity {
        return invalid(format!(
            "{name}: initial value {initial} must lie within 0..={capacity}"
        ));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return invalid(format!("{name} must not be negative (got {value})"));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        reason: reason.into(),
    })
}

/// Tick timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Lowest interval accepted at runtime.
    #[serde(default = "default_min_tick_interval_ms")]
    pub min_tick_interval_ms: u64,

    /// Start ticking as soon as a session is created or reset.
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            min_tick_interval_ms: default_min_tick_interval_ms(),
            auto_start: true,
        }
    }
}

impl ClockConfig {
    /// Apply `MACHINE_TICK_INTERVAL_MS` if it is set to a valid number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(TICK_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(e) => warn!(
                    variable = TICK_INTERVAL_ENV,
                    value = %raw,
                    error = %e,
                    "ignoring unparseable tick interval override"
                ),
            }
        }
    }
}

/// Starting energy pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnergyConfig {
    /// Energy at session start.
    #[serde(default = "default_energy")]
    pub initial: Decimal,
    /// Maximum energy.
    #[serde(default = "default_energy")]
    pub capacity: Decimal,
    /// Energy drained per tick.
    #[serde(default = "default_consumption")]
    pub consumption_per_tick: Decimal,
    /// Growth of the drain per tick.
    #[serde(default)]
    pub cost_growth_per_tick: Decimal,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            initial: default_energy(),
            capacity: default_energy(),
            consumption_per_tick: default_consumption(),
            cost_growth_per_tick: Decimal::ZERO,
        }
    }
}

impl EnergyConfig {
    /// Build the live pool.
    pub const fn to_resource(&self) -> EnergyResource {
        EnergyResource {
            current: self.initial,
            capacity: self.capacity,
            consumption_per_tick: self.consumption_per_tick,
            cost_growth_per_tick: self.cost_growth_per_tick,
        }
    }
}

/// Starting token pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Tokens at session start.
    #[serde(default)]
    pub initial: Decimal,
    /// Maximum tokens.
    #[serde(default = "default_output_capacity")]
    pub capacity: Decimal,
    /// Tokens produced per tick.
    #[serde(default = "default_production")]
    pub production_per_tick: Decimal,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            initial: Decimal::ZERO,
            capacity: default_output_capacity(),
            production_per_tick: default_production(),
        }
    }
}

impl OutputConfig {
    /// Build the live pool.
    pub const fn to_resource(&self) -> OutputResource {
        OutputResource {
            current: self.initial,
            capacity: self.capacity,
            production_per_tick: self.production_per_tick,
        }
    }
}

/// Starting wear.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WearConfig {
    /// Wear fraction at session start.
    #[serde(default)]
    pub initial: Decimal,
    /// Wear added per tick.
    #[serde(default = "default_wear_rate")]
    pub base_rate_per_tick: Decimal,
    /// Extra wear on the tick the token store fills (0 disables).
    #[serde(default)]
    pub overflow_penalty: Decimal,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            initial: Decimal::ZERO,
            base_rate_per_tick: default_wear_rate(),
            overflow_penalty: Decimal::ZERO,
        }
    }
}

impl WearConfig {
    /// Build the live pool.
    pub const fn to_resource(&self) -> WearResource {
        WearResource {
            current: self.initial,
            base_rate_per_tick: self.base_rate_per_tick,
            overflow_penalty: self.overflow_penalty,
        }
    }
}

/// Heat pool parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeatConfig {
    /// Heat at session start.
    #[serde(default)]
    pub initial: Decimal,
    /// Heat ceiling.
    #[serde(default = "default_heat_max")]
    pub max: Decimal,
    /// Heat generated per tick.
    #[serde(default = "default_heat_gain")]
    pub gain_per_tick: Decimal,
    /// Heat shed per tick.
    #[serde(default = "default_heat_dissipation")]
    pub dissipation_per_tick: Decimal,
    /// Wear per tick is `heat * wear_multiplier / 100`.
    #[serde(default = "default_heat_wear_multiplier")]
    pub wear_multiplier: Decimal,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            initial: Decimal::ZERO,
            max: default_heat_max(),
            gain_per_tick: default_heat_gain(),
            dissipation_per_tick: default_heat_dissipation(),
            wear_multiplier: default_heat_wear_multiplier(),
        }
    }
}

impl HeatConfig {
    /// Build the live pool.
    pub const fn to_resource(&self) -> HeatResource {
        HeatResource {
            current: self.initial,
            max: self.max,
            gain_per_tick: self.gain_per_tick,
            dissipation_per_tick: self.dissipation_per_tick,
            wear_multiplier: self.wear_multiplier,
        }
    }
}

/// Service action parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionsConfig {
    /// `buy-energy`: tokens per use and energy granted.
    #[serde(default = "default_buy_energy")]
    pub buy_energy: ActionSpec,
    /// `repair-wear`: tokens per use and wear percent removed.
    #[serde(default = "default_repair_wear")]
    pub repair_wear: ActionSpec,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            buy_energy: default_buy_energy(),
            repair_wear: default_repair_wear(),
        }
    }
}

/// Run boundaries for headless sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop the runner after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop the runner after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Terminal front-end settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PresentationConfig {
    /// Refresh period of the countdown display (0 disables it).
    #[serde(default = "default_countdown_frame_ms")]
    pub countdown_frame_ms: u64,

    /// Print a JSON snapshot to stdout after every tick and action.
    #[serde(default)]
    pub json_snapshots: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            countdown_frame_ms: default_countdown_frame_ms(),
            json_snapshots: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    2_000
}

const fn default_min_tick_interval_ms() -> u64 {
    100
}

const fn default_true() -> bool {
    true
}

fn default_energy() -> Decimal {
    Decimal::TEN
}

fn default_consumption() -> Decimal {
    Decimal::ONE
}

fn default_output_capacity() -> Decimal {
    Decimal::TEN
}

fn default_production() -> Decimal {
    Decimal::TWO
}

fn default_wear_rate() -> Decimal {
    Decimal::new(2, 2)
}

fn default_heat_max() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_heat_gain() -> Decimal {
    Decimal::from(5)
}

fn default_heat_dissipation() -> Decimal {
    Decimal::from(3)
}

fn default_heat_wear_multiplier() -> Decimal {
    Decimal::new(5, 2)
}

fn default_buy_energy() -> ActionSpec {
    ActionSpec {
        cost: Decimal::from(5),
        amount: Decimal::from(5),
    }
}

fn default_repair_wear() -> ActionSpec {
    ActionSpec {
        cost: Decimal::from(5),
        amount: Decimal::from(20),
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_countdown_frame_ms() -> u64 {
    250
}

fn effect(kind: EffectKind, magnitude: Decimal, sign: EffectSign) -> Effect {
    Effect {
        kind,
        magnitude,
        per_level: true,
        sign,
    }
}

/// The stock module catalog.
pub fn default_modules() -> Vec<Module> {
    vec![
        Module {
            id: ModuleId::from("capacitor"),
            name: "Capacitor Bank".to_owned(),
            description: "Stores more energy between refills.".to_owned(),
            level: 0,
            max_level: 5,
            cost: Decimal::from(8),
            cost_increase: Decimal::from(4),
            effects: vec![effect(
                EffectKind::EnergyCapacity,
                Decimal::from(5),
                EffectSign::Increase,
            )],
        },
        Module {
            id: ModuleId::from("press"),
            name: "Token Press".to_owned(),
            description: "Stamps more tokens per tick and widens the hopper.".to_owned(),
            level: 0,
            max_level: 5,
            cost: Decimal::from(10),
            cost_increase: Decimal::from(6),
            effects: vec![
                effect(EffectKind::ProductionRate, Decimal::ONE, EffectSign::Increase),
                effect(EffectKind::OutputCapacity, Decimal::TEN, EffectSign::Increase),
            ],
        },
        Module {
            id: ModuleId::from("bearings"),
            name: "Ceramic Bearings".to_owned(),
            description: "Slows mechanical wear.".to_owned(),
            level: 0,
            max_level: 3,
            cost: Decimal::from(12),
            cost_increase: Decimal::from(8),
            effects: vec![effect(
                EffectKind::WearRate,
                Decimal::new(5, 3),
                EffectSign::Decrease,
            )],
        },
        Module {
            id: ModuleId::from("governor"),
            name: "Load Governor".to_owned(),
            description: "Trims the energy drain.".to_owned(),
            level: 0,
            max_level: 3,
            cost: Decimal::from(15),
            cost_increase: Decimal::TEN,
            effects: vec![effect(
                EffectKind::ConsumptionRate,
                Decimal::new(25, 2),
                EffectSign::Decrease,
            )],
        },
        Module {
            id: ModuleId::from("service-contract"),
            name: "Service Contract".to_owned(),
            description: "Cheaper repairs and bigger energy deliveries.".to_owned(),
            level: 0,
            max_level: 2,
            cost: Decimal::from(20),
            cost_increase: Decimal::from(15),
            effects: vec![
                Effect {
                    kind: EffectKind::RepairWearCost,
                    magnitude: Decimal::new(2, 1),
                    per_level: false,
                    sign: EffectSign::Decrease,
                },
                Effect {
                    kind: EffectKind::BuyEnergyAmount,
                    magnitude: Decimal::new(5, 1),
                    per_level: false,
                    sign: EffectSign::Increase,
                },
            ],
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clock.tick_interval_ms, 2000);
        assert_eq!(config.energy.capacity, dec!(10));
        assert_eq!(config.wear.base_rate_per_tick, dec!(0.02));
        assert!(config.heat.is_none());
        assert_eq!(config.modules.len(), 5);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = MachineConfig::parse("").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "clock:\n  tick_interval_ms: 4000\n";
        let config = MachineConfig::parse(yaml).unwrap();
        assert_eq!(config.clock.tick_interval_ms, 4000);
        // Everything else uses defaults
        assert_eq!(config.output.production_per_tick, dec!(2));
        assert_eq!(config.modules.len(), 5);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
clock:
  tick_interval_ms: 3000
  min_tick_interval_ms: 250
  auto_start: false

energy:
  initial: 20
  capacity: 25
  consumption_per_tick: 1.5
  cost_growth_per_tick: 0.1

output:
  initial: 4
  capacity: 50
  production_per_tick: 3

wear:
  initial: 0.1
  base_rate_per_tick: 0.01
  overflow_penalty: 0.05

heat:
  max: 80
  gain_per_tick: 4
  dissipation_per_tick: 1
  wear_multiplier: 0.02

actions:
  buy_energy:
    cost: 3
    amount: 10
  repair_wear:
    cost: 7
    amount: 25

modules:
  - id: coolant
    name: Coolant Loop
    max_level: 2
    cost: 9
    cost_increase: 3
    effects:
      - kind: heat_dissipation
        magnitude: 2
        per_level: true
      - kind: repair_wear_cost
        magnitude: 0.5
        sign: decrease

simulation:
  max_ticks: 100

logging:
  level: debug
  json: true

presentation:
  countdown_frame_ms: 0
  json_snapshots: true
"#;

        let config = MachineConfig::parse(yaml).unwrap();
        assert_eq!(config.clock.min_tick_interval_ms, 250);
        assert!(!config.clock.auto_start);
        assert_eq!(config.energy.consumption_per_tick, dec!(1.5));
        assert_eq!(config.wear.overflow_penalty, dec!(0.05));
        let heat = config.heat.unwrap();
        assert_eq!(heat.max, dec!(80));
        assert_eq!(heat.initial, Decimal::ZERO);
        assert_eq!(config.actions.repair_wear.amount, dec!(25));
        assert_eq!(config.modules.len(), 1);
        let coolant = &config.modules[0];
        assert_eq!(coolant.level, 0);
        assert_eq!(coolant.effects[1].kind, EffectKind::RepairWearCost);
        assert_eq!(coolant.effects[1].sign, EffectSign::Decrease);
        assert!(!coolant.effects[1].per_level);
        assert_eq!(config.simulation.max_ticks, 100);
        assert!(config.logging.json);
        assert!(config.presentation.json_snapshots);
    }

    #[test]
    fn reject_initial_above_capacity() {
        let yaml = "energy:\n  initial: 12\n  capacity: 10\n";
        let err = MachineConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn reject_wear_outside_unit_interval() {
        let yaml = "wear:\n  initial: 1.5\n";
        assert!(MachineConfig::parse(yaml).is_err());
    }

    #[test]
    fn reject_non_increasing_module_cost() {
        let mut config = MachineConfig::default();
        config.modules[0].cost_increase = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_prebought_module_levels() {
        let mut config = MachineConfig::default();
        config.modules[0].level = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("level must start at 0"), "{err}");

        config.modules[0].level = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_duplicate_module_ids() {
        let mut config = MachineConfig::default();
        let copy = config.modules[0].clone();
        config.modules.push(copy);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate module id"));
    }

    #[test]
    fn reject_interval_below_minimum() {
        let yaml = "clock:\n  tick_interval_ms: 50\n";
        assert!(MachineConfig::parse(yaml).is_err());
    }

    #[test]
    fn reject_invalid_yaml() {
        let err = MachineConfig::parse("clock: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("machine-config.yaml");
        if path.exists() {
            let config = MachineConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert_eq!(config.unwrap().modules, default_modules());
        }
    }
}
