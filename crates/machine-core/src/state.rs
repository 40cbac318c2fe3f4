//! The mutable machine state shared by the tick cycle and the dispatcher.

use machine_types::{
    ActionSpec, EnergyResource, HaltReason, HeatResource, OutputResource, ServiceAction,
    WearResource,
};

use crate::config::MachineConfig;
use crate::effects::ModuleRegistry;

/// Current parameters of the two service actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBook {
    /// `buy-energy` cost and energy granted.
    pub buy_energy: ActionSpec,
    /// `repair-wear` cost and wear percent removed.
    pub repair_wear: ActionSpec,
}

impl ServiceBook {
    /// Parameters of `service`.
    pub const fn get(&self, service: ServiceAction) -> &ActionSpec {
        match service {
            ServiceAction::BuyEnergy => &self.buy_energy,
            ServiceAction::RepairWear => &self.repair_wear,
        }
    }

    /// Mutable parameters of `service`.
    pub const fn get_mut(&mut self, service: ServiceAction) -> &mut ActionSpec {
        match service {
            ServiceAction::BuyEnergy => &mut self.buy_energy,
            ServiceAction::RepairWear => &mut self.repair_wear,
        }
    }
}

/// Everything the tick cycle and the dispatcher mutate.
///
/// There is exactly one of these per session; it is passed by reference
/// into every operation rather than living in a global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    /// Energy pool.
    pub energy: EnergyResource,
    /// Token pool.
    pub output: OutputResource,
    /// Wear.
    pub wear: WearResource,
    /// Heat, when modeled.
    pub heat: Option<HeatResource>,
    /// Service action parameters.
    pub services: ServiceBook,
    /// Module catalog with levels.
    pub modules: ModuleRegistry,
}

impl MachineState {
    /// Build a fresh state from configuration.
    pub fn from_config(config: &MachineConfig) -> Self {
        Self {
            energy: config.energy.to_resource(),
            output: config.output.to_resource(),
            wear: config.wear.to_resource(),
            heat: config.heat.as_ref().map(crate::config::HeatConfig::to_resource),
            services: ServiceBook {
                buy_energy: config.actions.buy_energy.clone(),
                repair_wear: config.actions.repair_wear.clone(),
            },
            modules: ModuleRegistry::new(config.modules.clone()),
        }
    }

    /// The terminal condition currently holding, if any.
    ///
    /// Energy exhaustion is reported ahead of wear when both hold.
    pub fn halt_condition(&self) -> Option<HaltReason> {
        if self.energy.is_depleted() {
            Some(HaltReason::EnergyDepleted)
        } else if self.wear.is_maxed() {
            Some(HaltReason::WearMaxed)
        } else {
            None
        }
    }
}
