//! Player actions, their parameters, and their outcomes.
//!
//! Actions travel as short identifiers (`buy-energy`, `repair-wear`,
//! `upgrade-<module>`), the same strings the presentation layer binds to
//! its controls.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ModuleId;

/// Prefix of upgrade action identifiers.
pub const UPGRADE_PREFIX: &str = "upgrade-";

/// Actions that trade tokens for a resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum ServiceAction {
    /// Spend tokens to refill energy.
    BuyEnergy,
    /// Spend tokens to remove wear.
    RepairWear,
}

impl ServiceAction {
    /// Every service action, in display order.
    pub const ALL: [Self; 2] = [Self::BuyEnergy, Self::RepairWear];

    /// The action identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuyEnergy => "buy-energy",
            Self::RepairWear => "repair-wear",
        }
    }
}

/// Token cost and effect size of a service action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionSpec {
    /// Tokens debited per use.
    #[ts(as = "String")]
    pub cost: Decimal,
    /// Effect size: energy units for `buy-energy`, wear percent for `repair-wear`.
    #[ts(as = "String")]
    pub amount: Decimal,
}

/// Any action a player can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// A resource service.
    Service(ServiceAction),
    /// Buy the next level of a module.
    Upgrade(ModuleId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(service) => f.write_str(service.as_str()),
            Self::Upgrade(id) => write!(f, "{UPGRADE_PREFIX}{id}"),
        }
    }
}

/// Failure to parse an action identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    /// The identifier names no known action.
    #[error("unknown action: {0}")]
    Unknown(String),

    /// `upgrade-` was given without a module slug.
    #[error("upgrade action is missing a module id")]
    MissingModule,
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(slug) = s.strip_prefix(UPGRADE_PREFIX) {
            if slug.is_empty() {
                return Err(ActionParseError::MissingModule);
            }
            return Ok(Self::Upgrade(ModuleId::from(slug)));
        }
        ServiceAction::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .map(Self::Service)
            .ok_or_else(|| ActionParseError::Unknown(s.to_owned()))
    }
}

/// Why an action or purchase was refused. Refusals leave state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// Not enough tokens.
    InsufficientBalance {
        /// Tokens the action costs.
        #[ts(as = "String")]
        required: Decimal,
        /// Tokens held.
        #[ts(as = "String")]
        available: Decimal,
    },
    /// The target resource cannot take more (energy full, wear already 0).
    TargetSaturated,
    /// The action's amount has been scaled down to nothing.
    NoEffect,
    /// The module is already at its highest level.
    MaxLevelReached,
    /// No module with this id exists.
    UnknownModule,
}

/// Result of dispatching an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionOutcome {
    /// The action ran and debited `cost` tokens.
    Executed {
        /// The action that ran.
        action: Action,
        /// Tokens debited.
        #[ts(as = "String")]
        cost: Decimal,
    },
    /// The action was refused; nothing changed.
    Rejected {
        /// The refused action.
        action: Action,
        /// Why it was refused.
        reason: RejectionReason,
    },
}

impl ActionOutcome {
    /// Whether the action ran.
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

/// Terminal conditions that stop the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HaltReason {
    /// Energy reached zero.
    EnergyDepleted,
    /// Wear reached 100%.
    WearMaxed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_through_display() {
        for id in ["buy-energy", "repair-wear", "upgrade-capacitor"] {
            let action: Action = id.parse().unwrap_or(Action::Service(ServiceAction::BuyEnergy));
            assert_eq!(action.to_string(), id);
        }
    }

    #[test]
    fn upgrade_carries_module_slug() {
        let action = "upgrade-coolant-loop".parse::<Action>();
        assert_eq!(action, Ok(Action::Upgrade(ModuleId::from("coolant-loop"))));
    }

    #[test]
    fn bare_upgrade_prefix_is_rejected() {
        assert_eq!(
            "upgrade-".parse::<Action>(),
            Err(ActionParseError::MissingModule)
        );
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert_eq!(
            "overclock".parse::<Action>(),
            Err(ActionParseError::Unknown("overclock".to_owned()))
        );
    }
}
