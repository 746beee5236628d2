//! Command rejection errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::EncounterKind;
use crate::sustained::SustainedError;
use crate::tier::TierError;

/// Why a command was rejected. A rejected command leaves state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// The command targets a different encounter than the active one.
    #[error("expected a {expected} encounter, found {found}")]
    WrongEncounter {
        expected: EncounterKind,
        found: EncounterKind,
    },

    /// A new encounter cannot start while one is unresolved.
    #[error("an encounter is already in progress")]
    EncounterInProgress,

    /// The encounter has already been settled.
    #[error("encounter already resolved")]
    EncounterResolved,

    #[error("the player has been defeated")]
    PlayerDefeated,

    #[error("unknown ability '{0}'")]
    UnknownAbility(String),

    #[error("'{ability}' is on cooldown for {remaining} more rounds")]
    OnCooldown { ability: String, remaining: u32 },

    #[error("not enough resource: need {required}, have {available}")]
    InsufficientResource { required: u32, available: u32 },

    #[error("no item '{0}' in inventory")]
    UnknownItem(String),

    #[error("'{0}' cannot be consumed")]
    NotConsumable(String),

    #[error("there is no escaping this foe")]
    CannotFleeBoss,

    #[error("only dark shrines can be desecrated")]
    NotDarkShrine,

    #[error("cannot afford: need {gold} gold and more than {health} health")]
    CannotAfford { gold: u32, health: u32 },

    #[error("no ware at index {0}")]
    UnknownWare(usize),

    #[error("no enemy templates are available")]
    NoEnemyTemplates,

    #[error(transparent)]
    Sustained(#[from] SustainedError),

    #[error(transparent)]
    Tier(#[from] TierError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            WrongEncounter { .. } | EncounterInProgress | EncounterResolved => {
                ErrorSeverity::Validation
            }
            PlayerDefeated => ErrorSeverity::Fatal,
            UnknownAbility(_) | UnknownItem(_) | NotConsumable(_) | UnknownWare(_) => {
                ErrorSeverity::Validation
            }
            OnCooldown { .. } | InsufficientResource { .. } | CannotAfford { .. } => {
                ErrorSeverity::Recoverable
            }
            CannotFleeBoss | NotDarkShrine => ErrorSeverity::Validation,
            NoEnemyTemplates => ErrorSeverity::Internal,
            Sustained(inner) => inner.severity(),
            Tier(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            WrongEncounter { .. } => "ACTION_WRONG_ENCOUNTER",
            EncounterInProgress => "ACTION_ENCOUNTER_IN_PROGRESS",
            EncounterResolved => "ACTION_ENCOUNTER_RESOLVED",
            PlayerDefeated => "ACTION_PLAYER_DEFEATED",
            UnknownAbility(_) => "ACTION_UNKNOWN_ABILITY",
            OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            NotConsumable(_) => "ACTION_NOT_CONSUMABLE",
            CannotFleeBoss => "ACTION_CANNOT_FLEE_BOSS",
            NotDarkShrine => "ACTION_NOT_DARK_SHRINE",
            CannotAfford { .. } => "ACTION_CANNOT_AFFORD",
            UnknownWare(_) => "ACTION_UNKNOWN_WARE",
            NoEnemyTemplates => "ACTION_NO_ENEMY_TEMPLATES",
            Sustained(inner) => inner.error_code(),
            Tier(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_keep_their_codes() {
        let err: ActionError = SustainedError::Unknown("x".into()).into();
        assert_eq!(err.error_code(), "SUSTAINED_UNKNOWN");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn cooldown_is_recoverable() {
        let err = ActionError::OnCooldown {
            ability: "smite".into(),
            remaining: 1,
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.to_string(), "'smite' is on cooldown for 1 more rounds");
    }
}
