//! Effects and the execution pipeline.
//!
//! An [`Effect`] is a small, concrete instruction produced by a resolver and
//! consumed immediately by [`apply_effects`]. Effects never carry unresolved
//! randomness: reward ranges are rolled before an effect is built.

mod pipeline;

pub use pipeline::{
    AppliedEffect, AppliedValue, PipelineReport, RejectReason, RejectedEffect, apply_effects,
    execute_effects,
};

use crate::combat::DamageType;
use crate::state::{Item, StatusCategory, StatusEffect};

/// Which actor an effect lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Player,
    /// The combatant of the active combat encounter.
    Enemy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Damage {
        target: Target,
        amount: u32,
        damage_type: DamageType,
    },
    Heal {
        target: Target,
        amount: u32,
    },
    ApplyStatus {
        target: Target,
        status: StatusEffect,
    },
    /// Gold always belongs to the player.
    ModifyGold {
        amount: i64,
    },
    GrantItem {
        item: Item,
    },
    RestoreResource {
        target: Target,
        amount: u32,
    },
    Cleanse {
        target: Target,
        category: StatusCategory,
    },
}

impl Effect {
    pub fn damage(target: Target, amount: u32, damage_type: DamageType) -> Self {
        Self::Damage {
            target,
            amount,
            damage_type,
        }
    }

    pub fn heal(target: Target, amount: u32) -> Self {
        Self::Heal { target, amount }
    }

    pub fn status(target: Target, status: StatusEffect) -> Self {
        Self::ApplyStatus { target, status }
    }

    pub fn target(&self) -> Target {
        match self {
            Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::ApplyStatus { target, .. }
            | Self::RestoreResource { target, .. }
            | Self::Cleanse { target, .. } => *target,
            Self::ModifyGold { .. } | Self::GrantItem { .. } => Target::Player,
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, Self::Damage { .. })
    }
}
