//! Named effect fragments ("pieces") referenced by narrative content.
//!
//! A piece id that is not in the manifest is a contract violation: the whole
//! resolution fails and no partial effect list is returned.

use std::collections::BTreeMap;

use crate::combat::DamageType;
use crate::effect::{Effect, Target};
use crate::env::RollStream;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EffectSource, StatusCategory, StatusEffect};

use super::resolve::{resolve_blessing, resolve_curse, resolve_reward_tier};
use super::tables::{RewardKind, RewardTier, Tier};

/// Template for one effect inside a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceEffect {
    Damage {
        target: Target,
        amount: u32,
        damage_type: DamageType,
    },
    Heal {
        target: Target,
        amount: u32,
    },
    /// Heal or gold drawn from the reward table.
    Reward { kind: RewardKind, tier: RewardTier },
    Gold { amount: i64 },
    Blessing { tier: Tier },
    Curse { tier: Tier },
    Status {
        target: Target,
        status: StatusEffect,
    },
    Restore { amount: u32 },
    Cleanse {
        target: Target,
        category: StatusCategory,
    },
}

impl PieceEffect {
    fn instantiate(&self, rolls: &mut RollStream, source: EffectSource) -> Effect {
        match self {
            Self::Damage {
                target,
                amount,
                damage_type,
            } => Effect::damage(*target, *amount, *damage_type),
            Self::Heal { target, amount } => Effect::heal(*target, *amount),
            Self::Reward {
                kind: RewardKind::Heal,
                tier,
            } => Effect::heal(Target::Player, resolve_reward_tier(RewardKind::Heal, *tier, rolls)),
            Self::Reward {
                kind: RewardKind::Gold,
                tier,
            } => Effect::ModifyGold {
                amount: resolve_reward_tier(RewardKind::Gold, *tier, rolls) as i64,
            },
            Self::Gold { amount } => Effect::ModifyGold { amount: *amount },
            Self::Blessing { tier } => {
                Effect::status(Target::Player, resolve_blessing(*tier, source))
            }
            Self::Curse { tier } => Effect::status(Target::Player, resolve_curse(*tier, source)),
            Self::Status { target, status } => Effect::status(*target, status.clone()),
            Self::Restore { amount } => Effect::RestoreResource {
                target: Target::Player,
                amount: *amount,
            },
            Self::Cleanse { target, category } => Effect::Cleanse {
                target: *target,
                category: *category,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub id: String,
    pub description: String,
    pub effects: Vec<PieceEffect>,
}

/// Lookup table of every piece narrative content may reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PieceManifest {
    pieces: BTreeMap<String, Piece>,
}

impl PieceManifest {
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        Self {
            pieces: pieces.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pieces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pieces.keys().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TierError {
    #[error("unresolved piece ids: {}", ids.join(", "))]
    UnresolvedPieces { ids: Vec<String> },
}

impl GameError for TierError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnresolvedPieces { .. } => "TIER_UNRESOLVED_PIECES",
        }
    }
}

/// Expands `ids` into concrete effects, in id order then template order.
pub fn resolve_pieces(
    manifest: &PieceManifest,
    ids: &[String],
    rolls: &mut RollStream,
    source: EffectSource,
) -> Result<Vec<Effect>, TierError> {
    let unknown: Vec<String> = ids.iter().filter(|id| !manifest.contains(id)).cloned().collect();
    if !unknown.is_empty() {
        return Err(TierError::UnresolvedPieces { ids: unknown });
    }

    Ok(ids
        .iter()
        .filter_map(|id| manifest.get(id))
        .flat_map(|piece| piece.effects.iter())
        .map(|template| template.instantiate(rolls, source))
        .collect())
}
