//! Ordered application of effects to a game state.
//!
//! Effects are processed strictly in input order; callers order them (damage
//! before status, so a kill short-circuits later effects on the same target).
//! Once the player reaches zero health every remaining effect is rejected.

use crate::state::{Actor, GameState};
use crate::status::{self, ApplyOutcome};

use super::{Effect, Target};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedValue {
    Damage { dealt: u32, remaining: u32 },
    Healed(u32),
    Status(ApplyOutcome),
    Gold { delta: i64, total: u32 },
    ItemGranted,
    Restored(u32),
    Cleansed(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    #[error("target is already defeated")]
    TargetDefeated,
    #[error("player was defeated earlier in this resolution")]
    PlayerDefeated,
    #[error("no enemy to target")]
    NoTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub effect: Effect,
    pub value: AppliedValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectedEffect {
    pub effect: Effect,
    pub reason: RejectReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub applied: Vec<AppliedEffect>,
    pub rejected: Vec<RejectedEffect>,
    pub player_defeated: bool,
    pub enemy_defeated: bool,
}

impl PipelineReport {
    /// Total damage dealt to `target` by this run.
    pub fn damage_to(&self, target: Target) -> u32 {
        self.applied
            .iter()
            .filter(|a| a.effect.target() == target)
            .filter_map(|a| match a.value {
                AppliedValue::Damage { dealt, .. } => Some(dealt),
                _ => None,
            })
            .sum()
    }

    pub fn merge(&mut self, other: PipelineReport) {
        self.applied.extend(other.applied);
        self.rejected.extend(other.rejected);
        self.player_defeated |= other.player_defeated;
        self.enemy_defeated |= other.enemy_defeated;
    }
}

/// Pure form: returns the updated copy and leaves `state` untouched.
pub fn execute_effects(state: &GameState, effects: &[Effect]) -> (GameState, PipelineReport) {
    let mut next = state.clone();
    let report = apply_effects(&mut next, effects.iter().cloned());
    (next, report)
}

/// Applies `effects` in order to `state`.
pub fn apply_effects(
    state: &mut GameState,
    effects: impl IntoIterator<Item = Effect>,
) -> PipelineReport {
    let mut report = PipelineReport {
        player_defeated: !state.player.is_alive(),
        ..PipelineReport::default()
    };

    for effect in effects {
        if report.player_defeated {
            report.rejected.push(RejectedEffect {
                effect,
                reason: RejectReason::PlayerDefeated,
            });
            continue;
        }

        match apply_one(state, &effect) {
            Ok(value) => {
                if matches!(value, AppliedValue::Damage { remaining: 0, .. }) {
                    match effect.target() {
                        Target::Player => report.player_defeated = true,
                        Target::Enemy => report.enemy_defeated = true,
                    }
                }
                report.applied.push(AppliedEffect { effect, value });
            }
            Err(reason) => report.rejected.push(RejectedEffect { effect, reason }),
        }
    }

    report
}

fn apply_one(state: &mut GameState, effect: &Effect) -> Result<AppliedValue, RejectReason> {
    match effect {
        Effect::ModifyGold { amount } => {
            let delta = state.player.adjust_gold(*amount);
            Ok(AppliedValue::Gold {
                delta,
                total: state.player.gold,
            })
        }
        Effect::GrantItem { item } => {
            state.player.inventory.push(item.clone());
            Ok(AppliedValue::ItemGranted)
        }
        Effect::Damage { target, amount, .. } => with_living(state, *target, |actor| {
            let dealt = actor.stats_mut().take_damage(*amount);
            AppliedValue::Damage {
                dealt,
                remaining: actor.stats().health(),
            }
        }),
        Effect::Heal { target, amount } => with_living(state, *target, |actor| {
            AppliedValue::Healed(actor.stats_mut().heal(*amount))
        }),
        Effect::ApplyStatus {
            target,
            status: incoming,
        } => with_living(state, *target, |actor| {
            AppliedValue::Status(status::apply_effect(actor, incoming.clone()))
        }),
        Effect::RestoreResource { target, amount } => with_living(state, *target, |actor| {
            AppliedValue::Restored(actor.stats_mut().restore(*amount))
        }),
        Effect::Cleanse { target, category } => with_living(state, *target, |actor| {
            let removed = status::cleanse(actor, *category);
            AppliedValue::Cleansed(removed.into_iter().map(|e| e.id).collect())
        }),
    }
}

fn with_living(
    state: &mut GameState,
    target: Target,
    f: impl FnOnce(&mut dyn Actor) -> AppliedValue,
) -> Result<AppliedValue, RejectReason> {
    let actor: &mut dyn Actor = match target {
        Target::Player => &mut state.player,
        Target::Enemy => state.encounter.enemy_mut().ok_or(RejectReason::NoTarget)?,
    };
    if !actor.is_alive() {
        return Err(RejectReason::TargetDefeated);
    }
    Ok(f(actor))
}
