//! Trap resolution.

use super::apply;
use crate::combat::DamageType;
use crate::config::GameConfig;
use crate::effect::{Effect, Target};
use crate::engine::ActionError;
use crate::env::RollStream;
use crate::events::GameEvent;
use crate::state::{
    Combatant, EffectSource, Encounter, GameState, Player, StatusCategory, StatusEffect, Trap,
    TrapKind,
};
use crate::stats::StatModifiers;
use crate::tier::{RewardKind, RewardTier, resolve_reward_tier};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapAction {
    /// Dexterity against the trap's difficulty.
    Disarm,
    /// Set it off on purpose, bracing for the hit.
    Trigger,
    /// Slip past it.
    Avoid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapOutcome {
    Success,
    Partial,
    Failure,
}

impl Trap {
    /// Rolls a random trap scaled to `floor`.
    pub fn generate(rolls: &mut RollStream, floor: u32) -> Self {
        let (kind, name, dc, damage, damage_type, effect) = match rolls.range(0, 3) {
            0 => (TrapKind::Spikes, "Spike Pit", 8, 8, DamageType::Physical, None),
            1 => (
                TrapKind::FlameJet,
                "Flame Jet",
                10,
                10,
                DamageType::Fire,
                Some(dot("burning", "Burning", -3, 2)),
            ),
            2 => (
                TrapKind::PoisonNeedle,
                "Poison Needle",
                12,
                6,
                DamageType::Poison,
                Some(dot("poisoned", "Poisoned", -4, 3)),
            ),
            _ => (
                TrapKind::RuneWard,
                "Rune Ward",
                14,
                12,
                DamageType::Arcane,
                Some(StatusEffect::new(
                    "hexed",
                    "Hexed",
                    StatusCategory::Debuff,
                    3,
                    StatModifiers::combat(-2, -2),
                    EffectSource::Trap,
                )),
            ),
        };
        Self {
            name: name.to_owned(),
            kind,
            dc: dc + floor.saturating_sub(1),
            damage: damage * Combatant::floor_scale_percent(floor) / 100,
            damage_type,
            effect,
        }
    }
}

fn dot(id: &str, name: &str, per_turn: i32, turns: u32) -> StatusEffect {
    StatusEffect::new(
        id,
        name,
        StatusCategory::Debuff,
        turns,
        StatModifiers::regen(per_turn),
        EffectSource::Trap,
    )
}

/// `disarm_base + (dexterity - dc) × disarm_per_point`, clamped to 5..=95.
pub fn disarm_chance(player: &Player, trap: &Trap, config: &GameConfig) -> u32 {
    let margin = player.attributes.dexterity as i64 - trap.dc as i64;
    GameConfig::clamp_chance(
        config.disarm_base_percent as i64 + margin * config.disarm_per_point as i64,
    )
}

/// `avoid_base + dexterity × avoid_per_dexterity`, clamped to 5..=95.
pub fn avoid_chance(player: &Player, config: &GameConfig) -> u32 {
    GameConfig::clamp_chance(
        config.avoid_base_percent as i64
            + player.attributes.dexterity as i64 * config.avoid_per_dexterity as i64,
    )
}

/// Success at or below `chance`, partial in the band just above, failure beyond.
fn banded(rolls: &mut RollStream, chance: u32, config: &GameConfig) -> TrapOutcome {
    let roll = rolls.roll_d100();
    if roll <= chance {
        TrapOutcome::Success
    } else if roll <= chance + config.partial_band_percent {
        TrapOutcome::Partial
    } else {
        TrapOutcome::Failure
    }
}

/// Resolves the active trap with `action`.
pub fn resolve_trap(
    state: &mut GameState,
    action: TrapAction,
    config: &GameConfig,
    rolls: &mut RollStream,
) -> Result<Vec<GameEvent>, ActionError> {
    let trap = match &state.encounter {
        Encounter::Trap(trap) if trap.resolved => return Err(ActionError::EncounterResolved),
        Encounter::Trap(trap) => trap.trap.clone(),
        other => {
            return Err(ActionError::WrongEncounter {
                expected: crate::state::EncounterKind::Trap,
                found: other.kind(),
            });
        }
    };

    let half = (trap.damage / 2).max(1);
    let hit = |amount| Effect::damage(Target::Player, amount, trap.damage_type);
    let (outcome, effects) = match action {
        TrapAction::Disarm | TrapAction::Avoid => {
            let chance = match action {
                TrapAction::Disarm => disarm_chance(&state.player, &trap, config),
                _ => avoid_chance(&state.player, config),
            };
            match banded(rolls, chance, config) {
                TrapOutcome::Success => (TrapOutcome::Success, Vec::new()),
                TrapOutcome::Partial => (TrapOutcome::Partial, vec![hit(half)]),
                TrapOutcome::Failure => {
                    let mut effects = vec![hit(trap.damage)];
                    effects.extend(trap.effect.clone().map(|s| Effect::status(Target::Player, s)));
                    (TrapOutcome::Failure, effects)
                }
            }
        }
        TrapAction::Trigger => {
            if rolls.chance(config.trigger_salvage_percent) {
                let gold = resolve_reward_tier(RewardKind::Gold, RewardTier::Small, rolls);
                (
                    TrapOutcome::Success,
                    vec![hit(half), Effect::ModifyGold { amount: gold as i64 }],
                )
            } else {
                (TrapOutcome::Partial, vec![hit(half)])
            }
        }
    };

    let mut events = vec![GameEvent::TrapResolved { action, outcome }];
    events.extend(apply(state, effects));
    if let Encounter::Trap(trap) = &mut state.encounter {
        trap.resolved = true;
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterClass, TrapState};

    fn trap(dc: u32) -> Trap {
        Trap {
            name: "Needle".into(),
            kind: TrapKind::PoisonNeedle,
            dc,
            damage: 10,
            damage_type: DamageType::Poison,
            effect: Some(dot("poisoned", "Poisoned", -4, 3)),
        }
    }

    fn state(dc: u32, nonce: u64) -> GameState {
        let mut state = GameState::new(77, Player::new("Nim", CharacterClass::Rogue));
        state.nonce = nonce;
        state.encounter = Encounter::Trap(TrapState {
            trap: trap(dc),
            resolved: false,
        });
        state
    }

    #[test]
    fn disarm_chance_follows_dexterity_margin() {
        let config = GameConfig::default();
        let player = Player::new("Nim", CharacterClass::Rogue);
        assert_eq!(player.attributes.dexterity, 14);
        assert_eq!(disarm_chance(&player, &trap(10), &config), 70);
        assert_eq!(disarm_chance(&player, &trap(40), &config), GameConfig::MIN_CHANCE_PERCENT);
        assert_eq!(disarm_chance(&player, &trap(0), &config), GameConfig::MAX_CHANCE_PERCENT);
    }

    #[test]
    fn failure_applies_damage_and_status() {
        let config = GameConfig::default();
        let (s, events) = (0..100)
            .find_map(|nonce| {
                let mut attempt = state(200, nonce);
                let mut rolls = attempt.rolls();
                let events =
                    resolve_trap(&mut attempt, TrapAction::Disarm, &config, &mut rolls).ok()?;
                matches!(
                    events.first(),
                    Some(GameEvent::TrapResolved {
                        outcome: TrapOutcome::Failure,
                        ..
                    })
                )
                .then_some((attempt, events))
            })
            .expect("a failing roll within 100 attempts");

        assert!(s.player.statuses.contains("poisoned"));
        assert_eq!(s.player.stats.health(), s.player.stats.max_health() - 10);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Damaged { amount: 10, .. })));
    }

    #[test]
    fn resolved_trap_rejects_further_actions() {
        let config = GameConfig::default();
        let mut s = state(10, 3);
        let mut rolls = s.rolls();
        resolve_trap(&mut s, TrapAction::Trigger, &config, &mut rolls).unwrap();
        assert!(s.encounter.is_settled());
        assert_eq!(
            resolve_trap(&mut s, TrapAction::Avoid, &config, &mut rolls),
            Err(ActionError::EncounterResolved)
        );
    }

    #[test]
    fn generated_traps_scale_with_floor() {
        let mut rolls = RollStream::new(5, 5);
        for floor in 1..5 {
            let trap = Trap::generate(&mut rolls, floor);
            assert!(trap.damage >= 6);
            assert!(trap.dc >= 8 + floor - 1);
        }
    }
}
