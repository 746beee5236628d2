//! Shrine resolution.

use super::apply;
use crate::combat::DamageType;
use crate::effect::{Effect, Target};
use crate::engine::ActionError;
use crate::env::RollStream;
use crate::events::GameEvent;
use crate::state::{
    EffectSource, Encounter, EncounterKind, GameState, Shrine, ShrineCost, ShrineKind,
};
use crate::tier::{
    NarrativeOutcome, OutcomeKind, PieceManifest, Tier, resolve_blessing, resolve_curse,
    resolve_outcome,
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShrineAction {
    /// Pay the shrine's cost and receive the narrated outcome.
    Accept(NarrativeOutcome),
    /// Defile a dark shrine for a gamble.
    Desecrate,
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShrineOutcome {
    Accepted { kind: OutcomeKind },
    Blessed,
    Cursed,
    Exploded { damage: u32 },
    Left,
}

/// Desecration bands: blessing up to 35, curse up to 75, explosion beyond.
const DESECRATE_BLESSING: u32 = 35;
const DESECRATE_CURSE: u32 = 75;

impl Shrine {
    pub fn generate(rolls: &mut RollStream, floor: u32) -> Self {
        let (kind, name, cost) = match rolls.range(0, 3) {
            0 => (
                ShrineKind::Light,
                "Shrine of Light",
                ShrineCost {
                    gold: 10 * floor,
                    health: 0,
                },
            ),
            1 => (
                ShrineKind::Dark,
                "Dark Altar",
                ShrineCost {
                    gold: 0,
                    health: 10,
                },
            ),
            2 => (ShrineKind::Nature, "Overgrown Shrine", ShrineCost::default()),
            _ => (
                ShrineKind::Ancient,
                "Ancient Monolith",
                ShrineCost {
                    gold: 20 * floor,
                    health: 0,
                },
            ),
        };
        Self {
            name: name.to_owned(),
            kind,
            cost,
        }
    }
}

pub fn resolve_shrine(
    state: &mut GameState,
    action: &ShrineAction,
    pieces: &PieceManifest,
    rolls: &mut RollStream,
) -> Result<Vec<GameEvent>, ActionError> {
    let shrine = match &state.encounter {
        Encounter::Shrine(shrine) if shrine.resolved => return Err(ActionError::EncounterResolved),
        Encounter::Shrine(shrine) => shrine.shrine.clone(),
        other => {
            return Err(ActionError::WrongEncounter {
                expected: EncounterKind::Shrine,
                found: other.kind(),
            });
        }
    };

    let (outcome, effects) = match action {
        ShrineAction::Accept(narrative) => {
            let cost = shrine.cost;
            let player = &state.player;
            let short_of_health = cost.health > 0 && player.stats.health() <= cost.health;
            if player.gold < cost.gold || short_of_health {
                return Err(ActionError::CannotAfford {
                    gold: cost.gold,
                    health: cost.health,
                });
            }
            let mut effects = Vec::new();
            if cost.gold > 0 {
                effects.push(Effect::ModifyGold {
                    amount: -(cost.gold as i64),
                });
            }
            if cost.health > 0 {
                effects.push(Effect::damage(Target::Player, cost.health, DamageType::True));
            }
            effects.extend(resolve_outcome(narrative, pieces, rolls, EffectSource::Shrine)?);
            (ShrineOutcome::Accepted { kind: narrative.kind }, effects)
        }
        ShrineAction::Desecrate => {
            if shrine.kind != ShrineKind::Dark {
                return Err(ActionError::NotDarkShrine);
            }
            let roll = rolls.roll_d100();
            if roll <= DESECRATE_BLESSING {
                let blessing = resolve_blessing(Tier::Major, EffectSource::Shrine);
                (ShrineOutcome::Blessed, vec![Effect::status(Target::Player, blessing)])
            } else if roll <= DESECRATE_CURSE {
                let curse = resolve_curse(Tier::Standard, EffectSource::Shrine);
                (ShrineOutcome::Cursed, vec![Effect::status(Target::Player, curse)])
            } else {
                let damage = rolls.range(10, 20) + 2 * state.floor;
                (
                    ShrineOutcome::Exploded { damage },
                    vec![Effect::damage(Target::Player, damage, DamageType::Fire)],
                )
            }
        }
        ShrineAction::Leave => (ShrineOutcome::Left, Vec::new()),
    };

    let mut events = vec![GameEvent::ShrineResolved { outcome }];
    events.extend(apply(state, effects));
    if let Encounter::Shrine(shrine) = &mut state.encounter {
        shrine.resolved = true;
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterClass, Player, ShrineState};

    fn state(kind: ShrineKind, cost: ShrineCost) -> GameState {
        let mut state = GameState::new(9, Player::new("Oda", CharacterClass::Cleric));
        state.encounter = Encounter::Shrine(ShrineState {
            shrine: Shrine {
                name: "Altar".into(),
                kind,
                cost,
            },
            resolved: false,
        });
        state
    }

    #[test]
    fn unaffordable_offer_is_rejected() {
        let mut s = state(
            ShrineKind::Light,
            ShrineCost {
                gold: 50,
                health: 0,
            },
        );
        let mut rolls = s.rolls();
        let result = resolve_shrine(
            &mut s,
            &ShrineAction::Accept(NarrativeOutcome::blessing(Tier::Minor)),
            &PieceManifest::default(),
            &mut rolls,
        );
        assert_eq!(result, Err(ActionError::CannotAfford { gold: 50, health: 0 }));
        assert!(!s.encounter.is_settled());
    }

    #[test]
    fn accepting_pays_the_cost() {
        let mut s = state(
            ShrineKind::Light,
            ShrineCost {
                gold: 20,
                health: 0,
            },
        );
        s.player.gold = 30;
        let mut rolls = s.rolls();
        resolve_shrine(
            &mut s,
            &ShrineAction::Accept(NarrativeOutcome::blessing(Tier::Minor)),
            &PieceManifest::default(),
            &mut rolls,
        )
        .unwrap();
        assert_eq!(s.player.gold, 10);
        assert!(s.player.statuses.contains("blessing:minor"));
        assert!(s.encounter.is_settled());
    }

    #[test]
    fn only_dark_shrines_can_be_desecrated() {
        let mut s = state(ShrineKind::Nature, ShrineCost::default());
        let mut rolls = s.rolls();
        assert_eq!(
            resolve_shrine(&mut s, &ShrineAction::Desecrate, &PieceManifest::default(), &mut rolls),
            Err(ActionError::NotDarkShrine)
        );
    }

    #[test]
    fn desecration_lands_in_one_band() {
        for nonce in 0..40 {
            let mut s = state(ShrineKind::Dark, ShrineCost::default());
            s.nonce = nonce;
            let mut rolls = s.rolls();
            let pieces = PieceManifest::default();
            let events =
                resolve_shrine(&mut s, &ShrineAction::Desecrate, &pieces, &mut rolls).unwrap();
            match events[0] {
                GameEvent::ShrineResolved {
                    outcome: ShrineOutcome::Blessed,
                } => assert!(s.player.statuses.contains("blessing:major")),
                GameEvent::ShrineResolved {
                    outcome: ShrineOutcome::Cursed,
                } => assert!(s.player.statuses.contains("curse:standard")),
                GameEvent::ShrineResolved {
                    outcome: ShrineOutcome::Exploded { damage },
                } => {
                    assert!((12..=22).contains(&damage));
                    assert_eq!(s.player.stats.health(), s.player.stats.max_health() - damage);
                }
                ref other => panic!("unexpected event {other:?}"),
            }
        }
    }
}
