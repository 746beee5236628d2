//! NPC interactions.

use super::apply;
use crate::combat::{DamageType, start_combat};
use crate::config::GameConfig;
use crate::effect::Effect;
use crate::engine::ActionError;
use crate::env::RollStream;
use crate::events::GameEvent;
use crate::state::{
    Combatant, EffectSource, EncounterKind, Encounter, EnemyRank, EnemyTemplate, EntityId,
    GameState, Item, LootEntry, Npc, NpcKind, Rewards, Ware,
};
use crate::tier::{NarrativeOutcome, PieceManifest, RewardTier, resolve_outcome};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NpcAction {
    /// Buy the ware at `index`.
    Trade { index: usize },
    Help,
    Talk(NarrativeOutcome),
    Attack,
    Leave,
}

impl Npc {
    /// Rolls a random NPC. Combat stats are floor-independent; see [`npc_combatant`].
    pub fn generate(rolls: &mut RollStream) -> Self {
        let (kind, name, wares) = match rolls.range(0, 2) {
            0 => (
                NpcKind::Merchant,
                "Travelling Merchant",
                vec![
                    Ware {
                        item: Item::potion("health_potion", "Health Potion", 30, 0, 15),
                        price: 25,
                    },
                    Ware {
                        item: Item::potion("mana_tonic", "Mana Tonic", 0, 30, 12),
                        price: 20,
                    },
                ],
            ),
            1 => (NpcKind::Wanderer, "Lost Wanderer", Vec::new()),
            _ => (
                NpcKind::Hermit,
                "Cave Hermit",
                vec![Ware {
                    item: Item::potion("herbal_remedy", "Herbal Remedy", 20, 10, 10),
                    price: 15,
                }],
            ),
        };
        Self {
            name: name.to_owned(),
            kind,
            wares,
            max_health: 50,
            attack: 9,
            defense: 3,
        }
    }
}

/// Turns `npc` into a floor-scaled combatant. Wares become possible loot.
pub fn npc_combatant(npc: &Npc, floor: u32, id: EntityId) -> Combatant {
    let template = EnemyTemplate {
        id: format!("npc:{}", npc.kind),
        name: npc.name.clone(),
        max_health: npc.max_health,
        attack: npc.attack,
        defense: npc.defense,
        damage_type: DamageType::Physical,
        weakness: None,
        resistance: None,
        rank: EnemyRank::Normal,
        abilities: Vec::new(),
        rewards: Rewards {
            gold: RewardTier::Medium,
            experience: 20,
        },
        loot: npc
            .wares
            .iter()
            .map(|ware| LootEntry {
                item: ware.item.clone(),
                chance: 50,
            })
            .collect(),
        weight: 0,
    };
    Combatant::scaled(&template, floor, id)
}

pub fn resolve_npc(
    state: &mut GameState,
    action: &NpcAction,
    config: &GameConfig,
    pieces: &PieceManifest,
    rolls: &mut RollStream,
) -> Result<Vec<GameEvent>, ActionError> {
    let npc = match &state.encounter {
        Encounter::Npc(npc) if npc.resolved => return Err(ActionError::EncounterResolved),
        Encounter::Npc(npc) => npc.npc.clone(),
        other => {
            return Err(ActionError::WrongEncounter {
                expected: EncounterKind::Npc,
                found: other.kind(),
            });
        }
    };

    let mut events = Vec::new();
    match action {
        NpcAction::Trade { index } => {
            let ware = npc.wares.get(*index).ok_or(ActionError::UnknownWare(*index))?;
            if state.player.gold < ware.price {
                return Err(ActionError::CannotAfford {
                    gold: ware.price,
                    health: 0,
                });
            }
            events.push(GameEvent::Purchased {
                item: ware.item.name.clone(),
                price: ware.price,
            });
            events.extend(apply(
                state,
                vec![
                    Effect::ModifyGold {
                        amount: -(ware.price as i64),
                    },
                    Effect::GrantItem {
                        item: ware.item.clone(),
                    },
                ],
            ));
        }
        NpcAction::Help => {
            let gold = rolls.range(config.help_gold_min, config.help_gold_max);
            events.push(GameEvent::NpcHelped { gold });
            events.extend(apply(state, vec![Effect::ModifyGold { amount: gold as i64 }]));
        }
        NpcAction::Talk(outcome) => {
            let effects = resolve_outcome(outcome, pieces, rolls, EffectSource::Ai)?;
            events.extend(apply(state, effects));
        }
        NpcAction::Attack => {
            let id = state.allocate_id();
            let enemy = npc_combatant(&npc, state.floor, id);
            state.encounter = Encounter::None;
            return Ok(start_combat(state, enemy));
        }
        NpcAction::Leave => events.push(GameEvent::EncounterLeft),
    }

    if let Encounter::Npc(npc) = &mut state.encounter {
        npc.resolved = true;
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterClass, NpcState, Player};

    fn state() -> GameState {
        let mut rolls = RollStream::new(0, 0);
        let mut npc = Npc::generate(&mut rolls);
        npc.kind = NpcKind::Merchant;
        npc.wares = vec![Ware {
            item: Item::potion("health_potion", "Health Potion", 30, 0, 15),
            price: 25,
        }];
        let mut state = GameState::new(4, Player::new("Pell", CharacterClass::Warrior));
        state.encounter = Encounter::Npc(NpcState {
            npc,
            resolved: false,
        });
        state
    }

    #[test]
    fn trade_requires_gold() {
        let config = GameConfig::default();
        let mut s = state();
        let mut rolls = s.rolls();
        let trade = NpcAction::Trade { index: 0 };
        assert_eq!(
            resolve_npc(&mut s, &trade, &config, &PieceManifest::default(), &mut rolls),
            Err(ActionError::CannotAfford { gold: 25, health: 0 })
        );

        s.player.gold = 40;
        resolve_npc(&mut s, &trade, &config, &PieceManifest::default(), &mut rolls).unwrap();
        assert_eq!(s.player.gold, 15);
        assert_eq!(s.player.inventory.len(), 1);
    }

    #[test]
    fn help_pays_within_range() {
        let config = GameConfig::default();
        let mut s = state();
        let mut rolls = s.rolls();
        let pieces = PieceManifest::default();
        resolve_npc(&mut s, &NpcAction::Help, &config, &pieces, &mut rolls).unwrap();
        assert!((config.help_gold_min..=config.help_gold_max).contains(&s.player.gold));
    }

    #[test]
    fn attacking_starts_combat() {
        let config = GameConfig::default();
        let mut s = state();
        s.floor = 3;
        let mut rolls = s.rolls();
        let pieces = PieceManifest::default();
        let events =
            resolve_npc(&mut s, &NpcAction::Attack, &config, &pieces, &mut rolls).unwrap();
        assert!(matches!(events[0], GameEvent::CombatStarted { .. }));
        let enemy = s.encounter.enemy().unwrap();
        assert_eq!(enemy.stats.max_health(), 50 * 130 / 100);
        assert_eq!(enemy.loot.len(), 1);
    }
}
