//! Room generation.

use super::apply;
use crate::combat::start_combat;
use crate::config::GameConfig;
use crate::effect::Effect;
use crate::engine::ActionError;
use crate::env::{GameEnv, RollStream};
use crate::events::GameEvent;
use crate::state::{
    Combatant, Encounter, EnemyRank, EnemyTemplate, EntityId, GameState, Npc, NpcState, Shrine,
    ShrineState, Trap, TrapState,
};
use crate::status;
use crate::tier::{RewardKind, RewardTier, resolve_reward_tier};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomType {
    Combat,
    Trap,
    Shrine,
    Npc,
    Treasure,
    Empty,
    Boss,
}

/// Weights for non-boss rooms, in declaration order.
const ROOM_WEIGHTS: [(RoomType, u32); 6] = [
    (RoomType::Combat, 45),
    (RoomType::Trap, 15),
    (RoomType::Shrine, 15),
    (RoomType::Npc, 10),
    (RoomType::Treasure, 10),
    (RoomType::Empty, 5),
];

/// Rolls the next room. Once the floor's room quota is met the boss waits.
pub fn roll_room_type(rooms_cleared: u32, config: &GameConfig, rolls: &mut RollStream) -> RoomType {
    if rooms_cleared >= config.rooms_per_floor {
        return RoomType::Boss;
    }
    let weights = ROOM_WEIGHTS.map(|(_, weight)| weight);
    rolls
        .weighted(&weights)
        .map_or(RoomType::Empty, |index| ROOM_WEIGHTS[index].0)
}

fn pick_template<'a>(
    bestiary: &'a [EnemyTemplate],
    boss: bool,
    rolls: &mut RollStream,
) -> Option<&'a EnemyTemplate> {
    let candidates: Vec<&EnemyTemplate> = bestiary
        .iter()
        .filter(|t| (t.rank == EnemyRank::Boss) == boss)
        .collect();
    let weights: Vec<u32> = candidates.iter().map(|t| t.weight.max(1)).collect();
    rolls.weighted(&weights).map(|index| candidates[index])
}

/// Moving between rooms is one turn for the player's status effects.
fn travel(state: &mut GameState) -> Vec<GameEvent> {
    let report = status::tick(&mut state.player);
    let mut events = Vec::new();
    if report.damage > 0 || report.healed > 0 {
        events.push(GameEvent::StatusTicked {
            target: EntityId::PLAYER,
            damage: report.damage,
            healed: report.healed,
        });
    }
    events.extend(report.expired.into_iter().map(|effect| GameEvent::StatusExpired {
        target: EntityId::PLAYER,
        status: effect.id,
    }));
    events
}

/// Enters the next room of the current floor.
///
/// Player statuses tick once on the way. A lethal tick ends the run before
/// the room is rolled.
pub fn explore(
    state: &mut GameState,
    env: &GameEnv<'_>,
    rolls: &mut RollStream,
) -> Result<Vec<GameEvent>, ActionError> {
    if !state.encounter.is_settled() {
        return Err(ActionError::EncounterInProgress);
    }
    let mut events = travel(state);
    if state.is_defeated() {
        events.push(GameEvent::Defeat);
        return Ok(events);
    }

    let room = roll_room_type(state.rooms_cleared, env.config(), rolls);
    if room != RoomType::Boss {
        state.rooms_cleared += 1;
    }
    let floor = state.floor;
    events.push(GameEvent::RoomEntered { floor, room });

    let encounter = match room {
        RoomType::Combat | RoomType::Boss => {
            let template = pick_template(env.bestiary(), room == RoomType::Boss, rolls)
                .ok_or(ActionError::NoEnemyTemplates)?;
            let id = state.allocate_id();
            events.extend(start_combat(state, Combatant::scaled(template, floor, id)));
            return Ok(events);
        }
        RoomType::Trap => Encounter::Trap(TrapState {
            trap: Trap::generate(rolls, floor),
            resolved: false,
        }),
        RoomType::Shrine => Encounter::Shrine(ShrineState {
            shrine: Shrine::generate(rolls, floor),
            resolved: false,
        }),
        RoomType::Npc => Encounter::Npc(NpcState {
            npc: Npc::generate(rolls),
            resolved: false,
        }),
        RoomType::Treasure => {
            let gold = resolve_reward_tier(RewardKind::Gold, RewardTier::Medium, rolls);
            events.extend(apply(state, vec![Effect::ModifyGold { amount: gold as i64 }]));
            Encounter::None
        }
        RoomType::Empty => Encounter::None,
    };
    state.encounter = encounter;
    Ok(events)
}
