//! Non-combat encounter resolvers and room generation.
//!
//! Every resolver turns a player choice into an ordered effect list, runs it
//! through the effect pipeline and marks the encounter settled.

mod npc;
mod room;
mod shrine;
mod trap;

pub use npc::{NpcAction, npc_combatant, resolve_npc};
pub use room::{RoomType, explore, roll_room_type};
pub use shrine::{ShrineAction, ShrineOutcome, resolve_shrine};
pub use trap::{TrapAction, TrapOutcome, avoid_chance, disarm_chance, resolve_trap};

use crate::effect::{Effect, apply_effects};
use crate::events::GameEvent;
use crate::state::GameState;

/// Applies resolver effects and converts the report into events.
fn apply(state: &mut GameState, effects: Vec<Effect>) -> Vec<GameEvent> {
    if effects.is_empty() {
        return Vec::new();
    }
    let report = apply_effects(state, effects);
    GameEvent::from_report(&report, None)
}
