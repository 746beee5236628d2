//! Command routing.

use crate::combat::{resolve_round, start_combat};
use crate::encounter::{explore, resolve_npc, resolve_shrine, resolve_trap};
use crate::env::GameEnv;
use crate::events::GameEvent;
use crate::state::{Combatant, GameState};
use crate::sustained;

use super::{ActionError, Command};

/// Routes `command` to its resolver, mutating `state` in place.
///
/// Callers run this on a scratch copy: on error the copy is discarded.
pub(super) fn dispatch(
    state: &mut GameState,
    env: &GameEnv<'_>,
    command: &Command,
) -> Result<Vec<GameEvent>, ActionError> {
    if state.is_defeated() {
        return Err(ActionError::PlayerDefeated);
    }
    let mut rolls = state.rolls();

    match command {
        Command::Explore => explore(state, env, &mut rolls),
        Command::Engage(template) => {
            if !state.encounter.is_settled() {
                return Err(ActionError::EncounterInProgress);
            }
            let id = state.allocate_id();
            let enemy = Combatant::scaled(template, state.floor, id);
            Ok(start_combat(state, enemy))
        }
        Command::Combat(action) => resolve_round(state, action, env.config()),
        Command::SetStance(stance) => {
            state.player.stance = *stance;
            Ok(vec![GameEvent::StanceChanged { stance: *stance }])
        }
        Command::ActivateSustained(id) => Ok(sustained::activate(&mut state.player, id)?),
        Command::DeactivateSustained(id) => Ok(sustained::deactivate(&mut state.player, id)?),
        Command::Trap(action) => resolve_trap(state, *action, env.config(), &mut rolls),
        Command::Shrine(action) => resolve_shrine(state, action, env.pieces(), &mut rolls),
        Command::Npc(action) => resolve_npc(state, action, env.config(), env.pieces(), &mut rolls),
    }
}
