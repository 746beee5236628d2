//! Read-only queries for presentation layers.
//!
//! None of these mutate state or advance the nonce.

use strum::IntoEnumIterator;

use crate::combat::{self, CombatAction};
use crate::encounter::{self, NpcAction, ShrineAction, TrapAction};
use crate::env::GameEnv;
use crate::state::{Actor, Encounter, EnemyRank, GameState, Stance};
use crate::stats::EffectiveStats;
use crate::sustained::{self, SustainedError};
use crate::tier::NarrativeOutcome;

use super::{Command, dispatch::dispatch};

pub fn effective_stats(state: &GameState) -> EffectiveStats {
    state.player.effective_stats()
}

/// Flee chance against the current enemy. `None` outside combat or against a boss.
pub fn flee_chance(state: &GameState, env: &GameEnv<'_>) -> Option<u32> {
    let enemy = state.encounter.enemy()?;
    (enemy.rank != EnemyRank::Boss).then(|| combat::flee_chance(state, env.config()))
}

/// Disarm chance for the active trap, if any.
pub fn disarm_chance(state: &GameState, env: &GameEnv<'_>) -> Option<u32> {
    match &state.encounter {
        Encounter::Trap(trap) => Some(encounter::disarm_chance(
            &state.player,
            &trap.trap,
            env.config(),
        )),
        _ => None,
    }
}

pub fn can_activate(state: &GameState, id: &str) -> Result<(), SustainedError> {
    sustained::can_activate(&state.player, id)
}

/// Every command the engine would accept right now.
///
/// Narrative choices are represented by a `nothing` outcome; the actual
/// outcome is supplied by the narration layer when the command is issued.
pub fn available_actions(state: &GameState, env: &GameEnv<'_>) -> Vec<Command> {
    let mut candidates = Vec::new();
    match &state.encounter {
        Encounter::Combat(combat) if !combat.phase.is_terminal() => {
            candidates.push(Command::Combat(CombatAction::Attack));
            candidates.extend(
                state
                    .player
                    .abilities
                    .iter()
                    .map(|a| Command::Combat(CombatAction::Ability(a.id.clone()))),
            );
            let mut items: Vec<&str> = state
                .player
                .inventory
                .iter()
                .filter(|item| item.consumable.is_some())
                .map(|item| item.id.as_str())
                .collect();
            items.dedup();
            candidates.extend(
                items
                    .into_iter()
                    .map(|id| Command::Combat(CombatAction::UseItem(id.to_owned()))),
            );
            candidates.push(Command::Combat(CombatAction::Flee));
        }
        Encounter::Trap(trap) if !trap.resolved => {
            candidates.extend(
                [TrapAction::Disarm, TrapAction::Trigger, TrapAction::Avoid].map(Command::Trap),
            );
        }
        Encounter::Shrine(shrine) if !shrine.resolved => {
            candidates.push(Command::Shrine(ShrineAction::Accept(NarrativeOutcome::nothing())));
            candidates.push(Command::Shrine(ShrineAction::Desecrate));
            candidates.push(Command::Shrine(ShrineAction::Leave));
        }
        Encounter::Npc(npc) if !npc.resolved => {
            candidates.extend(
                (0..npc.npc.wares.len()).map(|index| Command::Npc(NpcAction::Trade { index })),
            );
            candidates.push(Command::Npc(NpcAction::Help));
            candidates.push(Command::Npc(NpcAction::Talk(NarrativeOutcome::nothing())));
            candidates.push(Command::Npc(NpcAction::Attack));
            candidates.push(Command::Npc(NpcAction::Leave));
        }
        _ => candidates.push(Command::Explore),
    }

    candidates.extend(
        Stance::iter()
            .filter(|stance| *stance != state.player.stance)
            .map(Command::SetStance),
    );
    for ability in &state.player.sustained {
        candidates.push(if ability.active {
            Command::DeactivateSustained(ability.id().to_owned())
        } else {
            Command::ActivateSustained(ability.id().to_owned())
        });
    }

    candidates
        .into_iter()
        .filter(|command| dispatch(&mut state.clone(), env, command).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::state::{CharacterClass, Player};
    use crate::tier::PieceManifest;

    #[test]
    fn idle_player_can_explore_and_toggle() {
        let config = GameConfig::default();
        let pieces = PieceManifest::default();
        let env = GameEnv::new(&config, &pieces, &[]);
        let mut state = GameState::new(1, Player::new("Ash", CharacterClass::Mage));
        // pick a seed whose first room needs no bestiary
        state.seed = (0..100)
            .find(|seed| {
                let mut s = state.clone();
                s.seed = *seed;
                dispatch(&mut s, &env, &Command::Explore).is_ok()
            })
            .unwrap();

        let actions = available_actions(&state, &env);
        assert!(actions.contains(&Command::Explore));
        assert!(actions.contains(&Command::ActivateSustained("mana_shield".into())));
        assert!(actions.contains(&Command::SetStance(Stance::Defensive)));
        assert!(!actions.contains(&Command::Combat(CombatAction::Attack)));
    }

    #[test]
    fn flee_chance_only_in_combat() {
        let config = GameConfig::default();
        let pieces = PieceManifest::default();
        let env = GameEnv::new(&config, &pieces, &[]);
        let state = GameState::new(1, Player::new("Ash", CharacterClass::Rogue));
        assert_eq!(flee_chance(&state, &env), None);
        assert_eq!(disarm_chance(&state, &env), None);
        assert!(can_activate(&state, "blade_dance").is_err());
    }
}
