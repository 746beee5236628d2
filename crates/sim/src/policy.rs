//! Scripted player policy for headless runs.

use async_trait::async_trait;

use game_content::ContentBundle;
use game_core::state::Encounter;
use game_core::{CombatAction, Command, GameState, ShrineAction, TrapAction};
use runtime::{CommandProvider, Intent};

/// Drinks potions when hurt, otherwise attacks; disarms traps it is
/// likely to beat, accepts affordable shrines and talks to strangers.
pub struct ScriptedPolicy {
    content: ContentBundle,
    potion_below_percent: u32,
    disarm_from_percent: u32,
}

impl ScriptedPolicy {
    pub fn new(content: ContentBundle) -> Self {
        Self {
            content,
            potion_below_percent: 35,
            disarm_from_percent: 50,
        }
    }

    fn combat(&self, state: &GameState, available: &[Command]) -> Intent {
        let hurt = state.player.stats.health_percent() < self.potion_below_percent;
        let potion = available
            .iter()
            .find(|c| matches!(c, Command::Combat(CombatAction::UseItem(_))));

        match potion {
            Some(potion) if hurt => Intent::Submit(potion.clone()),
            _ => Intent::Submit(Command::Combat(CombatAction::Attack)),
        }
    }

    fn trap(&self, state: &GameState) -> Intent {
        let chance = game_core::engine::disarm_chance(state, &self.content.env()).unwrap_or(0);
        let action = if chance >= self.disarm_from_percent {
            TrapAction::Disarm
        } else {
            TrapAction::Avoid
        };
        Intent::Submit(Command::Trap(action))
    }
}

#[async_trait]
impl CommandProvider for ScriptedPolicy {
    async fn decide(&self, state: &GameState, available: &[Command]) -> runtime::Result<Intent> {
        if state.is_defeated() {
            return Ok(Intent::Stop);
        }

        let intent = match &state.encounter {
            Encounter::Combat(combat) if !combat.phase.is_terminal() => {
                self.combat(state, available)
            }
            Encounter::Trap(trap) if !trap.resolved => self.trap(state),
            Encounter::Shrine(shrine) if !shrine.resolved => {
                let cost = shrine.shrine.cost;
                if state.player.gold >= cost.gold && state.player.stats.health() > cost.health {
                    Intent::AcceptShrine
                } else {
                    Intent::Submit(Command::Shrine(ShrineAction::Leave))
                }
            }
            Encounter::Npc(npc) if !npc.resolved => Intent::TalkToNpc,
            _ => Intent::Submit(Command::Explore),
        };

        // Stop rather than resubmit something the engine keeps rejecting.
        if let Intent::Submit(command) = &intent {
            if !available.contains(command) {
                return Ok(Intent::Stop);
            }
        }
        Ok(intent)
    }
}
