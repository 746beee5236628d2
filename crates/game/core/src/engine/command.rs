//! Commands accepted by the engine.

use crate::combat::CombatAction;
use crate::encounter::{NpcAction, ShrineAction, TrapAction};
use crate::state::{EnemyTemplate, Stance};

/// A single player decision. Every state change goes through one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Enter the next room of the floor.
    Explore,
    /// Start combat against a specific template, scaled to the current floor.
    Engage(EnemyTemplate),
    Combat(CombatAction),
    /// Free action.
    SetStance(Stance),
    /// Free action.
    ActivateSustained(String),
    /// Free action.
    DeactivateSustained(String),
    Trap(TrapAction),
    Shrine(ShrineAction),
    Npc(NpcAction),
}

impl Command {
    /// Short label for logs and narration prompts.
    pub fn label(&self) -> String {
        match self {
            Self::Explore => "explore".to_owned(),
            Self::Engage(template) => format!("engage {}", template.id),
            Self::Combat(CombatAction::Attack) => "attack".to_owned(),
            Self::Combat(CombatAction::Ability(id)) => format!("ability {id}"),
            Self::Combat(CombatAction::UseItem(id)) => format!("use {id}"),
            Self::Combat(CombatAction::Flee) => "flee".to_owned(),
            Self::SetStance(stance) => format!("stance {stance}"),
            Self::ActivateSustained(id) => format!("activate {id}"),
            Self::DeactivateSustained(id) => format!("deactivate {id}"),
            Self::Trap(action) => format!("trap {action}"),
            Self::Shrine(ShrineAction::Accept(outcome)) => {
                format!("shrine accept {}", outcome.kind)
            }
            Self::Shrine(ShrineAction::Desecrate) => "shrine desecrate".to_owned(),
            Self::Shrine(ShrineAction::Leave) => "shrine leave".to_owned(),
            Self::Npc(NpcAction::Trade { index }) => format!("trade {index}"),
            Self::Npc(NpcAction::Help) => "help".to_owned(),
            Self::Npc(NpcAction::Talk(outcome)) => format!("talk {}", outcome.kind),
            Self::Npc(NpcAction::Attack) => "attack npc".to_owned(),
            Self::Npc(NpcAction::Leave) => "leave".to_owned(),
        }
    }

    /// Free actions never advance combat.
    pub fn is_free(&self) -> bool {
        matches!(
            self,
            Self::SetStance(_) | Self::ActivateSustained(_) | Self::DeactivateSustained(_)
        )
    }
}
