//! Snapshot handed to narration providers after a command resolves.
//!
//! The context is a plain summary: providers see what happened but never hold
//! a reference into the authoritative state.

use crate::events::GameEvent;
use crate::state::{Actor, EncounterKind, GameState};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSummary {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub statuses: Vec<String>,
}

impl ActorSummary {
    fn of(actor: &dyn Actor) -> Self {
        Self {
            name: actor.name().to_owned(),
            health: actor.stats().health(),
            max_health: actor.stats().max_health(),
            statuses: actor.statuses().iter().map(|s| s.name.clone()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NarrationContext {
    pub nonce: u64,
    pub floor: u32,
    pub command: String,
    pub encounter: EncounterKind,
    pub player: ActorSummary,
    pub enemy: Option<ActorSummary>,
    pub events: Vec<GameEvent>,
}

impl NarrationContext {
    /// Captures the state right after `command` was applied.
    pub fn capture(state: &GameState, command: impl Into<String>, events: &[GameEvent]) -> Self {
        Self {
            nonce: state.nonce,
            floor: state.floor,
            command: command.into(),
            encounter: state.encounter.kind(),
            player: ActorSummary::of(&state.player),
            enemy: state.encounter.enemy().map(|e| ActorSummary::of(e)),
            events: events.to_vec(),
        }
    }
}
