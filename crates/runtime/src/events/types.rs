//! Event payloads published on each topic.

use serde::{Deserialize, Serialize};

use game_core::{ActionError, Command, EntityId, GameEvent};

/// Authoritative state transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// A command was committed. `nonce` is the nonce it was resolved with.
    CommandApplied {
        nonce: u64,
        command: Command,
        events: Vec<GameEvent>,
    },
    /// A command was rejected; the state is unchanged.
    CommandRejected {
        nonce: u64,
        command: Command,
        reason: ActionError,
    },
    CheckpointSaved {
        label: String,
        nonce: u64,
    },
    CheckpointRestored {
        label: String,
        nonce: u64,
    },
}

/// Text attached to the journal after a command was committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NarrationEvent {
    Narrated {
        nonce: u64,
        text: String,
        /// True when the collaborator failed and a generic line was used.
        fallback: bool,
    },
}

/// Lifecycle of background lore requests for elite and boss enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoreEvent {
    Requested { enemy: EntityId },
    Attached { enemy: EntityId, lore: String },
    /// The request finished after the enemy stopped being current.
    Discarded { enemy: EntityId },
    /// The request was aborted before it finished.
    Cancelled { enemy: EntityId },
    Failed { enemy: EntityId, error: String },
}
