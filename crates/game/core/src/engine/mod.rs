//! Command execution.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! command is resolved against a scratch copy of the state; the copy replaces
//! the original only when the command is accepted, and only then does the
//! nonce advance. A rejected command therefore leaves state bit-identical.

mod command;
mod dispatch;
mod errors;
mod queries;

pub use command::Command;
pub use errors::ActionError;
pub use queries::{available_actions, can_activate, disarm_chance, effective_stats, flee_chance};

use crate::env::GameEnv;
use crate::events::GameEvent;
use crate::state::GameState;

/// Result of submitting a command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandOutcome {
    Applied { events: Vec<GameEvent> },
    Rejected { reason: ActionError },
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn events(&self) -> &[GameEvent] {
        match self {
            Self::Applied { events } => events,
            Self::Rejected { .. } => &[],
        }
    }
}

/// Applies commands to a borrowed state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes `command`, committing the result only on success.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        command: &Command,
    ) -> Result<Vec<GameEvent>, ActionError> {
        let mut next = self.state.clone();
        let events = dispatch::dispatch(&mut next, &env, command)?;
        next.nonce += 1;
        *self.state = next;
        Ok(events)
    }
}

/// Pure form of [`GameEngine::execute`]: returns the next state and the outcome.
///
/// On rejection the returned state equals `state`.
pub fn execute(
    state: &GameState,
    env: GameEnv<'_>,
    command: &Command,
) -> (GameState, CommandOutcome) {
    let mut next = state.clone();
    let outcome = match GameEngine::new(&mut next).execute(env, command) {
        Ok(events) => CommandOutcome::Applied { events },
        Err(reason) => CommandOutcome::Rejected { reason },
    };
    (next, outcome)
}
