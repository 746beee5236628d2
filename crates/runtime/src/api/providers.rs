//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`CommandProvider`] implementations so the
//! simulation can run with human input, scripted fixtures, or AI policies.
use async_trait::async_trait;
use game_core::{Command, GameState};

use super::errors::Result;

/// What the provider wants to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(Command),
    /// Accept the pending shrine with a consulted outcome.
    AcceptShrine,
    /// Talk to the pending NPC with a consulted outcome.
    TalkToNpc,
    /// End the run.
    Stop,
}

/// Trait for deciding the next command from the current game state.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// # Arguments
    /// * `state` - Read-only snapshot of the current game state
    /// * `available` - Commands the engine currently accepts
    async fn decide(&self, state: &GameState, available: &[Command]) -> Result<Intent>;
}

/// Always picks the first available command; stops when there is none.
/// Useful for testing or as a fallback.
pub struct FirstAvailableProvider;

#[async_trait]
impl CommandProvider for FirstAvailableProvider {
    async fn decide(&self, _state: &GameState, available: &[Command]) -> Result<Intent> {
        Ok(available
            .first()
            .cloned()
            .map_or(Intent::Stop, Intent::Submit))
    }
}
