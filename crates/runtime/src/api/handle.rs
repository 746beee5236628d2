//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting commands, managing checkpoints and streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Command, CommandOutcome, GameState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::narration::Consultation;
use crate::repository::Checkpoint;
use crate::workers::WorkerCommand;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<WorkerCommand>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<WorkerCommand>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> WorkerCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit a command. Resolves once the command is committed and narrated,
    /// or rejected.
    pub async fn submit(&self, command: Command) -> Result<CommandOutcome> {
        self.request(|reply| WorkerCommand::Submit { command, reply })
            .await
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| WorkerCommand::QueryState { reply }).await
    }

    /// Commands the player may issue right now.
    pub async fn available_actions(&self) -> Result<Vec<Command>> {
        self.request(|reply| WorkerCommand::AvailableActions { reply })
            .await
    }

    /// Ask the narration collaborator for a shrine or NPC tier selection.
    ///
    /// Nothing is applied; pass the outcome to an `Accept` or `Talk` command.
    pub async fn consult(&self) -> Result<Consultation> {
        self.request(|reply| WorkerCommand::Consult { reply }).await
    }

    /// Save the current state under `label`, replacing any previous checkpoint.
    pub async fn checkpoint(&self, label: impl Into<String>) -> Result<Checkpoint> {
        let label = label.into();
        self.request(|reply| WorkerCommand::Checkpoint { label, reply })
            .await?
    }

    /// Replace the current state with the checkpoint saved under `label`.
    pub async fn restore(&self, label: impl Into<String>) -> Result<GameState> {
        let label = label.into();
        self.request(|reply| WorkerCommand::Restore { label, reply })
            .await?
    }

    pub async fn list_checkpoints(&self) -> Result<Vec<String>> {
        self.request(|reply| WorkerCommand::ListCheckpoints { reply })
            .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Committed and rejected commands, checkpoints
    /// - `Topic::Narration` - Journal lines
    /// - `Topic::Lore` - Elite and boss lore lifecycle
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut game_rx = handle.subscribe(Topic::GameState);
    /// while let Ok(event) = game_rx.recv().await {
    ///     // Handle game state events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
