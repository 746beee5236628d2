//! Simulation worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), resolves
//! them through the kernel, and publishes events to the [`EventBus`].
//! Narration is requested only after a command has been committed and can
//! never undo or alter it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use game_content::ContentBundle;
use game_core::{Command, CommandOutcome, GameError, GameEvent, GameState, NarrationContext};

use super::lore::{LoreReply, LoreTask};
use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameStateEvent, LoreEvent, NarrationEvent};
use crate::narration::{
    Consultation, FallbackNarrator, LoreRequest, MAX_NARRATION_CHARS, NarrationProvider,
};
use crate::repository::{Checkpoint, CheckpointRepository};

/// Requests that can be sent to the simulation worker
pub enum WorkerCommand {
    /// Resolve a command and narrate it if it was applied.
    Submit {
        command: Command,
        reply: oneshot::Sender<CommandOutcome>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    AvailableActions {
        reply: oneshot::Sender<Vec<Command>>,
    },
    /// Ask the narrator for a tier selection without applying anything.
    Consult {
        reply: oneshot::Sender<Consultation>,
    },
    Checkpoint {
        label: String,
        reply: oneshot::Sender<Result<Checkpoint>>,
    },
    Restore {
        label: String,
        reply: oneshot::Sender<Result<GameState>>,
    },
    ListCheckpoints {
        reply: oneshot::Sender<Result<Vec<String>>>,
    },
}

/// Timing knobs for the worker's calls into the narrator.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    pub narration_timeout: Duration,
    pub lore_timeout: Duration,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    state: GameState,
    content: ContentBundle,
    narrator: Arc<dyn NarrationProvider>,
    repository: Arc<dyn CheckpointRepository>,
    command_rx: mpsc::Receiver<WorkerCommand>,
    event_bus: EventBus,
    config: WorkerConfig,
    lore: Option<LoreTask>,
    lore_tx: mpsc::UnboundedSender<LoreReply>,
    lore_rx: mpsc::UnboundedReceiver<LoreReply>,
}

impl SimulationWorker {
    pub fn new(
        state: GameState,
        content: ContentBundle,
        narrator: Arc<dyn NarrationProvider>,
        repository: Arc<dyn CheckpointRepository>,
        command_rx: mpsc::Receiver<WorkerCommand>,
        event_bus: EventBus,
        config: WorkerConfig,
    ) -> Self {
        info!(
            target: "runtime::worker",
            seed = state.seed,
            nonce = state.nonce,
            floor = state.floor,
            "SimulationWorker initialized"
        );

        let (lore_tx, lore_rx) = mpsc::unbounded_channel();
        Self {
            state,
            content,
            narrator,
            repository,
            command_rx,
            event_bus,
            config,
            lore: None,
            lore_tx,
            lore_rx,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                Some(reply) = self.lore_rx.recv() => self.handle_lore(reply),
            }
        }

        if let Some(task) = self.lore.take() {
            task.abort();
        }
        debug!(target: "runtime::worker", "SimulationWorker stopped");
    }

    async fn handle_command(&mut self, cmd: WorkerCommand) {
        match cmd {
            WorkerCommand::Submit { command, reply } => {
                let outcome = self.handle_submit(command).await;
                if reply.send(outcome).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::AvailableActions { reply } => {
                let actions =
                    game_core::engine::available_actions(&self.state, &self.content.env());
                if reply.send(actions).is_err() {
                    debug!("AvailableActions reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::Consult { reply } => {
                let consultation = self.handle_consult().await;
                if reply.send(consultation).is_err() {
                    debug!("Consult reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::Checkpoint { label, reply } => {
                let result = self.handle_checkpoint(label);
                if reply.send(result).is_err() {
                    debug!("Checkpoint reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::Restore { label, reply } => {
                let result = self.handle_restore(label);
                if reply.send(result).is_err() {
                    debug!("Restore reply channel closed (caller dropped)");
                }
            }
            WorkerCommand::ListCheckpoints { reply } => {
                let result = self.repository.list_labels().map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("ListCheckpoints reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Resolves one command: commit, publish, track lore, then narrate.
    async fn handle_submit(&mut self, command: Command) -> CommandOutcome {
        let nonce = self.state.nonce;
        let (next, outcome) = game_core::execute(&self.state, self.content.env(), &command);

        let events = match &outcome {
            CommandOutcome::Rejected { reason } => {
                let severity = reason.severity();
                if severity.is_internal() {
                    warn!(
                        target: "runtime::worker",
                        nonce,
                        command = %command.label(),
                        code = reason.error_code(),
                        %severity,
                        %reason,
                        "Command rejected"
                    );
                } else {
                    debug!(
                        target: "runtime::worker",
                        nonce,
                        command = %command.label(),
                        code = reason.error_code(),
                        %reason,
                        "Command rejected"
                    );
                }
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::CommandRejected {
                        nonce,
                        command,
                        reason: reason.clone(),
                    }));
                return outcome;
            }
            CommandOutcome::Applied { events } => events,
        };

        self.state = next;
        let label = command.label();
        debug!(
            target: "runtime::worker",
            nonce,
            command = %label,
            events = events.len(),
            "Command applied"
        );
        self.event_bus
            .publish(Event::GameState(GameStateEvent::CommandApplied {
                nonce,
                command,
                events: events.clone(),
            }));

        self.log_milestones(events);
        self.track_lore(events);
        self.narrate(&label, events).await;

        outcome
    }

    fn log_milestones(&self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::RoomEntered { floor, room } => {
                    info!(target: "runtime::worker", floor, %room, "Room entered");
                }
                GameEvent::CombatStarted { name, rank, .. } => {
                    info!(target: "runtime::worker", enemy = %name, %rank, "Combat started");
                }
                GameEvent::Victory { .. } => {
                    info!(target: "runtime::worker", nonce = self.state.nonce, "Victory");
                }
                GameEvent::Defeat => {
                    info!(target: "runtime::worker", nonce = self.state.nonce, "Player defeated");
                }
                GameEvent::LevelUp { level, .. } => {
                    info!(target: "runtime::worker", level, "Level up");
                }
                GameEvent::FloorCleared { floor } => {
                    info!(target: "runtime::worker", floor, "Floor cleared");
                }
                _ => {}
            }
        }
    }

    /// Attaches narration for the command that was just committed.
    async fn narrate(&mut self, label: &str, events: &[GameEvent]) {
        let context = NarrationContext::capture(&self.state, label, events);
        let timeout = self.config.narration_timeout;

        let text = match tokio::time::timeout(timeout, self.narrator.narrate(&context)).await {
            Ok(Ok(response)) => Some(response.sanitized_text()).filter(|t| !t.is_empty()),
            Ok(Err(error)) => {
                warn!(target: "runtime::narration", %error, "Narration failed, using fallback");
                None
            }
            Err(_) => {
                warn!(
                    target: "runtime::narration",
                    ?timeout,
                    "Narration timed out, using fallback"
                );
                None
            }
        };

        let fallback = text.is_none();
        let text = text.unwrap_or_else(|| FallbackNarrator::line(&context));
        self.state.annotate(text.clone());
        self.event_bus
            .publish(Event::Narration(NarrationEvent::Narrated {
                nonce: self.state.nonce,
                text,
                fallback,
            }));
    }

    async fn handle_consult(&mut self) -> Consultation {
        let context = NarrationContext::capture(&self.state, "consult", &[]);
        let timeout = self.config.narration_timeout;

        match tokio::time::timeout(timeout, self.narrator.consult(&context)).await {
            Ok(Ok(response)) => Consultation {
                narration: response.sanitized_text(),
                outcome: response.outcome(),
                fallback: false,
            },
            Ok(Err(error)) => {
                warn!(
                    target: "runtime::narration",
                    %error,
                    "Consultation failed, offering nothing"
                );
                Consultation::fallback()
            }
            Err(_) => {
                warn!(
                    target: "runtime::narration",
                    ?timeout,
                    "Consultation timed out, offering nothing"
                );
                Consultation::fallback()
            }
        }
    }

    /// Cancels lore for an enemy that is no longer current, then requests lore
    /// for any elite or boss that just appeared.
    fn track_lore(&mut self, events: &[GameEvent]) {
        let current = self.state.encounter.enemy().map(|enemy| enemy.id);
        if self.lore.as_ref().is_some_and(|task| Some(task.enemy) != current) {
            self.cancel_lore();
        }

        for event in events {
            let GameEvent::CombatStarted { enemy, name, rank } = event else {
                continue;
            };
            if !rank.has_lore() || Some(*enemy) != current {
                continue;
            }

            self.cancel_lore();
            let request = LoreRequest {
                enemy: *enemy,
                name: name.clone(),
                rank: *rank,
                floor: self.state.floor,
            };
            debug!(
                target: "runtime::lore",
                enemy = ?request.enemy,
                name = %request.name,
                "Requesting lore"
            );
            self.lore = Some(LoreTask::spawn(
                Arc::clone(&self.narrator),
                request,
                self.config.lore_timeout,
                self.lore_tx.clone(),
            ));
            self.event_bus
                .publish(Event::Lore(LoreEvent::Requested { enemy: *enemy }));
        }
    }

    fn cancel_lore(&mut self) {
        if let Some(task) = self.lore.take() {
            let enemy = task.enemy;
            task.abort();
            debug!(target: "runtime::lore", ?enemy, "Lore request cancelled");
            self.event_bus
                .publish(Event::Lore(LoreEvent::Cancelled { enemy }));
        }
    }

    fn handle_lore(&mut self, reply: LoreReply) {
        // Replies from aborted tasks can still be queued; only the tracked one counts.
        if self.lore.as_ref().map(|task| task.enemy) != Some(reply.enemy) {
            return;
        }
        self.lore = None;

        let enemy = reply.enemy;
        let event = match reply.result {
            Ok(text) => {
                let lore: String = text.trim().chars().take(MAX_NARRATION_CHARS).collect();
                if self.state.attach_lore(enemy, lore.clone()) {
                    LoreEvent::Attached { enemy, lore }
                } else {
                    LoreEvent::Discarded { enemy }
                }
            }
            Err(error) => {
                warn!(target: "runtime::lore", ?enemy, %error, "Lore request failed");
                LoreEvent::Failed {
                    enemy,
                    error: error.to_string(),
                }
            }
        };
        self.event_bus.publish(Event::Lore(event));
    }

    fn handle_checkpoint(&mut self, label: String) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::capture(label, &self.state)?;
        self.repository.save(&checkpoint)?;

        info!(
            target: "runtime::worker",
            label = %checkpoint.label,
            nonce = checkpoint.nonce,
            digest = %checkpoint.digest,
            "Checkpoint saved"
        );
        self.event_bus
            .publish(Event::GameState(GameStateEvent::CheckpointSaved {
                label: checkpoint.label.clone(),
                nonce: checkpoint.nonce,
            }));
        Ok(checkpoint)
    }

    fn handle_restore(&mut self, label: String) -> Result<GameState> {
        let checkpoint = self
            .repository
            .load(&label)?
            .ok_or_else(|| RuntimeError::CheckpointNotFound(label.clone()))?;
        let state = checkpoint.restore()?;

        self.cancel_lore();
        self.state = state.clone();

        info!(
            target: "runtime::worker",
            %label,
            nonce = state.nonce,
            "Checkpoint restored"
        );
        self.event_bus
            .publish(Event::GameState(GameStateEvent::CheckpointRestored {
                label,
                nonce: state.nonce,
            }));
        Ok(state)
    }
}
