//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive a run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_content::ContentBundle;
use game_core::{Command, CommandOutcome, GameState, NpcAction, ShrineAction};

use crate::api::{CommandProvider, Intent, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::narration::{FallbackNarrator, NarrationProvider};
use crate::repository::{CheckpointRepository, InMemoryCheckpointRepository};
use crate::workers::{SimulationWorker, WorkerCommand, WorkerConfig};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Upper bound on waiting for narration of a committed command.
    pub narration_timeout: Duration,
    /// Upper bound on a background lore request.
    pub lore_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            narration_timeout: Duration::from_secs(5),
            lore_timeout: Duration::from_secs(30),
        }
    }
}

/// Main runtime that orchestrates a run.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    provider: Option<Box<dyn CommandProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Ask the provider for one decision and submit it.
    ///
    /// Returns `None` when the provider chose to stop.
    pub async fn step(&mut self) -> Result<Option<CommandOutcome>> {
        let provider = self.provider.as_ref().ok_or(RuntimeError::ProviderNotSet)?;

        let state = self.handle.query_state().await?;
        let available = self.handle.available_actions().await?;

        let command = match provider.decide(&state, &available).await? {
            Intent::Stop => return Ok(None),
            Intent::Submit(command) => command,
            Intent::AcceptShrine => {
                let consultation = self.handle.consult().await?;
                Command::Shrine(ShrineAction::Accept(consultation.outcome))
            }
            Intent::TalkToNpc => {
                let consultation = self.handle.consult().await?;
                Command::Npc(NpcAction::Talk(consultation.outcome))
            }
        };

        self.handle.submit(command).await.map(Some)
    }

    /// Step until the provider stops or `max_steps` commands were submitted.
    ///
    /// Returns the number of commands submitted.
    pub async fn run(&mut self, max_steps: usize) -> Result<usize> {
        for submitted in 0..max_steps {
            if self.step().await?.is_none() {
                return Ok(submitted);
            }
        }
        Ok(max_steps)
    }

    /// Set the command provider
    pub fn set_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    content: Option<ContentBundle>,
    narrator: Option<Arc<dyn NarrationProvider>>,
    repository: Option<Arc<dyn CheckpointRepository>>,
    provider: Option<Box<dyn CommandProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            content: None,
            narrator: None,
            repository: None,
            provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state (required)
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set game content (required)
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the narration collaborator. Defaults to [`FallbackNarrator`].
    pub fn narrator(mut self, narrator: impl NarrationProvider + 'static) -> Self {
        self.narrator = Some(Arc::new(narrator));
        self
    }

    /// Set checkpoint storage. Defaults to an in-memory repository.
    pub fn repository(mut self, repository: Arc<dyn CheckpointRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set command provider (optional, needed for [`Runtime::step`])
    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let state = self.state.ok_or(RuntimeError::MissingInitialState)?;
        let narrator = self
            .narrator
            .unwrap_or_else(|| Arc::new(FallbackNarrator));
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryCheckpointRepository::default()));

        let (command_tx, command_rx) =
            mpsc::channel::<WorkerCommand>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            state,
            content,
            narrator,
            repository,
            command_rx,
            event_bus,
            WorkerConfig {
                narration_timeout: self.config.narration_timeout,
                lore_timeout: self.config.lore_timeout,
            },
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            provider: self.provider,
            sim_worker_handle,
        })
    }
}
