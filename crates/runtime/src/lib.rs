//! Runtime orchestration for the deterministic dungeon kernel.
//!
//! This crate wires together the command provider abstraction, game content,
//! checkpoint repositories, the narration boundary and the simulation worker
//! into a cohesive runtime API. Consumers embed [`Runtime`] to drive a run,
//! subscribe to events, and interact with the game through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`narration`] is the boundary to the untrusted narration collaborator
//! - [`repository`] persists checkpoints
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod narration;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    CommandProvider, FirstAvailableProvider, Intent, Result, RuntimeError, RuntimeHandle,
};
pub use events::{Event, EventBus, GameStateEvent, LoreEvent, NarrationEvent, Topic};
pub use narration::{
    Consultation, FallbackNarrator, LoreRequest, NarrationError, NarrationProvider,
    NarrationResponse, ScriptedNarrator,
};
pub use repository::{
    Checkpoint, CheckpointRepository, FileCheckpointRepository, InMemoryCheckpointRepository,
    RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
