//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single writer of the game state; lore
//! requests run as short-lived background tasks it spawns and cancels.

mod lore;
mod simulation;

pub use simulation::{SimulationWorker, WorkerCommand, WorkerConfig};
