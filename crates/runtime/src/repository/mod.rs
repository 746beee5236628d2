//! Repository layer for dynamic runtime data.
//!
//! Checkpoints capture the authoritative game state for save/load and for
//! verifying that a resumed run continues exactly where it left off. Static
//! content is owned by `game-content`, not by repositories.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::RepositoryError;
pub use file::FileCheckpointRepository;
pub use memory::InMemoryCheckpointRepository;
pub use traits::CheckpointRepository;
pub use types::Checkpoint;
