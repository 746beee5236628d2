//! Repository contract for saving and loading checkpoints.

use super::error::Result;
use super::types::Checkpoint;

/// Repository for checkpoint persistence.
///
/// Saving under an existing label replaces the previous checkpoint.
pub trait CheckpointRepository: Send + Sync {
    fn save(&self, checkpoint: &Checkpoint) -> Result<()>;

    fn load(&self, label: &str) -> Result<Option<Checkpoint>>;

    fn delete(&self, label: &str) -> Result<()>;

    /// Labels in ascending order.
    fn list_labels(&self) -> Result<Vec<String>>;
}
