//! In-memory checkpoint repository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::error::{RepositoryError, Result};
use super::traits::CheckpointRepository;
use super::types::Checkpoint;

/// In-memory checkpoint repository for testing and development.
///
/// Thread-safe but not persistent across process restarts.
#[derive(Default)]
pub struct InMemoryCheckpointRepository {
    checkpoints: RwLock<BTreeMap<String, Checkpoint>>,
}

impl InMemoryCheckpointRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointRepository for InMemoryCheckpointRepository {
    fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        let mut checkpoints = self
            .checkpoints
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        checkpoints.insert(checkpoint.label.clone(), checkpoint.clone());
        Ok(())
    }

    fn load(&self, label: &str) -> Result<Option<Checkpoint>> {
        let checkpoints = self
            .checkpoints
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(checkpoints.get(label).cloned())
    }

    fn delete(&self, label: &str) -> Result<()> {
        let mut checkpoints = self
            .checkpoints
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        checkpoints.remove(label);
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        let checkpoints = self
            .checkpoints
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(checkpoints.keys().cloned().collect())
    }
}
