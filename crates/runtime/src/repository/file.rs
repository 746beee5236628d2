//! File-based checkpoint repository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{RepositoryError, Result};
use super::traits::CheckpointRepository;
use super::types::{Checkpoint, validate_label};

/// Stores each checkpoint as `checkpoint_{label}.bin` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated checkpoint behind.
pub struct FileCheckpointRepository {
    base_dir: PathBuf,
}

impl FileCheckpointRepository {
    /// Create a new file-based checkpoint repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn checkpoint_path(&self, label: &str) -> PathBuf {
        self.base_dir.join(format!("checkpoint_{label}.bin"))
    }
}

impl CheckpointRepository for FileCheckpointRepository {
    fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        validate_label(&checkpoint.label)?;
        let path = self.checkpoint_path(&checkpoint.label);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(checkpoint)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), nonce = checkpoint.nonce, "saved checkpoint");
        Ok(())
    }

    fn load(&self, label: &str) -> Result<Option<Checkpoint>> {
        validate_label(label)?;
        let path = self.checkpoint_path(label);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let checkpoint: Checkpoint = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(Some(checkpoint))
    }

    fn delete(&self, label: &str) -> Result<()> {
        validate_label(label)?;
        let path = self.checkpoint_path(label);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(path = %path.display(), "deleted checkpoint");
        }
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        let mut labels = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(label) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_prefix("checkpoint_"))
                .and_then(|rest| rest.strip_suffix(".bin"))
            {
                labels.push(label.to_owned());
            }
        }

        labels.sort();
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CharacterClass, GameState, Player};

    #[test]
    fn saves_lists_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileCheckpointRepository::new(dir.path()).unwrap();
        let state = GameState::new(8, Player::new("Lio", CharacterClass::Cleric));

        repo.save(&Checkpoint::capture("b", &state).unwrap()).unwrap();
        repo.save(&Checkpoint::capture("a", &state).unwrap()).unwrap();
        assert_eq!(repo.list_labels().unwrap(), vec!["a", "b"]);

        let loaded = repo.load("a").unwrap().unwrap();
        assert_eq!(loaded.restore().unwrap(), state);

        repo.delete("a").unwrap();
        assert!(repo.load("a").unwrap().is_none());
        assert_eq!(repo.list_labels().unwrap(), vec!["b"]);
    }
}
