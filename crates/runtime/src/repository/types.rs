//! Checkpoint data structures.

use serde::{Deserialize, Serialize};

use game_core::GameState;

use super::error::{RepositoryError, Result};

/// A labelled, self-verifying snapshot of the authoritative state.
///
/// `state` is the bincode encoding produced by [`GameState::to_bytes`];
/// `digest` is the hex SHA-256 of the same state and is checked on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub label: String,
    /// Nonce of the captured state (commands applied so far).
    pub nonce: u64,
    pub digest: String,
    pub state: Vec<u8>,
}

impl Checkpoint {
    /// Encodes `state` under `label`.
    pub fn capture(label: impl Into<String>, state: &GameState) -> Result<Self> {
        let label = label.into();
        validate_label(&label)?;
        Ok(Self {
            label,
            nonce: state.nonce,
            digest: hex::encode(state.digest()?),
            state: state.to_bytes()?,
        })
    }

    /// Decodes the stored state and verifies it against the recorded digest.
    pub fn restore(&self) -> Result<GameState> {
        let state = GameState::from_bytes(&self.state)?;
        let actual = hex::encode(state.digest()?);
        if actual != self.digest {
            return Err(RepositoryError::DigestMismatch {
                expected: self.digest.clone(),
                actual,
            });
        }
        Ok(state)
    }
}

/// Labels double as file names, so they are kept to a safe character set.
pub(crate) fn validate_label(label: &str) -> Result<()> {
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidLabel(label.to_owned()))
    }
}
