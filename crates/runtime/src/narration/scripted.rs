//! Narrator that replays canned JSON responses.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use game_core::NarrationContext;

use super::{LoreRequest, NarrationError, NarrationProvider, NarrationResponse};

/// Replays JSON bodies in order, as if they came from a remote service.
///
/// Once the script runs out every call fails with
/// [`NarrationError::Unavailable`]. Lore answers after `lore_delay`.
pub struct ScriptedNarrator {
    responses: Mutex<VecDeque<String>>,
    lore_delay: Duration,
}

impl ScriptedNarrator {
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            lore_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_lore_delay(mut self, delay: Duration) -> Self {
        self.lore_delay = delay;
        self
    }

    fn next_body(&self) -> Result<String, NarrationError> {
        self.responses
            .lock()
            .map_err(|_| NarrationError::Unavailable("script lock poisoned".to_owned()))?
            .pop_front()
            .ok_or_else(|| NarrationError::Unavailable("script exhausted".to_owned()))
    }
}

#[async_trait]
impl NarrationProvider for ScriptedNarrator {
    async fn narrate(
        &self,
        _context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError> {
        let body = self.next_body()?;
        NarrationResponse::parse(&body)
    }

    async fn lore(&self, request: &LoreRequest) -> Result<String, NarrationError> {
        if !self.lore_delay.is_zero() {
            tokio::time::sleep(self.lore_delay).await;
        }
        Ok(format!("{} has haunted floor {} for an age.", request.name, request.floor))
    }
}
