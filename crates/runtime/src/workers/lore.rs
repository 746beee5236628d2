//! Background lore requests for elite and boss enemies.
//!
//! At most one request is outstanding. It belongs to a specific enemy id and
//! is aborted as soon as that enemy stops being the current one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use game_core::EntityId;

use crate::narration::{LoreRequest, NarrationError, NarrationProvider};

/// Result delivered back to the simulation worker.
pub(crate) struct LoreReply {
    pub enemy: EntityId,
    pub result: Result<String, NarrationError>,
}

/// The single in-flight lore request.
pub(crate) struct LoreTask {
    pub enemy: EntityId,
    handle: JoinHandle<()>,
}

impl LoreTask {
    pub fn spawn(
        narrator: Arc<dyn NarrationProvider>,
        request: LoreRequest,
        timeout: Duration,
        reply_tx: mpsc::UnboundedSender<LoreReply>,
    ) -> Self {
        let enemy = request.enemy;
        let handle = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, narrator.lore(&request)).await {
                Ok(result) => result,
                Err(_) => Err(NarrationError::Timeout(timeout)),
            };
            if reply_tx.send(LoreReply { enemy, result }).is_err() {
                debug!(target: "runtime::lore", ?enemy, "worker gone before lore arrived");
            }
        });
        Self { enemy, handle }
    }

    pub fn abort(self) {
        self.handle.abort();
    }
}
