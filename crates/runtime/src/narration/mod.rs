//! Boundary to the external narration collaborator.
//!
//! The collaborator sees a [`NarrationContext`] after a command has been
//! committed and answers with display text and, for shrine and NPC flows, a
//! tier selection. Responses are untrusted: text is only ever stored as a
//! journal annotation, and tier selections become numbers exclusively through
//! the kernel's tier tables. Any failure falls back to a generic line.

mod fallback;
mod scripted;

pub use fallback::FallbackNarrator;
pub use scripted::ScriptedNarrator;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use game_core::{
    EnemyRank, EntityId, NarrationContext, NarrativeOutcome, OutcomeKind, RewardTier, Tier,
};

/// Longest narration line kept in the journal.
pub const MAX_NARRATION_CHARS: usize = 600;

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("narration service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed narration response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("narration timed out after {0:?}")]
    Timeout(Duration),
}

/// What the collaborator returns.
///
/// Unknown fields (including any raw numeric `effects`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NarrationResponse {
    pub narration: String,
    pub outcome: Option<OutcomeKind>,
    pub blessing_tier: Option<Tier>,
    pub curse_tier: Option<Tier>,
    pub heal_tier: Option<RewardTier>,
    pub gold_tier: Option<RewardTier>,
    pub piece_ids: Vec<String>,
}

impl NarrationResponse {
    pub fn text(narration: impl Into<String>) -> Self {
        Self {
            narration: narration.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON response body.
    pub fn parse(json: &str) -> Result<Self, NarrationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Narration trimmed and capped to [`MAX_NARRATION_CHARS`].
    pub fn sanitized_text(&self) -> String {
        self.narration.trim().chars().take(MAX_NARRATION_CHARS).collect()
    }

    /// The tier selection, or `nothing` when none was made.
    pub fn outcome(&self) -> NarrativeOutcome {
        NarrativeOutcome {
            kind: self.outcome.unwrap_or_default(),
            blessing_tier: self.blessing_tier,
            curse_tier: self.curse_tier,
            heal_tier: self.heal_tier,
            gold_tier: self.gold_tier,
            piece_ids: self.piece_ids.clone(),
        }
    }
}

/// Tier selection obtained for a pending shrine or NPC interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub narration: String,
    pub outcome: NarrativeOutcome,
    /// True when the collaborator failed and `outcome` is `nothing`.
    pub fallback: bool,
}

impl Consultation {
    pub fn fallback() -> Self {
        Self {
            narration: "Nothing stirs.".to_owned(),
            outcome: NarrativeOutcome::nothing(),
            fallback: true,
        }
    }
}

/// Input for background lore generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreRequest {
    pub enemy: EntityId,
    pub name: String,
    pub rank: EnemyRank,
    pub floor: u32,
}

/// External narration service.
#[async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Describes a committed command.
    async fn narrate(
        &self,
        context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError>;

    /// Picks a tier outcome for a pending shrine or NPC interaction.
    async fn consult(
        &self,
        context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError> {
        self.narrate(context).await
    }

    /// Background text for an elite or boss enemy.
    async fn lore(&self, request: &LoreRequest) -> Result<String, NarrationError>;
}
