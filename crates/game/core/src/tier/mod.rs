//! Tier resolution.
//!
//! Converts abstract narrative choices ("blessing, tier=major", "gold tier
//! medium", piece ids) into concrete effects. Content layers can only select
//! a bucket; the kernel owns the bucket-to-number mapping.

mod narrative;
mod pieces;
mod resolve;
mod tables;

pub use narrative::{NarrativeOutcome, OutcomeKind, resolve_outcome};
pub use pieces::{Piece, PieceEffect, PieceManifest, TierError, resolve_pieces};
pub use resolve::{resolve_blessing, resolve_curse, resolve_reward_tier};
pub use tables::{
    ModifierEntry, RewardKind, RewardTier, Tier, TierValue, blessing_entry, curse_entry,
    reward_value,
};
