//! Deterministic combat and effects kernel.
//!
//! `game-core` defines the canonical rules (stats, status effects, tier
//! resolution, the effect pipeline, combat rounds and encounter resolvers)
//! and exposes pure APIs that can be reused by the runtime and offline tools.
//! All state mutation flows through [`engine::GameEngine`]; every random draw
//! is derived from the seed and nonce stored in [`GameState`].
pub mod combat;
pub mod config;
pub mod effect;
pub mod encounter;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod narration;
pub mod state;
pub mod stats;
pub mod status;
pub mod sustained;
pub mod tier;

pub use combat::{CombatAction, DamageType, Effectiveness};
pub use config::GameConfig;
pub use effect::{Effect, PipelineReport, Target, execute_effects};
pub use encounter::{NpcAction, RoomType, ShrineAction, ShrineOutcome, TrapAction, TrapOutcome};
pub use engine::{ActionError, Command, CommandOutcome, GameEngine, execute};
pub use env::{GameEnv, PcgRng, RngOracle, RollStream};
pub use error::{ErrorSeverity, GameError};
pub use events::GameEvent;
pub use narration::{ActorSummary, NarrationContext};
pub use state::{
    Actor, CharacterClass, Combatant, Companion, EnemyRank, EnemyTemplate, EntityId, GameState,
    Item, Player, Stance, StatusEffect,
};
pub use stats::EffectiveStats;
pub use sustained::SustainedError;
pub use tier::{
    NarrativeOutcome, OutcomeKind, Piece, PieceEffect, PieceManifest, RewardTier, Tier, TierError,
};
