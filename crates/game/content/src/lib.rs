//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Piece manifest referenced by narrative outcomes (RON)
//! - Bestiary of floor-independent enemy templates (RON)
//! - Kernel tunables (`GameConfig`, TOML)
//!
//! Content is handed to the kernel through [`game_core::GameEnv`] and never
//! appears in game state.

#[cfg(feature = "loaders")]
pub mod builtin;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BestiaryLoader, ConfigLoader, ContentBundle, ContentFactory, LoadResult, PieceLoader,
};
