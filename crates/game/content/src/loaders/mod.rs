//! Content loaders for reading game data from files.
//!
//! Each loader parses one file format into `game-core` types. The same
//! parsers back the built-in content embedded in [`crate::builtin`].

pub mod bestiary;
pub mod config;
pub mod factory;
pub mod pieces;

pub use bestiary::BestiaryLoader;
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use pieces::PieceLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
