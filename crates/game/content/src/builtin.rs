//! Content shipped inside the binary.
//!
//! Parsed with the same loaders as external files, so a broken edit to the
//! embedded data fails the unit tests below.

use crate::loaders::{BestiaryLoader, ConfigLoader, ContentBundle, LoadResult, PieceLoader};

pub const CONFIG_TOML: &str = include_str!("../data/config.toml");
pub const PIECES_RON: &str = include_str!("../data/pieces.ron");
pub const BESTIARY_RON: &str = include_str!("../data/bestiary.ron");

/// Parses the embedded config, piece manifest and bestiary.
pub fn bundle() -> LoadResult<ContentBundle> {
    Ok(ContentBundle {
        config: ConfigLoader::parse(CONFIG_TOML)?,
        pieces: PieceLoader::parse(PIECES_RON)?,
        bestiary: BestiaryLoader::parse(BESTIARY_RON)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{EnemyRank, GameConfig};

    #[test]
    fn embedded_content_parses() {
        let bundle = bundle().unwrap();
        assert_eq!(bundle.config, GameConfig::default());
        assert!(bundle.pieces.contains("cleanse_debuffs"));
        assert!(bundle.bestiary.iter().any(|t| t.rank == EnemyRank::Elite));
        assert!(bundle.template("goblin_scout").is_some());
    }
}
