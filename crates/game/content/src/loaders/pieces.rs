//! Piece manifest loader.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use game_core::{Piece, PieceManifest};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Piece catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceCatalog {
    pub pieces: Vec<Piece>,
}

/// Loader for the piece manifest narrative outcomes may reference.
pub struct PieceLoader;

impl PieceLoader {
    /// Load the piece manifest from a RON file.
    pub fn load(path: &Path) -> LoadResult<PieceManifest> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse a piece catalog from RON text.
    ///
    /// Duplicate or empty ids are rejected rather than silently shadowed.
    pub fn parse(content: &str) -> LoadResult<PieceManifest> {
        let catalog: PieceCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse piece catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for piece in &catalog.pieces {
            anyhow::ensure!(!piece.id.is_empty(), "piece with empty id");
            anyhow::ensure!(seen.insert(piece.id.as_str()), "duplicate piece id `{}`", piece.id);
        }
        tracing::debug!(count = catalog.pieces.len(), "loaded piece catalog");

        Ok(PieceManifest::from_pieces(catalog.pieces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::PieceEffect;

    #[test]
    fn parses_effect_templates() {
        let manifest = PieceLoader::parse(
            r#"(
                pieces: [
                    (
                        id: "ember_gift",
                        description: "A coal that refuses to cool.",
                        effects: [
                            Reward(kind: gold, tier: small),
                            Blessing(tier: minor),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let piece = manifest.get("ember_gift").unwrap();
        assert_eq!(piece.effects.len(), 2);
        assert!(matches!(piece.effects[1], PieceEffect::Blessing { .. }));
    }

    #[test]
    fn duplicate_ids_fail() {
        let err = PieceLoader::parse(
            r#"(pieces: [
                (id: "a", description: "", effects: []),
                (id: "a", description: "", effects: []),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate piece id"));
    }
}
