//! Enemy template loader.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use game_core::{EnemyRank, EnemyTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Bestiary structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bestiary {
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for floor-independent enemy templates.
pub struct BestiaryLoader;

impl BestiaryLoader {
    /// Load enemy templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse enemy templates from RON text.
    ///
    /// Room rolls need at least one regular and one boss template, so a
    /// bestiary missing either is rejected here instead of failing mid-run.
    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let bestiary: Bestiary = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bestiary RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for enemy in &bestiary.enemies {
            anyhow::ensure!(seen.insert(enemy.id.as_str()), "duplicate enemy id `{}`", enemy.id);
            anyhow::ensure!(enemy.max_health > 0, "enemy `{}` has no health", enemy.id);
            for entry in &enemy.loot {
                anyhow::ensure!(
                    entry.chance <= 100,
                    "enemy `{}` drops `{}` at {}%",
                    enemy.id,
                    entry.item.id,
                    entry.chance
                );
            }
        }

        let bosses = bestiary
            .enemies
            .iter()
            .filter(|e| e.rank == EnemyRank::Boss)
            .count();
        anyhow::ensure!(bosses > 0, "bestiary has no boss templates");
        anyhow::ensure!(
            bosses < bestiary.enemies.len(),
            "bestiary has no regular templates"
        );
        tracing::debug!(count = bestiary.enemies.len(), bosses, "loaded bestiary");

        Ok(bestiary.enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAT: &str = r#"(
        id: "rat",
        name: "Rat",
        max_health: 20,
        attack: 5,
        defense: 1,
        damage_type: Physical,
        weakness: None,
        resistance: None,
        rank: Normal,
        abilities: [],
        rewards: (gold: small, experience: 5),
        loot: [],
        weight: 3,
    )"#;

    const KING: &str = r#"(
        id: "rat_king",
        name: "Rat King",
        max_health: 200,
        attack: 14,
        defense: 6,
        damage_type: Poison,
        weakness: Some(Fire),
        resistance: Some(Poison),
        rank: Boss,
        abilities: [],
        rewards: (gold: large, experience: 80),
        loot: [],
        weight: 1,
    )"#;

    #[test]
    fn parses_regular_and_boss() {
        let enemies = BestiaryLoader::parse(&format!("(enemies: [{RAT}, {KING}])")).unwrap();
        assert_eq!(enemies.len(), 2);
        assert_eq!(enemies[1].rank, EnemyRank::Boss);
    }

    #[test]
    fn requires_a_boss() {
        let err = BestiaryLoader::parse(&format!("(enemies: [{RAT}])")).unwrap_err();
        assert!(err.to_string().contains("no boss"));
    }

    #[test]
    fn rejects_duplicates() {
        let err = BestiaryLoader::parse(&format!("(enemies: [{RAT}, {RAT}, {KING}])")).unwrap_err();
        assert!(err.to_string().contains("duplicate enemy id"));
    }
}
