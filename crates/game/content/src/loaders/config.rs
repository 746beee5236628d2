//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for kernel tunables from TOML files.
///
/// Missing keys fall back to [`GameConfig::default`], so a file only needs
/// the values it overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(config.defense_divisor > 0, "defense_divisor must be positive");
        anyhow::ensure!(config.rooms_per_floor > 0, "rooms_per_floor must be positive");
        anyhow::ensure!(
            config.help_gold_min <= config.help_gold_max,
            "help_gold_min {} exceeds help_gold_max {}",
            config.help_gold_min,
            config.help_gold_max
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse("damage_variance = 4\nrooms_per_floor = 3\n").unwrap();
        assert_eq!(config.damage_variance, 4);
        assert_eq!(config.rooms_per_floor, 3);
        assert_eq!(config.weakness_percent, GameConfig::default().weakness_percent);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let err = ConfigLoader::parse("defense_divisor = 0").unwrap_err();
        assert!(err.to_string().contains("defense_divisor"));
    }

    #[test]
    fn unknown_types_fail_to_parse() {
        assert!(ConfigLoader::parse("damage_variance = \"lots\"").is_err());
    }
}
