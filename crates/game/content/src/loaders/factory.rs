//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use game_core::{EnemyTemplate, GameConfig, GameEnv, PieceManifest};

use crate::loaders::{BestiaryLoader, ConfigLoader, LoadResult, PieceLoader};

/// Everything the kernel reads besides the game state itself.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub pieces: PieceManifest,
    pub bestiary: Vec<EnemyTemplate>,
}

impl ContentBundle {
    /// Borrowed environment handed to every engine call.
    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::new(&self.config, &self.pieces, &self.bestiary)
    }

    pub fn template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.bestiary.iter().find(|t| t.id == id)
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── pieces.ron
/// └── bestiary.ron
/// ```
///
/// `config.toml` is optional; defaults apply when it is absent.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults if missing.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the piece manifest from `pieces.ron`.
    pub fn load_pieces(&self) -> LoadResult<PieceManifest> {
        PieceLoader::load(&self.data_dir.join("pieces.ron"))
    }

    /// Load enemy templates from `bestiary.ron`.
    pub fn load_bestiary(&self) -> LoadResult<Vec<EnemyTemplate>> {
        BestiaryLoader::load(&self.data_dir.join("bestiary.ron"))
    }

    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            config: self.load_config()?,
            pieces: self.load_pieces()?,
            bestiary: self.load_bestiary()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
