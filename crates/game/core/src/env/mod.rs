//! Read-only inputs the kernel consults while resolving commands.
//!
//! [`GameEnv`] bundles the balance configuration, the piece manifest and the
//! bestiary so the engine can access static data without owning it.
//! Randomness lives in [`rng`] and is always derived from the seed and nonce
//! stored in state.
mod rng;

pub use rng::{PcgRng, RngOracle, RollStream, compute_seed};

use crate::config::GameConfig;
use crate::state::EnemyTemplate;
use crate::tier::PieceManifest;

/// Static data required by the engine and resolvers.
#[derive(Clone, Copy, Debug)]
pub struct GameEnv<'a> {
    config: &'a GameConfig,
    pieces: &'a PieceManifest,
    bestiary: &'a [EnemyTemplate],
}

impl<'a> GameEnv<'a> {
    pub fn new(
        config: &'a GameConfig,
        pieces: &'a PieceManifest,
        bestiary: &'a [EnemyTemplate],
    ) -> Self {
        Self {
            config,
            pieces,
            bestiary,
        }
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn pieces(&self) -> &'a PieceManifest {
        self.pieces
    }

    /// Enemy templates available for random encounters.
    pub fn bestiary(&self) -> &'a [EnemyTemplate] {
        self.bestiary
    }
}
