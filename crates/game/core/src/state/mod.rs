//! Authoritative game state representation.
//!
//! This module owns the data structures that describe the player, the party
//! and the active encounter. Runtime layers clone or query this state but
//! mutate it exclusively through the engine.
pub mod encounter;
pub mod types;

pub use encounter::{
    CombatPhase, CombatState, Encounter, EncounterKind, Npc, NpcKind, NpcState, Shrine,
    ShrineCost, ShrineKind, ShrineState, Trap, TrapKind, TrapState, Ware,
};
pub use types::*;

use crate::config::GameConfig;
use crate::env::RollStream;

/// Narration attached to the state after a command resolved.
///
/// Opaque to the kernel: nothing numeric ever reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalEntry {
    pub nonce: u64,
    pub text: String,
}

/// Bounded narration log, oldest entries dropped first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn push(&mut self, entry: JournalEntry) {
        if self.entries.len() == GameConfig::JOURNAL_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }
}

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed, set once at game start.
    pub seed: u64,
    /// Number of commands applied so far. Combined with `seed` for every roll.
    pub nonce: u64,
    pub floor: u32,
    /// Rooms entered on the current floor.
    pub rooms_cleared: u32,
    pub player: Player,
    pub party: Vec<Companion>,
    pub encounter: Encounter,
    /// Sequential entity ID allocator. 0 is reserved for the player.
    next_entity: u32,
    pub journal: Journal,
}

impl GameState {
    pub fn new(seed: u64, player: Player) -> Self {
        Self {
            seed,
            nonce: 0,
            floor: 1,
            rooms_cleared: 0,
            player,
            party: Vec::new(),
            encounter: Encounter::None,
            next_entity: 1,
            journal: Journal::default(),
        }
    }

    /// Opens the roll stream for the command about to be applied.
    pub fn rolls(&self) -> RollStream {
        RollStream::new(self.seed, self.nonce)
    }

    /// Allocates a fresh entity id. Ids are never reused.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Adds a companion to the party with a freshly allocated id.
    pub fn recruit(
        &mut self,
        name: impl Into<String>,
        stats: crate::stats::BaseStats,
        bond: u32,
        abilities: Vec<CompanionAbility>,
    ) -> EntityId {
        let id = self.allocate_id();
        self.party.push(Companion::new(id, name, stats, bond, abilities));
        id
    }

    pub fn is_defeated(&self) -> bool {
        !self.player.stats.is_alive()
    }

    /// Attaches narration for the most recent command.
    pub fn annotate(&mut self, text: impl Into<String>) {
        let nonce = self.nonce;
        self.journal.push(JournalEntry {
            nonce,
            text: text.into(),
        });
    }

    /// Attaches lore to the current enemy if it is still `enemy` and the
    /// fight is not over.
    ///
    /// Returns false when the encounter has moved on.
    pub fn attach_lore(&mut self, enemy: EntityId, lore: impl Into<String>) -> bool {
        match self.encounter.combat_mut() {
            Some(combat) if combat.enemy.id == enemy && !combat.phase.is_terminal() => {
                combat.enemy.lore = Some(lore.into());
                true
            }
            _ => false,
        }
    }
}

#[cfg(feature = "serde")]
mod snapshot {
    use sha2::{Digest, Sha256};

    use super::GameState;

    /// Failure to encode or decode a state snapshot.
    #[derive(Debug, thiserror::Error)]
    #[error("state snapshot codec failed: {0}")]
    pub struct SnapshotError(#[from] bincode::Error);

    impl GameState {
        /// Lossless binary encoding of the whole state.
        pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
            Ok(bincode::serialize(self)?)
        }

        pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
            Ok(bincode::deserialize(bytes)?)
        }

        /// SHA-256 over the binary encoding. Equal states have equal digests.
        pub fn digest(&self) -> Result<[u8; 32], SnapshotError> {
            let bytes = self.to_bytes()?;
            Ok(Sha256::digest(&bytes).into())
        }
    }
}

#[cfg(feature = "serde")]
pub use snapshot::SnapshotError;

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(11, Player::new("Ayla", CharacterClass::Warrior))
    }

    #[test]
    fn allocated_ids_are_unique() {
        let mut s = state();
        let a = s.allocate_id();
        let b = s.allocate_id();
        assert_ne!(a, b);
        assert!(!a.is_player());
    }

    #[test]
    fn journal_is_bounded() {
        let mut s = state();
        for i in 0..(GameConfig::JOURNAL_CAPACITY + 5) {
            s.annotate(format!("line {i}"));
        }
        assert_eq!(s.journal.entries().len(), GameConfig::JOURNAL_CAPACITY);
        assert_eq!(s.journal.entries()[0].text, "line 5");
    }

    #[test]
    fn lore_requires_matching_enemy() {
        let mut s = state();
        assert!(!s.attach_lore(EntityId(3), "old tales"));
    }

    #[test]
    fn lore_is_dropped_once_the_fight_ends() {
        let mut s = state();
        let id = s.allocate_id();
        let npc = Npc::generate(&mut s.rolls());
        let enemy = crate::encounter::npc_combatant(&npc, 1, id);
        s.encounter = Encounter::Combat(CombatState::new(enemy));
        assert!(s.attach_lore(id, "old tales"));

        if let Some(combat) = s.encounter.combat_mut() {
            combat.phase = CombatPhase::Victory;
        }
        assert!(!s.attach_lore(id, "newer tales"));
        assert_eq!(s.encounter.enemy().unwrap().lore.as_deref(), Some("old tales"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_round_trips() {
        let mut s = state();
        s.annotate("entered the crypt");
        let bytes = s.to_bytes().unwrap();
        let restored = GameState::from_bytes(&bytes).unwrap();
        assert_eq!(restored, s);
        assert_eq!(restored.digest().unwrap(), s.digest().unwrap());
    }
}
