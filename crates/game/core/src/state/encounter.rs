//! The single active encounter.
//!
//! [`Encounter`] is the phase field of the game: exactly one combat, trap,
//! shrine or NPC interaction can be in progress, and a new one can only start
//! once the current one is settled.

use crate::combat::DamageType;
use crate::state::{Combatant, Item, StatusEffect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterKind {
    None,
    Combat,
    Trap,
    Shrine,
    Npc,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encounter {
    #[default]
    None,
    Combat(CombatState),
    Trap(TrapState),
    Shrine(ShrineState),
    Npc(NpcState),
}

impl Encounter {
    pub fn kind(&self) -> EncounterKind {
        match self {
            Self::None => EncounterKind::None,
            Self::Combat(_) => EncounterKind::Combat,
            Self::Trap(_) => EncounterKind::Trap,
            Self::Shrine(_) => EncounterKind::Shrine,
            Self::Npc(_) => EncounterKind::Npc,
        }
    }

    /// True when nothing is in progress and a new encounter may begin.
    pub fn is_settled(&self) -> bool {
        match self {
            Self::None => true,
            Self::Combat(combat) => combat.phase.is_terminal(),
            Self::Trap(trap) => trap.resolved,
            Self::Shrine(shrine) => shrine.resolved,
            Self::Npc(npc) => npc.resolved,
        }
    }

    pub fn combat(&self) -> Option<&CombatState> {
        match self {
            Self::Combat(combat) => Some(combat),
            _ => None,
        }
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatState> {
        match self {
            Self::Combat(combat) => Some(combat),
            _ => None,
        }
    }

    /// The current enemy, if combat is in progress or just ended.
    pub fn enemy(&self) -> Option<&Combatant> {
        self.combat().map(|c| &c.enemy)
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Combatant> {
        self.combat_mut().map(|c| &mut c.enemy)
    }
}

// ============================================================================
// Combat
// ============================================================================

/// Combat turn state machine.
///
/// `Idle → PlayerTurn → EnemyTurn → RoundEnd → (Idle | Victory | Defeat)`,
/// plus `Fled` after a successful escape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    #[default]
    Idle,
    PlayerTurn,
    EnemyTurn,
    RoundEnd,
    Victory,
    Defeat,
    Fled,
}

impl CombatPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Fled)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub enemy: Combatant,
    pub phase: CombatPhase,
    /// Rounds completed so far.
    pub round: u32,
}

impl CombatState {
    pub fn new(enemy: Combatant) -> Self {
        Self {
            enemy,
            phase: CombatPhase::Idle,
            round: 0,
        }
    }
}

// ============================================================================
// Traps
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapKind {
    Spikes,
    FlameJet,
    PoisonNeedle,
    RuneWard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trap {
    pub name: String,
    pub kind: TrapKind,
    /// Difficulty compared against the player's dexterity.
    pub dc: u32,
    pub damage: u32,
    pub damage_type: DamageType,
    /// Applied on a full failure.
    pub effect: Option<StatusEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapState {
    pub trap: Trap,
    pub resolved: bool,
}

// ============================================================================
// Shrines
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShrineKind {
    Light,
    Dark,
    Nature,
    Ancient,
}

/// Price of accepting a shrine's offer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShrineCost {
    pub gold: u32,
    pub health: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shrine {
    pub name: String,
    pub kind: ShrineKind,
    pub cost: ShrineCost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShrineState {
    pub shrine: Shrine,
    pub resolved: bool,
}

// ============================================================================
// NPCs
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NpcKind {
    Merchant,
    Wanderer,
    Hermit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ware {
    pub item: Item,
    pub price: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    pub name: String,
    pub kind: NpcKind,
    pub wares: Vec<Ware>,
    /// Base stats used if the player turns on them.
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcState {
    pub npc: Npc,
    pub resolved: bool,
}
