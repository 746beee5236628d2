//! Ability definitions, one type per role.
//!
//! Player, enemy and companion abilities share a few fields but resolve
//! through different code paths, so each role has its own kind enum instead
//! of a single shape discriminated by which fields happen to be present.

use std::collections::BTreeMap;

use crate::combat::DamageType;
use crate::state::StatusEffect;

/// Which kind of actor an ability belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityRole {
    Player,
    Enemy,
    Companion,
}

// ============================================================================
// Player abilities
// ============================================================================

/// Active player ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: String,
    pub name: String,
    /// Resource spent on use.
    pub cost: u32,
    /// Rounds before the ability can be used again.
    pub cooldown: u32,
    pub kind: AbilityKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    /// Deals damage at `power_percent` of effective attack.
    Strike {
        power_percent: u32,
        damage_type: DamageType,
        /// Applied to the target after the hit lands.
        on_hit: Option<StatusEffect>,
    },
    Heal { amount: u32 },
    /// Applies a status to the caster.
    Empower { effect: StatusEffect },
}

impl Ability {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cost: u32,
        cooldown: u32,
        kind: AbilityKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            cooldown,
            kind,
        }
    }

    pub fn damage_type(&self) -> Option<DamageType> {
        match &self.kind {
            AbilityKind::Strike { damage_type, .. } => Some(*damage_type),
            _ => None,
        }
    }
}

// ============================================================================
// Enemy abilities
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAbility {
    pub id: String,
    pub name: String,
    pub cooldown: u32,
    pub kind: EnemyAbilityKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyAbilityKind {
    Strike {
        power_percent: u32,
        damage_type: DamageType,
    },
    /// Only chosen once the player's health share drops below `threshold_percent`.
    Execute {
        power_percent: u32,
        threshold_percent: u32,
    },
    /// Heals the caster for half the damage dealt.
    Drain { power_percent: u32 },
    /// Applies a debuff to the player without dealing damage.
    Hex { effect: StatusEffect },
    /// Self-heal, preferred when the caster is hurt.
    Mend { amount: u32 },
}

impl EnemyAbility {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cooldown: u32,
        kind: EnemyAbilityKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cooldown,
            kind,
        }
    }
}

// ============================================================================
// Companion abilities
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionAbility {
    pub id: String,
    pub name: String,
    pub cooldown: u32,
    pub kind: CompanionAbilityKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompanionAbilityKind {
    Strike {
        power_percent: u32,
        damage_type: DamageType,
    },
    /// Heals the player.
    Mend { amount: u32 },
    /// Buffs the player.
    Rally { effect: StatusEffect },
}

impl CompanionAbility {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cooldown: u32,
        kind: CompanionAbilityKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cooldown,
            kind,
        }
    }
}

// ============================================================================
// Cooldowns
// ============================================================================

/// Remaining cooldown per ability id. Absent ids are ready.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns(BTreeMap<String, u32>);

impl Cooldowns {
    pub fn remaining(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, id: &str) -> bool {
        self.remaining(id) == 0
    }

    pub fn start(&mut self, id: &str, turns: u32) {
        if turns > 0 {
            self.0.insert(id.to_owned(), turns);
        }
    }

    /// Decrements every cooldown by one, dropping those that reach zero.
    pub fn tick(&mut self) {
        self.0.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(id, turns)| (id.as_str(), *turns))
    }
}
