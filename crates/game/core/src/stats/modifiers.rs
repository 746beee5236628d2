//! Sparse stat deltas carried by status effects and gear.

use core::ops::{Add, AddAssign};

/// Additive stat modifiers.
///
/// `gold_percent` and `exp_percent` are bonuses on top of 100% (a value of
/// `25` means ×1.25). `health_regen` and `resource_regen` are applied once
/// per tick; negative values are damage or drain over time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatModifiers {
    pub attack: i32,
    pub defense: i32,
    pub max_health: i32,
    pub health_regen: i32,
    pub resource_regen: i32,
    pub gold_percent: i32,
    pub exp_percent: i32,
    pub dodge: i32,
}

impl StatModifiers {
    pub const NONE: Self = Self {
        attack: 0,
        defense: 0,
        max_health: 0,
        health_regen: 0,
        resource_regen: 0,
        gold_percent: 0,
        exp_percent: 0,
        dodge: 0,
    };

    pub const fn combat(attack: i32, defense: i32) -> Self {
        Self {
            attack,
            defense,
            ..Self::NONE
        }
    }

    pub const fn regen(health_regen: i32) -> Self {
        Self {
            health_regen,
            ..Self::NONE
        }
    }

    /// Multiplies every field by `factor` (used for intensity stacks).
    pub fn scaled(self, factor: u32) -> Self {
        let f = factor as i32;
        Self {
            attack: self.attack * f,
            defense: self.defense * f,
            max_health: self.max_health * f,
            health_regen: self.health_regen * f,
            resource_regen: self.resource_regen * f,
            gold_percent: self.gold_percent * f,
            exp_percent: self.exp_percent * f,
            dodge: self.dodge * f,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Add for StatModifiers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            attack: self.attack + rhs.attack,
            defense: self.defense + rhs.defense,
            max_health: self.max_health + rhs.max_health,
            health_regen: self.health_regen + rhs.health_regen,
            resource_regen: self.resource_regen + rhs.resource_regen,
            gold_percent: self.gold_percent + rhs.gold_percent,
            exp_percent: self.exp_percent + rhs.exp_percent,
            dodge: self.dodge + rhs.dodge,
        }
    }
}

impl AddAssign for StatModifiers {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::iter::Sum for StatModifiers {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::NONE, Add::add)
    }
}
