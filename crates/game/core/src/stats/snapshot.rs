//! Effective stats: base values folded with every active modifier.

use super::{BaseStats, StatModifiers};
use crate::config::GameConfig;
use crate::state::StatusEffects;

/// Read-only derived view used by every damage and reward calculation.
///
/// Never stored; recompute with [`compute_effective_stats`] whenever needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats {
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub resource: u32,
    pub resource_max: u32,
    pub health_regen: i32,
    pub resource_regen: i32,
    /// Gold reward multiplier in percent (100 = ×1.0).
    pub gold_percent: u32,
    /// Experience reward multiplier in percent (100 = ×1.0).
    pub exp_percent: u32,
    pub dodge_percent: u32,
}

/// Folds `base` with status effect modifiers, gear and a base dodge chance.
///
/// Intensity-stacked effects contribute `modifiers × stacks`; all others
/// contribute their modifiers once.
pub fn compute_effective_stats(
    base: &BaseStats,
    statuses: &StatusEffects,
    gear: StatModifiers,
    base_dodge: u32,
) -> EffectiveStats {
    let mods = statuses.total_modifiers() + gear;

    EffectiveStats {
        health: base.health(),
        max_health: offset(base.max_health(), mods.max_health).max(1),
        attack: offset(base.attack, mods.attack),
        defense: offset(base.defense, mods.defense),
        resource: base.resource(),
        resource_max: base.usable_resource_max(),
        health_regen: mods.health_regen,
        resource_regen: mods.resource_regen,
        gold_percent: offset(100, mods.gold_percent),
        exp_percent: offset(100, mods.exp_percent),
        dodge_percent: offset(base_dodge, mods.dodge).min(GameConfig::MAX_DODGE_PERCENT),
    }
}

fn offset(value: u32, delta: i32) -> u32 {
    (value as i64 + delta as i64).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EffectSource, StackPolicy, StatusCategory, StatusEffect};

    #[test]
    fn folds_status_and_gear() {
        let base = BaseStats::new(100, 10, 6, 50);
        let mut statuses = StatusEffects::default();
        statuses.push(StatusEffect::new(
            "might",
            "Might",
            StatusCategory::Buff,
            3,
            StatModifiers::combat(4, 0),
            EffectSource::Ability,
        ));
        let eff = compute_effective_stats(&base, &statuses, StatModifiers::combat(1, 2), 5);
        assert_eq!(eff.attack, 15);
        assert_eq!(eff.defense, 8);
        assert_eq!(eff.dodge_percent, 5);
        assert_eq!(eff.gold_percent, 100);
    }

    #[test]
    fn intensity_stacks_multiply() {
        let base = BaseStats::new(100, 10, 6, 50);
        let mut statuses = StatusEffects::default();
        let mut rage = StatusEffect::new(
            "frenzy",
            "Frenzy",
            StatusCategory::Buff,
            3,
            StatModifiers::combat(2, 0),
            EffectSource::Ability,
        )
        .with_policy(StackPolicy::Intensity, 5);
        rage.stacks = 3;
        statuses.push(rage);
        let eff = compute_effective_stats(&base, &statuses, StatModifiers::NONE, 0);
        assert_eq!(eff.attack, 16);
    }

    #[test]
    fn negative_modifiers_floor_at_zero() {
        let base = BaseStats::new(100, 3, 2, 50);
        let mut statuses = StatusEffects::default();
        statuses.push(StatusEffect::new(
            "curse",
            "Curse",
            StatusCategory::Debuff,
            5,
            StatModifiers::combat(-6, -4),
            EffectSource::Shrine,
        ));
        let eff = compute_effective_stats(&base, &statuses, StatModifiers::NONE, 80);
        assert_eq!(eff.attack, 0);
        assert_eq!(eff.defense, 0);
        assert_eq!(eff.dodge_percent, GameConfig::MAX_DODGE_PERCENT);
    }
}
