//! Damage calculation.

use crate::config::GameConfig;
use crate::env::RollStream;

// ============================================================================
// Damage Type
// ============================================================================

/// Damage type for weaknesses, resistances and combos.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Physical damage (melee, projectiles).
    Physical,
    /// Fire damage (burns, explosions).
    Fire,
    /// Cold damage (ice, frost).
    Cold,
    /// Lightning damage (electricity, storms).
    Lightning,
    /// Poison damage (toxins, venom).
    Poison,
    /// Arcane damage (pure magic).
    Arcane,
    Holy,
    Shadow,
    /// True damage (ignores weakness and resistance).
    True,
}

/// How the damage type interacted with the defender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effectiveness {
    #[default]
    Normal,
    Effective,
    Resisted,
}

/// Weakness wins over resistance; true damage is always normal.
pub fn effectiveness(
    damage_type: DamageType,
    weakness: Option<DamageType>,
    resistance: Option<DamageType>,
) -> Effectiveness {
    if damage_type == DamageType::True {
        Effectiveness::Normal
    } else if weakness == Some(damage_type) {
        Effectiveness::Effective
    } else if resistance == Some(damage_type) {
        Effectiveness::Resisted
    } else {
        Effectiveness::Normal
    }
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Everything needed to compute one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageInput {
    /// Attacker's effective attack after stance and ability power.
    pub attack: u32,
    /// Attacker's effective attack before any scaling; crits compare against it.
    pub base_attack: u32,
    pub defense: u32,
    pub damage_type: DamageType,
    pub weakness: Option<DamageType>,
    pub resistance: Option<DamageType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: u32,
    pub effectiveness: Effectiveness,
    pub critical: bool,
}

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// base     = max(1, attack - floor(defense / defense_divisor))
/// varied   = base + variance
/// final    = max(1, varied × effectiveness%)
/// critical = final > base_attack × critical_threshold%
/// ```
pub fn calculate_damage(input: &DamageInput, variance: i32, config: &GameConfig) -> DamageRoll {
    let mitigation = input.defense / config.defense_divisor.max(1);
    let base = input.attack.saturating_sub(mitigation).max(1);
    let varied = (base as i64 + variance as i64).max(1);

    let effectiveness = effectiveness(input.damage_type, input.weakness, input.resistance);
    let percent = match effectiveness {
        Effectiveness::Normal => 100,
        Effectiveness::Effective => config.weakness_percent,
        Effectiveness::Resisted => config.resistance_percent,
    } as i64;

    let amount = (varied * percent / 100).max(1) as u32;
    let critical =
        amount as u64 * 100 > input.base_attack as u64 * config.critical_threshold_percent as u64;

    DamageRoll {
        amount,
        effectiveness,
        critical,
    }
}

/// [`calculate_damage`] with variance drawn from `rolls`.
pub fn roll_damage(input: &DamageInput, rolls: &mut RollStream, config: &GameConfig) -> DamageRoll {
    let variance = rolls.variance(config.damage_variance);
    calculate_damage(input, variance, config)
}

/// Scales an attack value by two percentages (stance and ability power).
pub fn scale_attack(attack: u32, first_percent: u32, second_percent: u32) -> u32 {
    (attack as u64 * first_percent as u64 * second_percent as u64 / 10_000) as u32
}
