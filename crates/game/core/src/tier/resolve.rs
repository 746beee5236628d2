//! Tier lookups turned into concrete numbers and status effects.

use crate::env::RollStream;
use crate::state::{EffectSource, StackPolicy, StatusCategory, StatusEffect};
use crate::stats::StatModifiers;

use super::tables::{
    RewardKind, RewardTier, Tier, TierValue, blessing_entry, curse_entry, reward_value,
};

/// Resolves a reward bucket to an amount.
///
/// `none` and fixed cells never draw from the stream.
pub fn resolve_reward_tier(kind: RewardKind, tier: RewardTier, rolls: &mut RollStream) -> u32 {
    match reward_value(kind, tier) {
        TierValue::Fixed(value) => value,
        TierValue::Range { min, max } => rolls.range(min, max),
    }
}

/// Builds the blessing status for `tier`.
///
/// Reapplying the same tier refreshes its duration.
pub fn resolve_blessing(tier: Tier, source: EffectSource) -> StatusEffect {
    let entry = blessing_entry(tier);
    StatusEffect::new(
        format!("blessing:{tier}"),
        format!("{} Blessing", title(tier)),
        StatusCategory::Buff,
        entry.duration,
        StatModifiers::combat(entry.attack, entry.defense),
        source,
    )
    .with_policy(StackPolicy::DurationRefresh, 1)
}

/// Builds the curse status for `tier`.
pub fn resolve_curse(tier: Tier, source: EffectSource) -> StatusEffect {
    let entry = curse_entry(tier);
    StatusEffect::new(
        format!("curse:{tier}"),
        format!("{} Curse", title(tier)),
        StatusCategory::Debuff,
        entry.duration,
        StatModifiers::combat(entry.attack, entry.defense),
        source,
    )
    .with_policy(StackPolicy::DurationRefresh, 1)
}

fn title(tier: Tier) -> &'static str {
    match tier {
        Tier::Minor => "Minor",
        Tier::Standard => "Standard",
        Tier::Major => "Major",
    }
}
