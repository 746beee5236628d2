//! Static tier tables.
//!
//! Narrative content can only name a bucket; the numbers behind each bucket
//! live here. Magnitudes grow monotonically with the tier and `none` is
//! always zero.

/// Blessing and curse strength.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tier {
    Minor,
    Standard,
    Major,
}

/// Heal and gold reward size.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RewardTier {
    None,
    Small,
    Medium,
    Large,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RewardKind {
    Heal,
    Gold,
}

/// A table cell: either a fixed amount or an inclusive range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierValue {
    Fixed(u32),
    Range { min: u32, max: u32 },
}

impl TierValue {
    pub const fn min(self) -> u32 {
        match self {
            Self::Fixed(v) => v,
            Self::Range { min, .. } => min,
        }
    }

    pub const fn max(self) -> u32 {
        match self {
            Self::Fixed(v) => v,
            Self::Range { max, .. } => max,
        }
    }
}

/// Attack/defense deltas and duration of a blessing or curse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifierEntry {
    pub attack: i32,
    pub defense: i32,
    pub duration: u32,
}

pub const fn blessing_entry(tier: Tier) -> ModifierEntry {
    match tier {
        Tier::Minor => ModifierEntry { attack: 2, defense: 1, duration: 3 },
        Tier::Standard => ModifierEntry { attack: 4, defense: 2, duration: 4 },
        Tier::Major => ModifierEntry { attack: 7, defense: 4, duration: 5 },
    }
}

pub const fn curse_entry(tier: Tier) -> ModifierEntry {
    match tier {
        Tier::Minor => ModifierEntry { attack: -2, defense: -1, duration: 3 },
        Tier::Standard => ModifierEntry { attack: -4, defense: -2, duration: 4 },
        Tier::Major => ModifierEntry { attack: -6, defense: -4, duration: 5 },
    }
}

pub const fn reward_value(kind: RewardKind, tier: RewardTier) -> TierValue {
    match (kind, tier) {
        (_, RewardTier::None) => TierValue::Fixed(0),
        (RewardKind::Heal, RewardTier::Small) => TierValue::Range { min: 10, max: 20 },
        (RewardKind::Heal, RewardTier::Medium) => TierValue::Range { min: 20, max: 40 },
        (RewardKind::Heal, RewardTier::Large) => TierValue::Range { min: 40, max: 70 },
        (RewardKind::Gold, RewardTier::Small) => TierValue::Range { min: 5, max: 15 },
        (RewardKind::Gold, RewardTier::Medium) => TierValue::Range { min: 20, max: 40 },
        (RewardKind::Gold, RewardTier::Large) => TierValue::Range { min: 50, max: 100 },
    }
}
