//! Narrative outcomes: tier selections made by the narration layer.
//!
//! The collaborator may only pick an outcome kind, tiers and piece ids. All
//! numbers come from the tier tables, so whatever text accompanies an
//! outcome cannot change what it does.

use crate::effect::{Effect, Target};
use crate::env::RollStream;
use crate::state::EffectSource;

use super::pieces::{PieceManifest, TierError, resolve_pieces};
use super::resolve::{resolve_blessing, resolve_curse, resolve_reward_tier};
use super::tables::{RewardKind, RewardTier, Tier};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutcomeKind {
    Blessing,
    Curse,
    #[default]
    Nothing,
    Mixed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NarrativeOutcome {
    pub kind: OutcomeKind,
    pub blessing_tier: Option<Tier>,
    pub curse_tier: Option<Tier>,
    pub heal_tier: Option<RewardTier>,
    pub gold_tier: Option<RewardTier>,
    pub piece_ids: Vec<String>,
}

impl NarrativeOutcome {
    pub fn nothing() -> Self {
        Self::default()
    }

    pub fn blessing(tier: Tier) -> Self {
        Self {
            kind: OutcomeKind::Blessing,
            blessing_tier: Some(tier),
            ..Self::default()
        }
    }

    pub fn curse(tier: Tier) -> Self {
        Self {
            kind: OutcomeKind::Curse,
            curse_tier: Some(tier),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_heal(mut self, tier: RewardTier) -> Self {
        self.heal_tier = Some(tier);
        self
    }

    #[must_use]
    pub fn with_gold(mut self, tier: RewardTier) -> Self {
        self.gold_tier = Some(tier);
        self
    }

    #[must_use]
    pub fn with_pieces(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.piece_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Converts an outcome into an ordered effect list.
///
/// Order: piece damage, heal, gold, blessing, curse, remaining piece effects.
/// Piece ids are validated even for `nothing` outcomes.
pub fn resolve_outcome(
    outcome: &NarrativeOutcome,
    manifest: &PieceManifest,
    rolls: &mut RollStream,
    source: EffectSource,
) -> Result<Vec<Effect>, TierError> {
    let pieces = resolve_pieces(manifest, &outcome.piece_ids, rolls, source)?;
    if outcome.kind == OutcomeKind::Nothing {
        return Ok(Vec::new());
    }

    let (damage, rest): (Vec<Effect>, Vec<Effect>) =
        pieces.into_iter().partition(Effect::is_damage);
    let mut effects = damage;

    if let Some(tier) = outcome.heal_tier {
        let amount = resolve_reward_tier(RewardKind::Heal, tier, rolls);
        if amount > 0 {
            effects.push(Effect::heal(Target::Player, amount));
        }
    }
    if let Some(tier) = outcome.gold_tier {
        let amount = resolve_reward_tier(RewardKind::Gold, tier, rolls);
        if amount > 0 {
            effects.push(Effect::ModifyGold {
                amount: amount as i64,
            });
        }
    }

    let grants_blessing = matches!(outcome.kind, OutcomeKind::Blessing | OutcomeKind::Mixed);
    let grants_curse = matches!(outcome.kind, OutcomeKind::Curse | OutcomeKind::Mixed);
    if let Some(tier) = outcome.blessing_tier.filter(|_| grants_blessing) {
        effects.push(Effect::status(Target::Player, resolve_blessing(tier, source)));
    }
    if let Some(tier) = outcome.curse_tier.filter(|_| grants_curse) {
        effects.push(Effect::status(Target::Player, resolve_curse(tier, source)));
    }

    effects.extend(rest);
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageType;
    use crate::tier::{Piece, PieceEffect};

    fn manifest() -> PieceManifest {
        PieceManifest::from_pieces([Piece {
            id: "thorns".into(),
            description: "Thorns".into(),
            effects: vec![
                PieceEffect::Gold { amount: 3 },
                PieceEffect::Damage {
                    target: Target::Player,
                    amount: 4,
                    damage_type: DamageType::Physical,
                },
            ],
        }])
    }

    #[test]
    fn damage_comes_first() {
        let outcome = NarrativeOutcome::blessing(Tier::Minor)
            .with_heal(RewardTier::Small)
            .with_pieces(["thorns"]);
        let mut rolls = RollStream::new(3, 9);
        let effects =
            resolve_outcome(&outcome, &manifest(), &mut rolls, EffectSource::Shrine).unwrap();
        assert!(effects[0].is_damage());
        assert!(matches!(effects[1], Effect::Heal { .. }));
        assert!(matches!(effects[2], Effect::ApplyStatus { .. }));
        assert_eq!(effects[3], Effect::ModifyGold { amount: 3 });
    }

    #[test]
    fn curse_kind_ignores_blessing_tier() {
        let mut outcome = NarrativeOutcome::curse(Tier::Major);
        outcome.blessing_tier = Some(Tier::Major);
        let mut rolls = RollStream::new(3, 9);
        let effects =
            resolve_outcome(&outcome, &manifest(), &mut rolls, EffectSource::Shrine).unwrap();
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::ApplyStatus { status, .. } => assert_eq!(status.id, "curse:major"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nothing_still_validates_pieces() {
        let outcome = NarrativeOutcome::nothing().with_pieces(["ghost"]);
        let mut rolls = RollStream::new(3, 9);
        assert!(resolve_outcome(&outcome, &manifest(), &mut rolls, EffectSource::Ai).is_err());
    }

    #[test]
    fn outcome_kind_parses() {
        assert_eq!("Mixed".parse::<OutcomeKind>().ok(), Some(OutcomeKind::Mixed));
    }
}
