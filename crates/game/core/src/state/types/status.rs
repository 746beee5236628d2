//! Status effects carried by actors.
//!
//! Effects are created by the effect pipeline, decremented once per round by
//! the status engine (`crate::status`), and removed when their duration runs
//! out or when explicitly cleansed.

use crate::stats::StatModifiers;

/// Broad classification used by cleansing and narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCategory {
    Buff,
    Debuff,
    Neutral,
}

/// How reapplying an effect with the same id behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Reapplication is ignored.
    None,
    /// Adds a stack (up to `max_stacks`) and refreshes the duration.
    Intensity,
    /// Resets the duration to its base value without adding a stack.
    DurationRefresh,
}

/// Where an effect came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    Shrine,
    Trap,
    Ability,
    Ai,
    Item,
    /// Constant effect owned by an active sustained ability.
    Sustained,
}

/// Remaining lifetime of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    Turns(u32),
    Permanent,
}

impl EffectDuration {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Turns(turns) => Some(*turns),
            Self::Permanent => None,
        }
    }

    /// Decrements by one turn. Returns true when the effect has just expired.
    pub fn tick(&mut self) -> bool {
        match self {
            Self::Turns(turns) => {
                *turns = turns.saturating_sub(1);
                *turns == 0
            }
            Self::Permanent => false,
        }
    }
}

/// A single active status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: String,
    pub name: String,
    pub category: StatusCategory,
    pub duration: EffectDuration,
    /// Duration restored on refresh.
    pub base_duration: EffectDuration,
    pub stacks: u32,
    pub max_stacks: u32,
    pub stack_policy: StackPolicy,
    pub modifiers: StatModifiers,
    pub source: EffectSource,
}

impl StatusEffect {
    /// Creates a single-stack effect lasting `turns` rounds.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: StatusCategory,
        turns: u32,
        modifiers: StatModifiers,
        source: EffectSource,
    ) -> Self {
        Self::with_duration(
            id,
            name,
            category,
            EffectDuration::Turns(turns),
            modifiers,
            source,
        )
    }

    /// Creates an effect that never expires on its own.
    pub fn permanent(
        id: impl Into<String>,
        name: impl Into<String>,
        category: StatusCategory,
        modifiers: StatModifiers,
        source: EffectSource,
    ) -> Self {
        Self::with_duration(
            id,
            name,
            category,
            EffectDuration::Permanent,
            modifiers,
            source,
        )
    }

    fn with_duration(
        id: impl Into<String>,
        name: impl Into<String>,
        category: StatusCategory,
        duration: EffectDuration,
        modifiers: StatModifiers,
        source: EffectSource,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            duration,
            base_duration: duration,
            stacks: 1,
            max_stacks: 1,
            stack_policy: StackPolicy::DurationRefresh,
            modifiers,
            source,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StackPolicy, max_stacks: u32) -> Self {
        self.stack_policy = policy;
        self.max_stacks = max_stacks.max(1);
        self
    }

    /// Modifiers this effect currently contributes.
    pub fn effective_modifiers(&self) -> StatModifiers {
        match self.stack_policy {
            StackPolicy::Intensity => self.modifiers.scaled(self.stacks),
            StackPolicy::None | StackPolicy::DurationRefresh => self.modifiers,
        }
    }

    pub fn is_damage_over_time(&self) -> bool {
        self.effective_modifiers().health_regen < 0
    }
}

/// Ordered set of active effects on one actor. Ids are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends without checking stack policy. Use `status::apply_effect` for gameplay.
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn remove(&mut self, id: &str) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Removes and returns every effect matching `predicate`, preserving order.
    pub fn extract_if(
        &mut self,
        mut predicate: impl FnMut(&StatusEffect) -> bool,
    ) -> Vec<StatusEffect> {
        let (taken, kept): (Vec<_>, Vec<_>) = self.effects.drain(..).partition(|e| predicate(e));
        self.effects = kept;
        taken
    }

    /// Sum of every effect's contribution.
    pub fn total_modifiers(&self) -> StatModifiers {
        self.effects.iter().map(StatusEffect::effective_modifiers).sum()
    }
}
