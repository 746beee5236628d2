//! Status effect engine: apply, tick and cleanse.
//!
//! Effects are inserted according to their [`StackPolicy`], decremented once
//! per round, and removed when they expire. Per-turn health and resource
//! deltas are applied directly to the actor's base stats (always clamped).
//!
//! Within a tick, damage-over-time resolves before heal-over-time: a lethal
//! damage tick ends processing immediately, so no heal in the same tick can
//! save the actor.

use crate::state::{Actor, EffectSource, StackPolicy, StatusCategory, StatusEffect, StatusEffects};

/// What happened when an effect was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// Not present before; inserted.
    Added,
    /// Intensity stack added (or capped) and duration refreshed.
    Stacked { stacks: u32 },
    /// Duration reset to its base value.
    Refreshed,
    /// Already present with a non-stacking policy.
    Ignored,
}

/// Inserts `effect` into `set` according to the policy of the existing entry.
pub fn apply_to(set: &mut StatusEffects, effect: StatusEffect) -> ApplyOutcome {
    let Some(existing) = set.get_mut(&effect.id) else {
        set.push(effect);
        return ApplyOutcome::Added;
    };

    match existing.stack_policy {
        StackPolicy::None => ApplyOutcome::Ignored,
        StackPolicy::DurationRefresh => {
            existing.duration = existing.base_duration;
            ApplyOutcome::Refreshed
        }
        StackPolicy::Intensity => {
            existing.stacks = (existing.stacks + 1).min(existing.max_stacks);
            existing.duration = existing.base_duration;
            ApplyOutcome::Stacked {
                stacks: existing.stacks,
            }
        }
    }
}

/// Applies `effect` to an actor.
pub fn apply_effect<A: Actor + ?Sized>(actor: &mut A, effect: StatusEffect) -> ApplyOutcome {
    apply_to(actor.statuses_mut(), effect)
}

/// Result of a single status tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub damage: u32,
    pub healed: u32,
    pub resource_restored: u32,
    pub resource_drained: u32,
    pub expired: Vec<StatusEffect>,
    /// Damage over time brought the actor to zero health.
    pub lethal: bool,
}

/// Processes one turn of every active effect on `actor`.
pub fn tick<A: Actor + ?Sized>(actor: &mut A) -> TickReport {
    let mut report = TickReport::default();

    let (mut dot, mut hot, mut resource) = (0u32, 0u32, 0i32);
    for effect in actor.statuses().iter() {
        let mods = effect.effective_modifiers();
        if mods.health_regen < 0 {
            dot += mods.health_regen.unsigned_abs();
        } else {
            hot += mods.health_regen as u32;
        }
        resource += mods.resource_regen;
    }

    if dot > 0 {
        report.damage = actor.stats_mut().take_damage(dot);
        if !actor.is_alive() {
            report.lethal = true;
            return report;
        }
    }
    if hot > 0 {
        report.healed = actor.stats_mut().heal(hot);
    }
    if resource > 0 {
        report.resource_restored = actor.stats_mut().restore(resource as u32);
    } else if resource < 0 {
        report.resource_drained = actor.stats_mut().drain(resource.unsigned_abs());
    }

    let statuses = actor.statuses_mut();
    for effect in statuses.iter_mut() {
        effect.duration.tick();
    }
    report.expired = statuses.extract_if(|e| e.duration.remaining() == Some(0));
    report
}

/// Removes every effect of `category`, except constant effects owned by
/// sustained abilities. Returns the removed effects in order.
pub fn cleanse<A: Actor + ?Sized>(actor: &mut A, category: StatusCategory) -> Vec<StatusEffect> {
    actor
        .statuses_mut()
        .extract_if(|e| e.category == category && e.source != EffectSource::Sustained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterClass, EffectDuration, Player};
    use crate::stats::{BaseStats, StatModifiers};

    fn player(health: u32) -> Player {
        let mut p = Player::new("Tess", CharacterClass::Warrior);
        p.stats = BaseStats::new(100, 20, 5, 50);
        p.stats.set_health(health);
        p
    }

    fn dot(id: &str, per_turn: i32, turns: u32) -> StatusEffect {
        StatusEffect::new(
            id,
            id,
            StatusCategory::Debuff,
            turns,
            StatModifiers::regen(per_turn),
            EffectSource::Trap,
        )
    }

    #[test]
    fn duration_refresh_never_grows_magnitude() {
        let mut p = player(100);
        let ward = StatusEffect::new(
            "ward",
            "Ward",
            StatusCategory::Buff,
            4,
            StatModifiers::combat(0, 3),
            EffectSource::Shrine,
        );
        assert_eq!(apply_effect(&mut p, ward.clone()), ApplyOutcome::Added);
        tick(&mut p);
        tick(&mut p);
        assert_eq!(p.statuses.get("ward").map(|e| e.duration), Some(EffectDuration::Turns(2)));

        assert_eq!(apply_effect(&mut p, ward), ApplyOutcome::Refreshed);
        let effect = p.statuses.get("ward").unwrap();
        assert_eq!(effect.duration, EffectDuration::Turns(4));
        assert_eq!(effect.stacks, 1);
        assert_eq!(p.effective_stats().defense, 8);
    }

    #[test]
    fn intensity_adds_stacks_up_to_cap() {
        let mut p = player(100);
        let venom = dot("venom", -2, 3).with_policy(StackPolicy::Intensity, 2);
        apply_effect(&mut p, venom.clone());
        assert_eq!(apply_effect(&mut p, venom.clone()), ApplyOutcome::Stacked { stacks: 2 });
        assert_eq!(apply_effect(&mut p, venom), ApplyOutcome::Stacked { stacks: 2 });

        let report = tick(&mut p);
        assert_eq!(report.damage, 4);
    }

    #[test]
    fn none_policy_ignores_reapplication() {
        let mut p = player(100);
        let mark = dot("mark", 0, 3).with_policy(StackPolicy::None, 1);
        apply_effect(&mut p, mark.clone());
        assert_eq!(apply_effect(&mut p, mark), ApplyOutcome::Ignored);
        assert_eq!(p.statuses.len(), 1);
    }

    #[test]
    fn lethal_dot_is_not_saved_by_regen() {
        let mut p = player(5);
        apply_effect(&mut p, dot("burn", -6, 3));
        apply_effect(
            &mut p,
            StatusEffect::new(
                "renew",
                "Renew",
                StatusCategory::Buff,
                3,
                StatModifiers::regen(20),
                EffectSource::Ability,
            ),
        );

        let report = tick(&mut p);
        assert!(report.lethal);
        assert_eq!(report.healed, 0);
        assert_eq!(p.stats.health(), 0);
    }

    #[test]
    fn dot_then_hot_when_survivable() {
        let mut p = player(50);
        apply_effect(&mut p, dot("burn", -6, 3));
        apply_effect(
            &mut p,
            StatusEffect::new(
                "renew",
                "Renew",
                StatusCategory::Buff,
                3,
                StatModifiers::regen(4),
                EffectSource::Ability,
            ),
        );
        let report = tick(&mut p);
        assert_eq!(report.damage, 6);
        assert_eq!(report.healed, 4);
        assert_eq!(p.stats.health(), 48);
    }

    #[test]
    fn effects_expire_after_their_duration() {
        let mut p = player(100);
        apply_effect(&mut p, dot("sting", -1, 2));
        assert!(tick(&mut p).expired.is_empty());
        let report = tick(&mut p);
        assert_eq!(report.expired.len(), 1);
        assert!(p.statuses.is_empty());
    }

    #[test]
    fn cleanse_spares_sustained_effects() {
        let mut p = player(100);
        apply_effect(&mut p, dot("hex", -1, 5));
        p.statuses.push(StatusEffect::permanent(
            "sustained:stance",
            "Stance",
            StatusCategory::Debuff,
            StatModifiers::NONE,
            EffectSource::Sustained,
        ));
        let removed = cleanse(&mut p, StatusCategory::Debuff);
        assert_eq!(removed.len(), 1);
        assert!(p.statuses.contains("sustained:stance"));
    }
}
