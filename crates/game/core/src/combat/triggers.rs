//! Item trigger cascades.

use crate::env::RollStream;
use crate::state::{Equipment, TriggerEvents};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiredTrigger {
    pub event: TriggerEvents,
    pub bonus_damage: u32,
    pub heal: u32,
    pub narration: String,
}

/// Triggers that fired for one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub fired: Vec<FiredTrigger>,
}

impl TriggerOutcome {
    pub fn bonus_damage(&self) -> u32 {
        self.fired.iter().map(|f| f.bonus_damage).sum()
    }

    pub fn heal(&self) -> u32 {
        self.fired.iter().map(|f| f.heal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Rolls every equipped trigger reacting to `event`, in slot order.
pub fn fire_triggers(
    equipment: &Equipment,
    event: TriggerEvents,
    rolls: &mut RollStream,
) -> TriggerOutcome {
    let fired = equipment
        .triggers(event)
        .filter(|trigger| rolls.chance(trigger.chance))
        .map(|trigger| FiredTrigger {
            event,
            bonus_damage: trigger.bonus_damage,
            heal: trigger.heal,
            narration: trigger.narration.clone(),
        })
        .collect();
    TriggerOutcome { fired }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EquipmentSlot, Item, ItemTrigger};
    use crate::stats::StatModifiers;

    fn gear(chance: u32) -> Equipment {
        let mut eq = Equipment::default();
        eq.equip(
            Item::new("thorn_mail", "Thorn Mail", 40)
                .equippable(EquipmentSlot::Armor, StatModifiers::combat(0, 2))
                .with_trigger(ItemTrigger {
                    events: TriggerEvents::ON_DAMAGE_TAKEN,
                    chance,
                    bonus_damage: 3,
                    heal: 1,
                    narration: "Thorns bite back.".into(),
                }),
        )
        .ok();
        eq
    }

    #[test]
    fn certain_triggers_always_fire() {
        let mut rolls = RollStream::new(4, 4);
        let out = fire_triggers(&gear(100), TriggerEvents::ON_DAMAGE_TAKEN, &mut rolls);
        assert_eq!(out.bonus_damage(), 3);
        assert_eq!(out.heal(), 1);
    }

    #[test]
    fn unrelated_events_do_not_roll() {
        let mut rolls = RollStream::new(4, 4);
        let out = fire_triggers(&gear(100), TriggerEvents::ON_KILL, &mut rolls);
        assert!(out.is_empty());
        assert_eq!(rolls.draws(), 0);
    }

    #[test]
    fn zero_chance_never_fires() {
        let mut rolls = RollStream::new(4, 4);
        for _ in 0..50 {
            assert!(fire_triggers(&gear(0), TriggerEvents::ON_DAMAGE_TAKEN, &mut rolls).is_empty());
        }
    }
}
