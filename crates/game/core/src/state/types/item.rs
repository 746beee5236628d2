//! Items, equipment slots and on-event triggers.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::combat::DamageType;
use crate::stats::StatModifiers;

bitflags! {
    /// Combat events an item trigger reacts to.
    ///
    /// Within a round the kernel fires them in a fixed order:
    /// on-attack, on-damage-dealt, on-critical-hit, then on-kill or
    /// on-damage-taken.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TriggerEvents: u8 {
        const ON_ATTACK       = 1 << 0;
        const ON_DAMAGE_DEALT = 1 << 1;
        const ON_CRITICAL_HIT = 1 << 2;
        const ON_KILL         = 1 << 3;
        const ON_DAMAGE_TAKEN = 1 << 4;
    }
}

/// A conditional bonus attached to an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTrigger {
    pub events: TriggerEvents,
    /// Percent chance to fire each time a matching event occurs.
    pub chance: u32,
    /// Extra damage to the enemy (reflected damage for on-damage-taken).
    pub bonus_damage: u32,
    /// Healing for the player.
    pub heal: u32,
    pub narration: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

/// What a consumable restores when used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumable {
    pub heal: u32,
    pub restore: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: String,
    pub name: String,
    pub slot: Option<EquipmentSlot>,
    pub bonuses: StatModifiers,
    /// Damage type of basic attacks while equipped as a weapon.
    pub damage_type: Option<DamageType>,
    pub triggers: Vec<ItemTrigger>,
    pub consumable: Option<Consumable>,
    pub value: u32,
}

impl Item {
    /// Creates an item with no slot, bonuses or triggers.
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slot: None,
            bonuses: StatModifiers::NONE,
            damage_type: None,
            triggers: Vec::new(),
            consumable: None,
            value,
        }
    }

    pub fn potion(
        id: impl Into<String>,
        name: impl Into<String>,
        heal: u32,
        restore: u32,
        value: u32,
    ) -> Self {
        Self {
            consumable: Some(Consumable { heal, restore }),
            ..Self::new(id, name, value)
        }
    }

    #[must_use]
    pub fn equippable(mut self, slot: EquipmentSlot, bonuses: StatModifiers) -> Self {
        self.slot = Some(slot);
        self.bonuses = bonuses;
        self
    }

    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: ItemTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }
}

/// Equipped items keyed by slot, iterated in slot order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment(BTreeMap<EquipmentSlot, Item>);

impl Equipment {
    /// Equips `item` in its slot, returning whatever it replaced.
    ///
    /// Items without a slot are handed back unchanged.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        match item.slot {
            Some(slot) => Ok(self.0.insert(slot, item)),
            None => Err(item),
        }
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.0.remove(&slot)
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.0.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.values()
    }

    /// Summed bonuses of every equipped item.
    pub fn modifiers(&self) -> StatModifiers {
        self.0.values().map(|item| item.bonuses).sum()
    }

    /// Damage type of the equipped weapon, physical when unarmed.
    pub fn weapon_damage_type(&self) -> DamageType {
        self.get(EquipmentSlot::Weapon)
            .and_then(|w| w.damage_type)
            .unwrap_or(DamageType::Physical)
    }

    /// Triggers reacting to `event`, in slot order.
    pub fn triggers(&self, event: TriggerEvents) -> impl Iterator<Item = &ItemTrigger> {
        self.0
            .values()
            .flat_map(|item| item.triggers.iter())
            .filter(move |t| t.events.intersects(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Item {
        Item::new("ember_ring", "Ember Ring", 30)
            .equippable(EquipmentSlot::Accessory, StatModifiers::combat(1, 0))
            .with_trigger(ItemTrigger {
                events: TriggerEvents::ON_ATTACK | TriggerEvents::ON_KILL,
                chance: 100,
                bonus_damage: 2,
                heal: 0,
                narration: "The ring flares.".into(),
            })
    }

    #[test]
    fn equip_replaces_slot() {
        let mut eq = Equipment::default();
        assert_eq!(eq.equip(ring()), Ok(None));
        let previous = eq.equip(ring()).ok().flatten();
        assert_eq!(previous.map(|i| i.id), Some("ember_ring".to_owned()));
        assert!(eq.equip(Item::new("pebble", "Pebble", 0)).is_err());
    }

    #[test]
    fn triggers_filter_by_event() {
        let mut eq = Equipment::default();
        eq.equip(ring()).ok();
        assert_eq!(eq.triggers(TriggerEvents::ON_KILL).count(), 1);
        assert_eq!(eq.triggers(TriggerEvents::ON_DAMAGE_TAKEN).count(), 0);
        assert_eq!(eq.modifiers().attack, 1);
    }

    #[test]
    fn unarmed_attacks_are_physical() {
        let eq = Equipment::default();
        assert_eq!(eq.weapon_damage_type(), DamageType::Physical);
    }
}
