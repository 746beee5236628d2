//! Character classes and their level-gated ability catalogs.

use crate::combat::DamageType;
use crate::state::{
    Ability, AbilityKind, EffectSource, StackPolicy, StatusCategory, StatusEffect, SustainedSpec,
    SustainedTick,
};
use crate::stats::{Attributes, BaseStats, StatModifiers};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Rage,
    Mana,
    Energy,
    Faith,
}

/// Entry in a class catalog: the content plus the level that unlocks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unlock<T> {
    pub level: u32,
    pub entry: T,
}

fn at<T>(level: u32, entry: T) -> Unlock<T> {
    Unlock { level, entry }
}

impl CharacterClass {
    pub const fn resource_kind(self) -> ResourceKind {
        match self {
            Self::Warrior => ResourceKind::Rage,
            Self::Mage => ResourceKind::Mana,
            Self::Rogue => ResourceKind::Energy,
            Self::Cleric => ResourceKind::Faith,
        }
    }

    /// Resource regenerated at every round end.
    pub const fn resource_regen(self) -> u32 {
        match self {
            Self::Warrior => 5,
            Self::Mage => 8,
            Self::Rogue => 15,
            Self::Cleric => 6,
        }
    }

    pub fn starting_stats(self) -> BaseStats {
        match self {
            Self::Warrior => BaseStats::new(120, 14, 8, 60),
            Self::Mage => BaseStats::new(80, 10, 4, 100),
            Self::Rogue => BaseStats::new(95, 13, 5, 80),
            Self::Cleric => BaseStats::new(105, 11, 7, 90),
        }
    }

    pub const fn starting_attributes(self) -> Attributes {
        match self {
            Self::Warrior => Attributes::new(14, 6, 8),
            Self::Mage => Attributes::new(6, 14, 8),
            Self::Rogue => Attributes::new(8, 8, 14),
            Self::Cleric => Attributes::new(10, 12, 8),
        }
    }

    pub fn abilities(self) -> Vec<Unlock<Ability>> {
        use AbilityKind::*;
        match self {
            Self::Warrior => vec![
                at(1, strike("power_strike", "Power Strike", 15, 2, 150, DamageType::Physical)),
                at(
                    3,
                    Ability::new(
                        "war_cry",
                        "War Cry",
                        20,
                        4,
                        Empower {
                            effect: buff("war_cry", "War Cry", 3, StatModifiers::combat(5, 0)),
                        },
                    ),
                ),
                at(5, strike("whirlwind", "Whirlwind", 30, 3, 200, DamageType::Physical)),
            ],
            Self::Mage => vec![
                at(
                    1,
                    Ability::new(
                        "fireball",
                        "Fireball",
                        20,
                        1,
                        Strike {
                            power_percent: 160,
                            damage_type: DamageType::Fire,
                            on_hit: Some(StatusEffect::new(
                                "burning",
                                "Burning",
                                StatusCategory::Debuff,
                                2,
                                StatModifiers::regen(-3),
                                EffectSource::Ability,
                            )),
                        },
                    ),
                ),
                at(2, strike("frost_bolt", "Frost Bolt", 15, 1, 130, DamageType::Cold)),
                at(4, strike("arcane_missile", "Arcane Missile", 25, 2, 180, DamageType::Arcane)),
            ],
            Self::Rogue => vec![
                at(1, strike("backstab", "Backstab", 20, 2, 170, DamageType::Physical)),
                at(
                    2,
                    Ability::new(
                        "poison_blade",
                        "Poison Blade",
                        15,
                        3,
                        Strike {
                            power_percent: 110,
                            damage_type: DamageType::Poison,
                            on_hit: Some(
                                StatusEffect::new(
                                    "poisoned",
                                    "Poisoned",
                                    StatusCategory::Debuff,
                                    3,
                                    StatModifiers::regen(-4),
                                    EffectSource::Ability,
                                )
                                .with_policy(StackPolicy::Intensity, 3),
                            ),
                        },
                    ),
                ),
                at(4, strike("shadow_strike", "Shadow Strike", 30, 3, 200, DamageType::Shadow)),
            ],
            Self::Cleric => vec![
                at(1, strike("smite", "Smite", 15, 1, 150, DamageType::Holy)),
                at(1, Ability::new("heal", "Heal", 20, 2, Heal { amount: 30 })),
                at(
                    3,
                    Ability::new(
                        "divine_shield",
                        "Divine Shield",
                        25,
                        4,
                        Empower {
                            effect: buff(
                                "divine_shield",
                                "Divine Shield",
                                3,
                                StatModifiers::combat(0, 8),
                            ),
                        },
                    ),
                ),
            ],
        }
    }

    pub fn sustained(self) -> Vec<Unlock<SustainedSpec>> {
        match self {
            Self::Warrior => vec![
                at(
                    1,
                    sustained(
                        "battle_stance",
                        "Battle Stance",
                        10,
                        20,
                        0,
                        0,
                        0,
                        SustainedTick::default(),
                        StatModifiers::combat(4, 2),
                        "stance",
                    ),
                ),
                at(
                    4,
                    sustained(
                        "blood_rage",
                        "Blood Rage",
                        0,
                        10,
                        10,
                        0,
                        3,
                        SustainedTick::default(),
                        StatModifiers::combat(8, -3),
                        "stance",
                    ),
                ),
            ],
            Self::Mage => vec![
                at(
                    1,
                    sustained(
                        "mana_shield",
                        "Mana Shield",
                        10,
                        25,
                        0,
                        3,
                        0,
                        SustainedTick::default(),
                        StatModifiers::combat(0, 6),
                        "ward",
                    ),
                ),
                at(
                    3,
                    sustained(
                        "burning_aura",
                        "Burning Aura",
                        15,
                        20,
                        0,
                        4,
                        0,
                        SustainedTick { heal: 0, enemy_damage: 4 },
                        StatModifiers::NONE,
                        "aura",
                    ),
                ),
            ],
            Self::Rogue => vec![at(
                2,
                sustained(
                    "blade_dance",
                    "Blade Dance",
                    10,
                    20,
                    0,
                    5,
                    0,
                    SustainedTick::default(),
                    StatModifiers {
                        attack: 5,
                        dodge: 5,
                        ..StatModifiers::NONE
                    },
                    "stance",
                ),
            )],
            Self::Cleric => vec![
                at(
                    2,
                    sustained(
                        "sanctuary",
                        "Sanctuary",
                        10,
                        20,
                        0,
                        3,
                        0,
                        SustainedTick { heal: 5, enemy_damage: 0 },
                        StatModifiers::NONE,
                        "aura",
                    ),
                ),
                at(
                    4,
                    sustained(
                        "zealotry",
                        "Zealotry",
                        15,
                        15,
                        0,
                        0,
                        2,
                        SustainedTick::default(),
                        StatModifiers::combat(6, 0),
                        "stance",
                    ),
                ),
            ],
        }
    }
}

fn strike(
    id: &str,
    name: &str,
    cost: u32,
    cooldown: u32,
    power_percent: u32,
    damage_type: DamageType,
) -> Ability {
    let kind = AbilityKind::Strike {
        power_percent,
        damage_type,
        on_hit: None,
    };
    Ability::new(id, name, cost, cooldown, kind)
}

fn buff(id: &str, name: &str, turns: u32, modifiers: StatModifiers) -> StatusEffect {
    StatusEffect::new(id, name, StatusCategory::Buff, turns, modifiers, EffectSource::Ability)
}

#[allow(clippy::too_many_arguments)]
fn sustained(
    id: &str,
    name: &str,
    activation_cost: u32,
    reserve: u32,
    health_cost: u32,
    drain_resource: u32,
    drain_health: u32,
    tick: SustainedTick,
    modifiers: StatModifiers,
    group: &str,
) -> SustainedSpec {
    SustainedSpec {
        id: id.to_owned(),
        name: name.to_owned(),
        activation_cost,
        reserve,
        health_cost,
        drain_resource,
        drain_health,
        tick,
        constant_effect: StatusEffect::permanent(
            format!("sustained:{id}"),
            name,
            StatusCategory::Buff,
            modifiers,
            EffectSource::Sustained,
        )
        .with_policy(StackPolicy::None, 1),
        exclusive_group: Some(group.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    #[test]
    fn every_class_has_a_level_one_ability() {
        for class in CharacterClass::iter() {
            assert!(class.abilities().iter().any(|u| u.level == 1), "{class}");
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        for class in CharacterClass::iter() {
            let mut ids = BTreeSet::new();
            for unlock in class.abilities() {
                assert!(ids.insert(unlock.entry.id));
            }
            for unlock in class.sustained() {
                assert!(ids.insert(unlock.entry.id));
            }
        }
    }

    #[test]
    fn class_names_parse_case_insensitively() {
        assert_eq!("Mage".parse::<CharacterClass>().ok(), Some(CharacterClass::Mage));
        assert_eq!(CharacterClass::Rogue.to_string(), "rogue");
    }
}
