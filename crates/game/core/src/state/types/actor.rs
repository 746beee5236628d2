//! Actors: the player, enemy combatants and companions.

use crate::combat::{ComboTracker, DamageType};
use crate::state::{
    Ability, CharacterClass, CompanionAbility, Cooldowns, EnemyAbility, EntityId, Equipment, Item,
    StatusEffects, SustainedAbility,
};
use crate::stats::{Attributes, BaseStats, EffectiveStats, StatModifiers, compute_effective_stats};
use crate::tier::RewardTier;

/// Common view over anything that has stats and status effects.
pub trait Actor {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn stats(&self) -> &BaseStats;
    fn stats_mut(&mut self) -> &mut BaseStats;
    fn statuses(&self) -> &StatusEffects;
    fn statuses_mut(&mut self) -> &mut StatusEffects;

    /// Modifiers contributed by equipped gear.
    fn gear_modifiers(&self) -> StatModifiers {
        StatModifiers::NONE
    }

    /// Dodge chance in percent before modifiers.
    fn base_dodge(&self) -> u32 {
        0
    }

    fn effective_stats(&self) -> EffectiveStats {
        compute_effective_stats(
            self.stats(),
            self.statuses(),
            self.gear_modifiers(),
            self.base_dodge(),
        )
    }

    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }
}

// ============================================================================
// Player
// ============================================================================

/// Combat posture. Changing stance is a free action.
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
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stance {
    #[default]
    Balanced,
    Aggressive,
    Defensive,
}

impl Stance {
    pub const fn attack_percent(self) -> u32 {
        match self {
            Self::Balanced => 100,
            Self::Aggressive => 125,
            Self::Defensive => 85,
        }
    }

    pub const fn defense_percent(self) -> u32 {
        match self {
            Self::Balanced => 100,
            Self::Aggressive => 75,
            Self::Defensive => 140,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub experience_to_level: u32,
    pub gold: u32,
    pub stats: BaseStats,
    pub attributes: Attributes,
    pub statuses: StatusEffects,
    pub cooldowns: Cooldowns,
    pub abilities: Vec<Ability>,
    pub sustained: Vec<SustainedAbility>,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
    pub combo: ComboTracker,
    pub stance: Stance,
}

impl Player {
    pub const STARTING_THRESHOLD: u32 = 100;

    /// Creates a level 1 character with the class's starting kit.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let abilities = class
            .abilities()
            .into_iter()
            .filter(|u| u.level <= 1)
            .map(|u| u.entry)
            .collect();
        let sustained = class
            .sustained()
            .into_iter()
            .filter(|u| u.level <= 1)
            .map(|u| SustainedAbility::new(u.entry))
            .collect();

        Self {
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            experience_to_level: Self::STARTING_THRESHOLD,
            gold: 0,
            stats: class.starting_stats(),
            attributes: class.starting_attributes(),
            statuses: StatusEffects::default(),
            cooldowns: Cooldowns::default(),
            abilities,
            sustained,
            equipment: Equipment::default(),
            inventory: Vec::new(),
            combo: ComboTracker::default(),
            stance: Stance::default(),
        }
    }

    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }

    pub fn knows(&self, id: &str) -> bool {
        self.ability(id).is_some() || self.sustained.iter().any(|s| s.id() == id)
    }

    pub fn sustained_ability(&self, id: &str) -> Option<&SustainedAbility> {
        self.sustained.iter().find(|s| s.id() == id)
    }

    pub fn active_sustained(&self) -> impl Iterator<Item = &SustainedAbility> {
        self.sustained.iter().filter(|s| s.active)
    }

    /// Gains or loses gold, flooring at zero. Returns the applied delta.
    pub fn adjust_gold(&mut self, delta: i64) -> i64 {
        let next = (self.gold as i64 + delta).clamp(0, u32::MAX as i64);
        let applied = next - self.gold as i64;
        self.gold = next as u32;
        applied
    }
}

impl Actor for Player {
    fn id(&self) -> EntityId {
        EntityId::PLAYER
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &BaseStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut BaseStats {
        &mut self.stats
    }

    fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }

    fn gear_modifiers(&self) -> StatModifiers {
        self.equipment.modifiers()
    }

    /// One percent per point of dexterity.
    fn base_dodge(&self) -> u32 {
        self.attributes.dexterity
    }
}

// ============================================================================
// Enemies
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyRank {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl EnemyRank {
    /// Elites and bosses get background lore.
    pub fn has_lore(self) -> bool {
        matches!(self, Self::Elite | Self::Boss)
    }
}

/// A loot table row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: Item,
    /// Percent chance to drop.
    pub chance: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub gold: RewardTier,
    pub experience: u32,
}

/// Floor-independent enemy definition, loaded from the bestiary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub damage_type: DamageType,
    pub weakness: Option<DamageType>,
    pub resistance: Option<DamageType>,
    pub rank: EnemyRank,
    pub abilities: Vec<EnemyAbility>,
    pub rewards: Rewards,
    pub loot: Vec<LootEntry>,
    /// Relative spawn weight within its rank.
    pub weight: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub template: String,
    pub name: String,
    pub stats: BaseStats,
    pub statuses: StatusEffects,
    pub cooldowns: Cooldowns,
    pub abilities: Vec<EnemyAbility>,
    pub damage_type: DamageType,
    pub weakness: Option<DamageType>,
    pub resistance: Option<DamageType>,
    pub rank: EnemyRank,
    pub rewards: Rewards,
    pub loot: Vec<LootEntry>,
    /// Background text attached after the encounter starts.
    pub lore: Option<String>,
}

impl Combatant {
    /// Percent applied to template stats on a given floor.
    pub fn floor_scale_percent(floor: u32) -> u32 {
        100 + 15 * floor.saturating_sub(1)
    }

    /// Instantiates `template` with stats scaled to `floor`.
    pub fn scaled(template: &EnemyTemplate, floor: u32, id: EntityId) -> Self {
        let pct = Self::floor_scale_percent(floor);
        let scale = |v: u32| v * pct / 100;
        Self {
            id,
            template: template.id.clone(),
            name: template.name.clone(),
            stats: BaseStats::new(
                scale(template.max_health).max(1),
                scale(template.attack),
                scale(template.defense),
                0,
            ),
            statuses: StatusEffects::default(),
            cooldowns: Cooldowns::default(),
            abilities: template.abilities.clone(),
            damage_type: template.damage_type,
            weakness: template.weakness,
            resistance: template.resistance,
            rank: template.rank,
            rewards: Rewards {
                gold: template.rewards.gold,
                experience: scale(template.rewards.experience),
            },
            loot: template.loot.clone(),
            lore: None,
        }
    }
}

impl Actor for Combatant {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &BaseStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut BaseStats {
        &mut self.stats
    }

    fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }
}

// ============================================================================
// Companions
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Companion {
    pub id: EntityId,
    pub name: String,
    pub stats: BaseStats,
    pub statuses: StatusEffects,
    pub cooldowns: Cooldowns,
    pub abilities: Vec<CompanionAbility>,
    pub damage_type: DamageType,
    /// Loyalty from 0 to 100.
    pub bond: u32,
    /// False once the companion has fled or betrayed the party.
    pub active: bool,
}

impl Companion {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        stats: BaseStats,
        bond: u32,
        abilities: Vec<CompanionAbility>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
            statuses: StatusEffects::default(),
            cooldowns: Cooldowns::default(),
            abilities,
            damage_type: DamageType::Physical,
            bond: bond.min(100),
            active: true,
        }
    }

    /// Can take a turn this round.
    pub fn can_act(&self) -> bool {
        self.active && self.stats.is_alive()
    }
}

impl Actor for Companion {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &BaseStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut BaseStats {
        &mut self.stats
    }

    fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> EnemyTemplate {
        EnemyTemplate {
            id: "goblin".into(),
            name: "Goblin".into(),
            max_health: 40,
            attack: 10,
            defense: 4,
            damage_type: DamageType::Physical,
            weakness: Some(DamageType::Fire),
            resistance: None,
            rank: EnemyRank::Normal,
            abilities: Vec::new(),
            rewards: Rewards {
                gold: RewardTier::Small,
                experience: 20,
            },
            loot: Vec::new(),
            weight: 1,
        }
    }

    #[test]
    fn scaling_grows_with_floor() {
        let first = Combatant::scaled(&template(), 1, EntityId(1));
        let third = Combatant::scaled(&template(), 3, EntityId(2));
        assert_eq!(first.stats.max_health(), 40);
        assert_eq!(third.stats.max_health(), 52);
        assert_eq!(third.stats.attack, 13);
        assert_eq!(third.rewards.experience, 26);
    }

    #[test]
    fn new_player_knows_only_level_one_kit() {
        let player = Player::new("Ayla", CharacterClass::Mage);
        assert!(player.knows("fireball"));
        assert!(player.knows("mana_shield"));
        assert!(!player.knows("frost_bolt"));
        assert_eq!(player.level, 1);
    }

    #[test]
    fn gold_floors_at_zero() {
        let mut player = Player::new("Ayla", CharacterClass::Rogue);
        player.gold = 10;
        assert_eq!(player.adjust_gold(-25), -10);
        assert_eq!(player.gold, 0);
    }
}
