//! Victory rewards and level progression.

use crate::config::GameConfig;
use crate::env::RollStream;
use crate::state::{Combatant, Item, Player, SustainedAbility};
use crate::stats::EffectiveStats;
use crate::tier::{RewardKind, resolve_reward_tier};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardBundle {
    pub gold: u32,
    pub experience: u32,
    pub loot: Vec<Item>,
}

/// Rolls gold, experience and loot for defeating `enemy`.
///
/// Gold and experience are scaled by the player's reward multipliers; every
/// loot entry rolls independently.
pub fn roll_rewards(
    enemy: &Combatant,
    player: &EffectiveStats,
    rolls: &mut RollStream,
) -> RewardBundle {
    let gold = resolve_reward_tier(RewardKind::Gold, enemy.rewards.gold, rolls);
    let gold = (gold as u64 * player.gold_percent as u64 / 100) as u32;
    let experience = (enemy.rewards.experience as u64 * player.exp_percent as u64 / 100) as u32;
    let loot = enemy
        .loot
        .iter()
        .filter(|entry| rolls.chance(entry.chance))
        .map(|entry| entry.item.clone())
        .collect();

    RewardBundle {
        gold,
        experience,
        loot,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// Ability and sustained ability ids unlocked at this level.
    pub unlocked: Vec<String>,
}

/// Adds experience and applies every level-up it pays for.
///
/// Overflow carries into the next level.
pub fn grant_experience(player: &mut Player, amount: u32, config: &GameConfig) -> Vec<LevelUp> {
    player.experience = player.experience.saturating_add(amount);

    let mut levels = Vec::new();
    while player.experience_to_level > 0 && player.experience >= player.experience_to_level {
        player.experience -= player.experience_to_level;
        player.level += 1;
        player.experience_to_level = (player.experience_to_level as u64
            * config.level_threshold_growth_percent as u64
            / 100)
            .max(1) as u32;

        player.stats.grow_max_health(config.level_health_gain);
        player.stats.attack += config.level_attack_gain;
        player.stats.defense += config.level_defense_gain;
        player.attributes.raise_all(config.level_attribute_gain);

        levels.push(LevelUp {
            level: player.level,
            unlocked: unlock_catalog(player),
        });
    }
    levels
}

fn unlock_catalog(player: &mut Player) -> Vec<String> {
    let mut unlocked = Vec::new();
    for unlock in player.class.abilities() {
        if unlock.level <= player.level && player.ability(&unlock.entry.id).is_none() {
            unlocked.push(unlock.entry.id.clone());
            player.abilities.push(unlock.entry);
        }
    }
    for unlock in player.class.sustained() {
        if unlock.level <= player.level && player.sustained_ability(&unlock.entry.id).is_none() {
            unlocked.push(unlock.entry.id.clone());
            player.sustained.push(SustainedAbility::new(unlock.entry));
        }
    }
    unlocked
}
