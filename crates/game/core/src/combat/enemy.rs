//! Enemy action selection.

use crate::config::GameConfig;
use crate::state::{Combatant, EnemyAbilityKind};

/// What the enemy does on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyChoice {
    /// Index into the combatant's ability list.
    Ability(usize),
    Attack,
}

/// Picks the enemy's action for this turn.
///
/// Priority: a ready Mend when hurt below the mend threshold, a ready
/// Execute once the player is below its threshold, the first ready offensive
/// ability, and finally a basic attack.
pub fn select_enemy_action(
    enemy: &Combatant,
    player_health_percent: u32,
    config: &GameConfig,
) -> EnemyChoice {
    let ready = || {
        enemy
            .abilities
            .iter()
            .enumerate()
            .filter(|(_, ability)| enemy.cooldowns.is_ready(&ability.id))
    };

    let hurt = enemy.stats.health_percent() < config.enemy_mend_threshold_percent;
    let mend = ready().find(|(_, a)| matches!(a.kind, EnemyAbilityKind::Mend { .. }));
    if let Some((index, ability)) = mend.filter(|_| hurt) {
        tracing::debug!(enemy = %enemy.id, ability = %ability.id, "enemy mends");
        return EnemyChoice::Ability(index);
    }

    let execute = ready().find(|(_, a)| {
        matches!(a.kind, EnemyAbilityKind::Execute { threshold_percent, .. }
            if player_health_percent < threshold_percent)
    });
    if let Some((index, ability)) = execute {
        tracing::debug!(enemy = %enemy.id, ability = %ability.id, "enemy executes");
        return EnemyChoice::Ability(index);
    }

    let offensive = ready().find(|(_, a)| {
        matches!(
            a.kind,
            EnemyAbilityKind::Strike { .. }
                | EnemyAbilityKind::Drain { .. }
                | EnemyAbilityKind::Hex { .. }
        )
    });
    if let Some((index, ability)) = offensive {
        tracing::debug!(enemy = %enemy.id, ability = %ability.id, "enemy uses ability");
        return EnemyChoice::Ability(index);
    }

    EnemyChoice::Attack
}
