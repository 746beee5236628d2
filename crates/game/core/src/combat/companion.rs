//! Companion behavior.
//!
//! Companions choose from a weighted table that depends on their health and
//! their bond with the player. Low bond opens the door to betrayal.

use crate::config::GameConfig;
use crate::env::RollStream;
use crate::state::Companion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanionAction {
    Attack,
    /// Index into the companion's ability list.
    Ability(usize),
    Defend,
    Flee,
    Betray,
}

impl CompanionAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Ability(_) => "ability",
            Self::Defend => "defend",
            Self::Flee => "flee",
            Self::Betray => "betray",
        }
    }
}

/// Weights in the order attack, ability, defend, flee, betray.
fn weights(companion: &Companion, has_ability: bool, config: &GameConfig) -> [u32; 5] {
    let mut weights = if companion.stats.health_percent() < config.companion_low_health_percent {
        [10, 10, 45, 35, 0]
    } else if companion.bond >= config.companion_high_bond {
        [60, 30, 10, 0, 0]
    } else if companion.bond < config.companion_betrayal_bond {
        [40, 0, 20, 20, 20]
    } else {
        [45, 25, 25, 5, 0]
    };
    if !has_ability {
        weights[1] = 0;
    }
    weights
}

pub fn choose_companion_action(
    companion: &Companion,
    rolls: &mut RollStream,
    config: &GameConfig,
) -> CompanionAction {
    let ready = companion
        .abilities
        .iter()
        .position(|a| companion.cooldowns.is_ready(&a.id));
    let table = weights(companion, ready.is_some(), config);

    let action = match rolls.weighted(&table) {
        Some(0) | None => CompanionAction::Attack,
        Some(1) => ready.map_or(CompanionAction::Attack, CompanionAction::Ability),
        Some(2) => CompanionAction::Defend,
        Some(3) => CompanionAction::Flee,
        Some(_) => CompanionAction::Betray,
    };
    tracing::debug!(
        companion = %companion.id,
        bond = companion.bond,
        action = action.label(),
        "companion chose action"
    );
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntityId;
    use crate::stats::BaseStats;

    fn companion(bond: u32) -> Companion {
        Companion::new(EntityId(5), "Bram", BaseStats::new(60, 8, 3, 0), bond, Vec::new())
    }

    #[test]
    fn loyal_companions_never_betray() {
        let config = GameConfig::default();
        let c = companion(90);
        for nonce in 0..300 {
            let mut rolls = RollStream::new(17, nonce);
            let action = choose_companion_action(&c, &mut rolls, &config);
            assert!(!matches!(action, CompanionAction::Betray | CompanionAction::Flee));
        }
    }

    #[test]
    fn no_ready_ability_is_never_chosen() {
        let config = GameConfig::default();
        let c = companion(50);
        for nonce in 0..300 {
            let mut rolls = RollStream::new(3, nonce);
            assert!(!matches!(
                choose_companion_action(&c, &mut rolls, &config),
                CompanionAction::Ability(_)
            ));
        }
    }

    #[test]
    fn disloyal_companions_sometimes_betray() {
        let config = GameConfig::default();
        let c = companion(5);
        let betrayals = (0..400)
            .filter(|nonce| {
                let mut rolls = RollStream::new(8, *nonce);
                choose_companion_action(&c, &mut rolls, &config) == CompanionAction::Betray
            })
            .count();
        assert!(betrayals > 0);
    }
}
