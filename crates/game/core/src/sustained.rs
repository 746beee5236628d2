//! Sustained (toggle) abilities.
//!
//! Activation pays a one-time cost and reserves part of the resource pool.
//! While active, the ability keeps its constant effect on the owner and pays
//! an upkeep at every round end. When the upkeep cannot be paid the ability
//! switches itself off.

use crate::error::{ErrorSeverity, GameError};
use crate::events::GameEvent;
use crate::state::{Player, SustainedTick};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SustainedError {
    #[error("unknown sustained ability '{0}'")]
    Unknown(String),

    #[error("'{0}' is already active")]
    AlreadyActive(String),

    #[error("'{0}' is not active")]
    NotActive(String),

    #[error("'{active}' already occupies the {group} slot")]
    GroupOccupied { group: String, active: String },

    #[error("not enough resource: need {required}, have {available}")]
    InsufficientResource { required: u32, available: u32 },

    #[error("activation would cost {cost} health with only {available} left")]
    InsufficientHealth { cost: u32, available: u32 },
}

impl GameError for SustainedError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unknown(_) | Self::AlreadyActive(_) | Self::NotActive(_) => {
                ErrorSeverity::Validation
            }
            Self::GroupOccupied { .. }
            | Self::InsufficientResource { .. }
            | Self::InsufficientHealth { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "SUSTAINED_UNKNOWN",
            Self::AlreadyActive(_) => "SUSTAINED_ALREADY_ACTIVE",
            Self::NotActive(_) => "SUSTAINED_NOT_ACTIVE",
            Self::GroupOccupied { .. } => "SUSTAINED_GROUP_OCCUPIED",
            Self::InsufficientResource { .. } => "SUSTAINED_INSUFFICIENT_RESOURCE",
            Self::InsufficientHealth { .. } => "SUSTAINED_INSUFFICIENT_HEALTH",
        }
    }
}

/// Checks whether `id` could be activated right now.
pub fn can_activate(player: &Player, id: &str) -> Result<(), SustainedError> {
    let ability = player
        .sustained_ability(id)
        .ok_or_else(|| SustainedError::Unknown(id.to_owned()))?;
    if ability.active {
        return Err(SustainedError::AlreadyActive(id.to_owned()));
    }

    if let Some(group) = &ability.spec.exclusive_group {
        let occupant = player
            .active_sustained()
            .find(|other| other.spec.exclusive_group.as_ref() == Some(group));
        if let Some(occupant) = occupant {
            return Err(SustainedError::GroupOccupied {
                group: group.clone(),
                active: occupant.id().to_owned(),
            });
        }
    }

    let required = ability.spec.activation_cost + ability.spec.reserve;
    let available = player.stats.resource();
    if available < required {
        return Err(SustainedError::InsufficientResource {
            required,
            available,
        });
    }

    let cost = ability.spec.health_cost;
    let health = player.stats.health();
    if cost > 0 && health <= cost {
        return Err(SustainedError::InsufficientHealth {
            cost,
            available: health,
        });
    }
    Ok(())
}

/// Activates `id`, paying its costs and attaching its constant effect.
pub fn activate(player: &mut Player, id: &str) -> Result<Vec<GameEvent>, SustainedError> {
    can_activate(player, id)?;
    let index = player
        .sustained
        .iter()
        .position(|s| s.id() == id)
        .ok_or_else(|| SustainedError::Unknown(id.to_owned()))?;

    let spec = player.sustained[index].spec.clone();
    let available = player.stats.resource();
    let paid = player.stats.spend(spec.activation_cost) && player.stats.reserve(spec.reserve);
    if !paid {
        return Err(SustainedError::InsufficientResource {
            required: spec.activation_cost + spec.reserve,
            available,
        });
    }
    player.stats.take_damage(spec.health_cost);
    player.statuses.push(spec.constant_effect.clone());
    player.sustained[index].active = true;

    tracing::debug!(ability = id, reserve = spec.reserve, "sustained ability activated");
    Ok(vec![GameEvent::SustainedActivated {
        ability: id.to_owned(),
    }])
}

/// Deactivates `id`, returning its reservation and removing its effect.
pub fn deactivate(player: &mut Player, id: &str) -> Result<Vec<GameEvent>, SustainedError> {
    let ability = player
        .sustained_ability(id)
        .ok_or_else(|| SustainedError::Unknown(id.to_owned()))?;
    if !ability.active {
        return Err(SustainedError::NotActive(id.to_owned()));
    }
    switch_off(player, id);
    Ok(vec![GameEvent::SustainedDeactivated {
        ability: id.to_owned(),
        forced: false,
    }])
}

fn switch_off(player: &mut Player, id: &str) {
    let Some(ability) = player.sustained.iter_mut().find(|s| s.id() == id) else {
        return;
    };
    ability.active = false;
    let reserve = ability.spec.reserve;
    let effect_id = ability.spec.constant_effect.id.clone();
    player.stats.release(reserve);
    player.statuses.remove(&effect_id);
}

/// Round-end upkeep for every active sustained ability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SustainedUpkeep {
    /// Combined periodic effects of abilities that stayed active.
    pub tick: SustainedTick,
    /// Abilities switched off because their upkeep could not be paid.
    pub deactivated: Vec<String>,
}

/// Pays upkeep for active abilities in catalog order.
///
/// An ability whose drain cannot be paid (resource short, or the health drain
/// would be lethal) is deactivated instead and contributes no tick.
pub fn process_turn(player: &mut Player) -> SustainedUpkeep {
    let mut upkeep = SustainedUpkeep::default();
    let active: Vec<_> = player.active_sustained().map(|s| s.spec.clone()).collect();

    for spec in active {
        let starved = player.stats.resource() < spec.drain_resource;
        let lethal = spec.drain_health > 0 && player.stats.health() <= spec.drain_health;
        if starved || lethal {
            tracing::debug!(ability = %spec.id, starved, lethal, "sustained upkeep failed");
            switch_off(player, &spec.id);
            upkeep.deactivated.push(spec.id);
            continue;
        }

        player.stats.drain(spec.drain_resource);
        player.stats.take_damage(spec.drain_health);
        upkeep.tick.heal += spec.tick.heal;
        upkeep.tick.enemy_damage += spec.tick.enemy_damage;
    }
    upkeep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CharacterClass;

    fn mage() -> Player {
        Player::new("Iri", CharacterClass::Mage)
    }

    #[test]
    fn activation_reserves_resource_and_adds_effect() {
        let mut p = mage();
        let max = p.stats.resource_max();
        activate(&mut p, "mana_shield").unwrap();

        assert_eq!(p.stats.resource_reserved(), 25);
        assert_eq!(p.stats.resource(), max - 10 - 25);
        assert!(p.statuses.contains("sustained:mana_shield"));
        assert!(p.sustained_ability("mana_shield").unwrap().active);
    }

    #[test]
    fn deactivation_refunds_reserve() {
        let mut p = mage();
        activate(&mut p, "mana_shield").unwrap();
        let before = p.stats.resource();
        deactivate(&mut p, "mana_shield").unwrap();

        assert_eq!(p.stats.resource_reserved(), 0);
        assert_eq!(p.stats.resource(), before + 25);
        assert!(!p.statuses.contains("sustained:mana_shield"));
    }

    #[test]
    fn double_activation_is_rejected() {
        let mut p = mage();
        activate(&mut p, "mana_shield").unwrap();
        assert_eq!(
            activate(&mut p, "mana_shield"),
            Err(SustainedError::AlreadyActive("mana_shield".into()))
        );
        assert_eq!(
            deactivate(&mut mage(), "mana_shield"),
            Err(SustainedError::NotActive("mana_shield".into()))
        );
    }

    #[test]
    fn short_resource_blocks_activation() {
        let mut p = mage();
        p.stats.drain(p.stats.resource() - 20);
        assert!(matches!(
            activate(&mut p, "mana_shield"),
            Err(SustainedError::InsufficientResource { required: 35, available: 20 })
        ));
        assert!(p.statuses.is_empty());
    }

    #[test]
    fn upkeep_starvation_switches_off() {
        let mut p = mage();
        activate(&mut p, "mana_shield").unwrap();
        p.stats.drain(p.stats.resource());

        let upkeep = process_turn(&mut p);
        assert_eq!(upkeep.deactivated, vec!["mana_shield".to_string()]);
        assert!(!p.sustained_ability("mana_shield").unwrap().active);
        assert!(!p.statuses.contains("sustained:mana_shield"));
        assert_eq!(p.stats.resource_reserved(), 0);
    }

    #[test]
    fn upkeep_pays_drain_while_affordable() {
        let mut p = mage();
        activate(&mut p, "mana_shield").unwrap();
        let before = p.stats.resource();
        let upkeep = process_turn(&mut p);
        assert!(upkeep.deactivated.is_empty());
        assert_eq!(p.stats.resource(), before - 3);
    }
}
