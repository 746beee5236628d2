//! Combat round resolution.
//!
//! A round walks the phase machine `Idle → PlayerTurn → EnemyTurn → RoundEnd
//! → Idle`, leaving early for `Victory`, `Defeat` or `Fled`. Death is checked
//! after every step that can deal damage, so nothing resolves after the
//! deciding blow.

use crate::combat::{
    CompanionAction, ComboResult, DamageInput, DamageType, EnemyChoice, choose_companion_action,
    fire_triggers, grant_experience, roll_damage, roll_rewards, scale_attack, select_enemy_action,
};
use crate::config::GameConfig;
use crate::effect::{Effect, PipelineReport, Target, apply_effects};
use crate::engine::ActionError;
use crate::env::RollStream;
use crate::events::GameEvent;
use crate::state::{
    AbilityKind, AbilityRole, Actor, CombatPhase, CombatState, Combatant, CompanionAbilityKind,
    EnemyAbilityKind, EnemyRank, Encounter, EntityId, GameState, StatusEffect, TriggerEvents,
};
use crate::status;
use crate::sustained;

/// The player's choice for one round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    /// Basic weapon attack.
    Attack,
    Ability(String),
    /// Consume an item from the inventory by id.
    UseItem(String),
    Flee,
}

/// Starts combat against `enemy`. The caller checks that no encounter is open.
pub fn start_combat(state: &mut GameState, enemy: Combatant) -> Vec<GameEvent> {
    let event = GameEvent::CombatStarted {
        enemy: enemy.id,
        name: enemy.name.clone(),
        rank: enemy.rank,
    };
    state.player.combo = Default::default();
    state.encounter = Encounter::Combat(CombatState::new(enemy));
    vec![event]
}

/// Flee chance in percent for the current player.
pub fn flee_chance(state: &GameState, config: &GameConfig) -> u32 {
    let chance = config.flee_base_percent as i64
        + state.player.attributes.dexterity as i64 * config.flee_per_dexterity as i64;
    GameConfig::clamp_chance(chance).min(GameConfig::MAX_FLEE_PERCENT)
}

/// Resolves one full round for `action`.
///
/// Validation failures are returned before anything is committed by the
/// engine; the round itself never fails once the player's action is accepted.
pub fn resolve_round(
    state: &mut GameState,
    action: &CombatAction,
    config: &GameConfig,
) -> Result<Vec<GameEvent>, ActionError> {
    let combat = state.encounter.combat().ok_or(ActionError::WrongEncounter {
        expected: crate::state::EncounterKind::Combat,
        found: state.encounter.kind(),
    })?;
    if combat.phase.is_terminal() {
        return Err(ActionError::EncounterResolved);
    }
    if state.is_defeated() {
        return Err(ActionError::PlayerDefeated);
    }

    let rolls = state.rolls();
    let mut round = Round {
        state,
        config,
        rolls,
        events: Vec::new(),
    };
    round.run(action)?;
    Ok(round.events)
}

struct Round<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
    rolls: RollStream,
    events: Vec<GameEvent>,
}

impl Round<'_> {
    fn run(&mut self, action: &CombatAction) -> Result<(), ActionError> {
        self.set_phase(CombatPhase::PlayerTurn);
        match action {
            CombatAction::Attack => {
                let damage_type = self.state.player.equipment.weapon_damage_type();
                self.player_strike(100, damage_type, None);
            }
            CombatAction::Ability(id) => self.use_ability(id)?,
            CombatAction::UseItem(id) => self.use_item(id)?,
            CombatAction::Flee => {
                if self.flee()? {
                    return Ok(());
                }
            }
        }
        if self.settle() {
            return Ok(());
        }

        self.companion_turns();
        if self.settle() {
            return Ok(());
        }

        self.set_phase(CombatPhase::EnemyTurn);
        self.enemy_turn();
        if self.settle() {
            return Ok(());
        }

        self.set_phase(CombatPhase::RoundEnd);
        self.round_end();
        if self.settle() {
            return Ok(());
        }
        self.set_phase(CombatPhase::Idle);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------------

    fn combat(&mut self) -> Option<&mut CombatState> {
        self.state.encounter.combat_mut()
    }

    fn enemy(&self) -> Option<&Combatant> {
        self.state.encounter.enemy()
    }

    fn enemy_id(&self) -> Option<EntityId> {
        self.enemy().map(|e| e.id)
    }

    fn set_phase(&mut self, phase: CombatPhase) {
        if let Some(combat) = self.combat() {
            combat.phase = phase;
            self.events.push(GameEvent::PhaseChanged { phase });
        }
    }

    /// Runs effects through the pipeline and records the resulting events.
    fn apply(&mut self, effects: Vec<Effect>) -> PipelineReport {
        if effects.is_empty() {
            return PipelineReport::default();
        }
        let report = apply_effects(self.state, effects);
        let enemy = self.enemy_id();
        self.events.extend(GameEvent::from_report(&report, enemy));
        report
    }

    /// Moves to a terminal phase if either side is down. Returns true when
    /// the round must stop.
    fn settle(&mut self) -> bool {
        let Some(combat) = self.state.encounter.combat() else {
            return true;
        };
        if combat.phase.is_terminal() {
            return true;
        }
        if self.state.is_defeated() {
            self.set_phase(CombatPhase::Defeat);
            self.events.push(GameEvent::Defeat);
            return true;
        }
        if self.enemy().is_some_and(|e| !e.is_alive()) {
            self.victory();
            return true;
        }
        false
    }

    fn push_triggers(&mut self, outcome: &crate::combat::TriggerOutcome) {
        self.events
            .extend(outcome.fired.iter().map(|fired| GameEvent::TriggerFired {
                event: fired.event,
                bonus_damage: fired.bonus_damage,
                heal: fired.heal,
                narration: fired.narration.clone(),
            }));
    }

    // ------------------------------------------------------------------------
    // Player turn
    // ------------------------------------------------------------------------

    fn player_strike(
        &mut self,
        power_percent: u32,
        damage_type: DamageType,
        on_hit: Option<StatusEffect>,
    ) {
        let Some(enemy) = self.enemy() else {
            return;
        };
        let player = &self.state.player;
        let base_attack = player.effective_stats().attack;
        let input = DamageInput {
            attack: scale_attack(base_attack, player.stance.attack_percent(), power_percent),
            base_attack,
            defense: enemy.effective_stats().defense,
            damage_type,
            weakness: enemy.weakness,
            resistance: enemy.resistance,
        };
        let (enemy_id, bonus) = (enemy.id, player.combo.bonus_percent());

        let roll = roll_damage(&input, &mut self.rolls, self.config);
        let amount = roll.amount * (100 + bonus) / 100;
        self.events.push(GameEvent::Attack {
            attacker: EntityId::PLAYER,
            target: enemy_id,
            amount,
            damage_type,
            effectiveness: roll.effectiveness,
            critical: roll.critical,
        });

        let mut events = TriggerEvents::ON_ATTACK | TriggerEvents::ON_DAMAGE_DEALT;
        if roll.critical {
            events |= TriggerEvents::ON_CRITICAL_HIT;
        }
        let mut bonus_damage = 0;
        let mut heal = 0;
        for event in events.iter() {
            let fired = fire_triggers(&self.state.player.equipment, event, &mut self.rolls);
            bonus_damage += fired.bonus_damage();
            heal += fired.heal();
            self.push_triggers(&fired);
        }

        match self.state.player.combo.record(damage_type, self.config) {
            ComboResult::Building { count } => self
                .events
                .push(GameEvent::ComboProgress { damage_type, count }),
            ComboResult::Triggered {
                damage_type,
                bonus_percent,
            } => self.events.push(GameEvent::ComboTriggered {
                damage_type,
                bonus_percent,
            }),
            ComboResult::Reset => self.events.push(GameEvent::ComboReset),
        }

        let mut effects = vec![Effect::damage(Target::Enemy, amount + bonus_damage, damage_type)];
        if heal > 0 {
            effects.push(Effect::heal(Target::Player, heal));
        }
        if let Some(status) = on_hit {
            effects.push(Effect::status(Target::Enemy, status));
        }
        self.apply(effects);
    }

    fn use_ability(&mut self, id: &str) -> Result<(), ActionError> {
        let player = &mut self.state.player;
        let ability = player
            .ability(id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownAbility(id.to_owned()))?;
        let remaining = player.cooldowns.remaining(id);
        if remaining > 0 {
            return Err(ActionError::OnCooldown {
                ability: id.to_owned(),
                remaining,
            });
        }
        let available = player.stats.resource();
        if !player.stats.spend(ability.cost) {
            return Err(ActionError::InsufficientResource {
                required: ability.cost,
                available,
            });
        }
        player.cooldowns.start(id, ability.cooldown);
        self.events.push(GameEvent::AbilityUsed {
            actor: EntityId::PLAYER,
            role: AbilityRole::Player,
            ability: ability.id.clone(),
        });

        match ability.kind {
            AbilityKind::Strike {
                power_percent,
                damage_type,
                on_hit,
            } => self.player_strike(power_percent, damage_type, on_hit),
            AbilityKind::Heal { amount } => {
                self.apply(vec![Effect::heal(Target::Player, amount)]);
            }
            AbilityKind::Empower { effect } => {
                self.apply(vec![Effect::status(Target::Player, effect)]);
            }
        }
        Ok(())
    }

    fn use_item(&mut self, id: &str) -> Result<(), ActionError> {
        let inventory = &mut self.state.player.inventory;
        let index = inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| ActionError::UnknownItem(id.to_owned()))?;
        let consumable = inventory[index]
            .consumable
            .ok_or_else(|| ActionError::NotConsumable(id.to_owned()))?;
        let item = inventory.remove(index);
        self.events.push(GameEvent::ItemUsed { item: item.name });

        let mut effects = Vec::new();
        if consumable.heal > 0 {
            effects.push(Effect::heal(Target::Player, consumable.heal));
        }
        if consumable.restore > 0 {
            effects.push(Effect::RestoreResource {
                target: Target::Player,
                amount: consumable.restore,
            });
        }
        self.apply(effects);
        Ok(())
    }

    /// Returns true when the player escaped.
    fn flee(&mut self) -> Result<bool, ActionError> {
        if self.enemy().is_some_and(|e| e.rank == EnemyRank::Boss) {
            return Err(ActionError::CannotFleeBoss);
        }
        let chance = flee_chance(self.state, self.config);
        if self.rolls.chance(chance) {
            self.set_phase(CombatPhase::Fled);
            self.events.push(GameEvent::Fled);
            return Ok(true);
        }
        self.events.push(GameEvent::FleeFailed { chance });
        Ok(false)
    }

    // ------------------------------------------------------------------------
    // Companions
    // ------------------------------------------------------------------------

    fn companion_turns(&mut self) {
        for index in 0..self.state.party.len() {
            if !self.state.party[index].can_act() {
                continue;
            }
            let action =
                choose_companion_action(&self.state.party[index], &mut self.rolls, self.config);
            let companion_id = self.state.party[index].id;
            self.events.push(GameEvent::CompanionActed {
                companion: companion_id,
                action: action.label().to_owned(),
            });

            match action {
                CompanionAction::Attack => {
                    let damage_type = self.state.party[index].damage_type;
                    self.companion_strike(index, 100, damage_type);
                }
                CompanionAction::Ability(ability_index) => {
                    let companion = &mut self.state.party[index];
                    let Some(ability) = companion.abilities.get(ability_index).cloned() else {
                        continue;
                    };
                    companion.cooldowns.start(&ability.id, ability.cooldown);
                    self.events.push(GameEvent::AbilityUsed {
                        actor: companion_id,
                        role: AbilityRole::Companion,
                        ability: ability.id.clone(),
                    });
                    match ability.kind {
                        CompanionAbilityKind::Strike {
                            power_percent,
                            damage_type,
                        } => self.companion_strike(index, power_percent, damage_type),
                        CompanionAbilityKind::Mend { amount } => {
                            self.apply(vec![Effect::heal(Target::Player, amount)]);
                        }
                        CompanionAbilityKind::Rally { effect } => {
                            self.apply(vec![Effect::status(Target::Player, effect)]);
                        }
                    }
                }
                CompanionAction::Defend => {}
                CompanionAction::Flee => {
                    self.state.party[index].active = false;
                    self.events.push(GameEvent::CompanionLeft {
                        companion: companion_id,
                        betrayed: false,
                    });
                }
                CompanionAction::Betray => {
                    let companion = &self.state.party[index];
                    let attack = companion.effective_stats().attack;
                    let input = DamageInput {
                        attack,
                        base_attack: attack,
                        defense: self.state.player.effective_stats().defense,
                        damage_type: companion.damage_type,
                        weakness: None,
                        resistance: None,
                    };
                    let roll = roll_damage(&input, &mut self.rolls, self.config);
                    self.state.party[index].active = false;
                    self.events.push(GameEvent::CompanionLeft {
                        companion: companion_id,
                        betrayed: true,
                    });
                    let damage = Effect::damage(Target::Player, roll.amount, input.damage_type);
                    self.apply(vec![damage]);
                }
            }

            if self.settle() {
                return;
            }
        }
    }

    fn companion_strike(&mut self, index: usize, power_percent: u32, damage_type: DamageType) {
        let Some(enemy) = self.enemy() else {
            return;
        };
        let companion = &self.state.party[index];
        let base_attack = companion.effective_stats().attack;
        let input = DamageInput {
            attack: scale_attack(base_attack, power_percent, 100),
            base_attack,
            defense: enemy.effective_stats().defense,
            damage_type,
            weakness: enemy.weakness,
            resistance: enemy.resistance,
        };
        let (attacker, target) = (companion.id, enemy.id);
        let roll = roll_damage(&input, &mut self.rolls, self.config);
        self.events.push(GameEvent::Attack {
            attacker,
            target,
            amount: roll.amount,
            damage_type,
            effectiveness: roll.effectiveness,
            critical: roll.critical,
        });
        self.apply(vec![Effect::damage(Target::Enemy, roll.amount, damage_type)]);
    }

    // ------------------------------------------------------------------------
    // Enemy turn
    // ------------------------------------------------------------------------

    fn enemy_turn(&mut self) {
        let player_stats = self.state.player.effective_stats();
        if self.rolls.chance(player_stats.dodge_percent) {
            self.events.push(GameEvent::Dodged);
            return;
        }

        let Some(enemy) = self.enemy() else {
            return;
        };
        let (enemy_id, default_type) = (enemy.id, enemy.damage_type);
        let health_percent = self.state.player.stats.health_percent();
        let choice = select_enemy_action(enemy, health_percent, self.config);

        let kind = match choice {
            EnemyChoice::Attack => None,
            EnemyChoice::Ability(index) => {
                let Some(enemy) = self.state.encounter.enemy_mut() else {
                    return;
                };
                let Some(ability) = enemy.abilities.get(index).cloned() else {
                    return;
                };
                enemy.cooldowns.start(&ability.id, ability.cooldown);
                self.events.push(GameEvent::AbilityUsed {
                    actor: enemy_id,
                    role: AbilityRole::Enemy,
                    ability: ability.id,
                });
                Some(ability.kind)
            }
        };

        match kind {
            None => {
                self.enemy_strike(100, default_type);
            }
            Some(EnemyAbilityKind::Strike {
                power_percent,
                damage_type,
            }) => {
                self.enemy_strike(power_percent, damage_type);
            }
            Some(EnemyAbilityKind::Execute { power_percent, .. }) => {
                self.enemy_strike(power_percent, default_type);
            }
            Some(EnemyAbilityKind::Drain { power_percent }) => {
                let dealt = self.enemy_strike(power_percent, default_type);
                if dealt / 2 > 0 {
                    self.apply(vec![Effect::heal(Target::Enemy, dealt / 2)]);
                }
            }
            Some(EnemyAbilityKind::Hex { effect }) => {
                self.apply(vec![Effect::status(Target::Player, effect)]);
            }
            Some(EnemyAbilityKind::Mend { amount }) => {
                self.apply(vec![Effect::heal(Target::Enemy, amount)]);
            }
        }
    }

    /// Enemy hits the player. Damage-taken triggers resolve first; if they
    /// finish the enemy, the hit never lands. Returns damage dealt.
    fn enemy_strike(&mut self, power_percent: u32, damage_type: DamageType) -> u32 {
        let Some(enemy) = self.enemy() else {
            return 0;
        };
        let player = &self.state.player;
        let defense =
            player.effective_stats().defense as u64 * player.stance.defense_percent() as u64 / 100;
        let base_attack = enemy.effective_stats().attack;
        let input = DamageInput {
            attack: scale_attack(base_attack, power_percent, 100),
            base_attack,
            defense: defense as u32,
            damage_type,
            weakness: None,
            resistance: None,
        };
        let enemy_id = enemy.id;
        let roll = roll_damage(&input, &mut self.rolls, self.config);
        self.events.push(GameEvent::Attack {
            attacker: enemy_id,
            target: EntityId::PLAYER,
            amount: roll.amount,
            damage_type,
            effectiveness: roll.effectiveness,
            critical: roll.critical,
        });

        let fired = fire_triggers(
            &self.state.player.equipment,
            TriggerEvents::ON_DAMAGE_TAKEN,
            &mut self.rolls,
        );
        self.push_triggers(&fired);
        let mut reactions = Vec::new();
        if fired.bonus_damage() > 0 {
            reactions.push(Effect::damage(Target::Enemy, fired.bonus_damage(), DamageType::True));
        }
        if fired.heal() > 0 {
            reactions.push(Effect::heal(Target::Player, fired.heal()));
        }
        self.apply(reactions);
        if self.settle() {
            return 0;
        }

        let report = self.apply(vec![Effect::damage(Target::Player, roll.amount, damage_type)]);
        report.damage_to(Target::Player)
    }

    // ------------------------------------------------------------------------
    // Round end
    // ------------------------------------------------------------------------

    fn round_end(&mut self) {
        let ticked = status::tick(&mut self.state.player);
        self.push_tick(EntityId::PLAYER, ticked);
        if self.settle() {
            return;
        }

        if let Some(enemy) = self.state.encounter.enemy_mut() {
            let id = enemy.id;
            let ticked = status::tick(enemy);
            self.push_tick(id, ticked);
            if self.settle() {
                return;
            }
        }

        let upkeep = sustained::process_turn(&mut self.state.player);
        self.events
            .extend(upkeep.deactivated.into_iter().map(|ability| GameEvent::SustainedDeactivated {
                ability,
                forced: true,
            }));
        let mut effects = Vec::new();
        if upkeep.tick.heal > 0 {
            effects.push(Effect::heal(Target::Player, upkeep.tick.heal));
        }
        if upkeep.tick.enemy_damage > 0 {
            effects.push(Effect::damage(Target::Enemy, upkeep.tick.enemy_damage, DamageType::True));
        }
        self.apply(effects);
        if self.settle() {
            return;
        }

        self.state.player.cooldowns.tick();
        if let Some(enemy) = self.state.encounter.enemy_mut() {
            enemy.cooldowns.tick();
        }
        for companion in &mut self.state.party {
            companion.cooldowns.tick();
        }

        let player = &mut self.state.player;
        let gear_regen = player.equipment.modifiers().resource_regen.max(0) as u32;
        let regen = player.class.resource_regen() + gear_regen;
        let restored = player.stats.restore(regen);
        if restored > 0 {
            self.events.push(GameEvent::ResourceRestored {
                target: EntityId::PLAYER,
                amount: restored,
            });
        }

        if self.state.player.combo.tick() {
            self.events.push(GameEvent::ComboExpired);
        }

        if let Some(combat) = self.combat() {
            combat.round += 1;
            let round = combat.round;
            self.events.push(GameEvent::RoundEnded { round });
        }
    }

    fn push_tick(&mut self, target: EntityId, report: status::TickReport) {
        if report.damage > 0 || report.healed > 0 {
            self.events.push(GameEvent::StatusTicked {
                target,
                damage: report.damage,
                healed: report.healed,
            });
        }
        self.events.extend(report.expired.into_iter().map(|effect| GameEvent::StatusExpired {
            target,
            status: effect.id,
        }));
    }

    // ------------------------------------------------------------------------
    // Victory
    // ------------------------------------------------------------------------

    fn victory(&mut self) {
        let Some(enemy) = self.enemy().cloned() else {
            return;
        };
        self.set_phase(CombatPhase::Victory);
        self.events.push(GameEvent::Victory { enemy: enemy.id });

        let fired = fire_triggers(
            &self.state.player.equipment,
            TriggerEvents::ON_KILL,
            &mut self.rolls,
        );
        self.push_triggers(&fired);

        let rewards = roll_rewards(&enemy, &self.state.player.effective_stats(), &mut self.rolls);
        let mut effects = Vec::new();
        if fired.heal() > 0 {
            effects.push(Effect::heal(Target::Player, fired.heal()));
        }
        if rewards.gold > 0 {
            effects.push(Effect::ModifyGold {
                amount: rewards.gold as i64,
            });
        }
        effects.extend(rewards.loot.iter().cloned().map(|item| Effect::GrantItem { item }));
        self.apply(effects);

        self.events.push(GameEvent::RewardsGranted {
            gold: rewards.gold,
            experience: rewards.experience,
            loot: rewards.loot.iter().map(|item| item.name.clone()).collect(),
        });
        let levels = grant_experience(&mut self.state.player, rewards.experience, self.config);
        self.events.extend(levels.into_iter().map(|level| GameEvent::LevelUp {
            level: level.level,
            unlocked: level.unlocked,
        }));

        if enemy.rank == EnemyRank::Boss {
            let cleared = self.state.floor;
            self.state.floor += 1;
            self.state.rooms_cleared = 0;
            self.events.push(GameEvent::FloorCleared { floor: cleared });
        }
    }
}
