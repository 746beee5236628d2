//! Narration-worthy facts produced by every command.
//!
//! Events describe what already happened; they are returned alongside the new
//! state and never fed back into numeric resolution.

use crate::combat::{DamageType, Effectiveness};
use crate::effect::{AppliedValue, PipelineReport, RejectReason, Target};
use crate::encounter::{RoomType, ShrineOutcome, TrapAction, TrapOutcome};
use crate::state::{AbilityRole, CombatPhase, EnemyRank, EntityId, Stance, TriggerEvents};
use crate::status::ApplyOutcome;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    RoomEntered {
        floor: u32,
        room: RoomType,
    },
    CombatStarted {
        enemy: EntityId,
        name: String,
        rank: EnemyRank,
    },
    PhaseChanged {
        phase: CombatPhase,
    },
    AbilityUsed {
        actor: EntityId,
        role: AbilityRole,
        ability: String,
    },
    Attack {
        attacker: EntityId,
        target: EntityId,
        amount: u32,
        damage_type: DamageType,
        effectiveness: Effectiveness,
        critical: bool,
    },
    TriggerFired {
        event: TriggerEvents,
        bonus_damage: u32,
        heal: u32,
        narration: String,
    },
    ComboProgress {
        damage_type: DamageType,
        count: u32,
    },
    ComboTriggered {
        damage_type: DamageType,
        bonus_percent: u32,
    },
    ComboReset,
    ComboExpired,
    Damaged {
        target: EntityId,
        amount: u32,
        remaining: u32,
    },
    Healed {
        target: EntityId,
        amount: u32,
    },
    StatusApplied {
        target: EntityId,
        status: String,
        outcome: ApplyOutcome,
    },
    StatusTicked {
        target: EntityId,
        damage: u32,
        healed: u32,
    },
    StatusExpired {
        target: EntityId,
        status: String,
    },
    Cleansed {
        target: EntityId,
        removed: Vec<String>,
    },
    ResourceRestored {
        target: EntityId,
        amount: u32,
    },
    GoldChanged {
        delta: i64,
        total: u32,
    },
    ItemGranted {
        item: String,
    },
    ItemUsed {
        item: String,
    },
    EffectRejected {
        reason: RejectReason,
    },
    Dodged,
    Fled,
    FleeFailed {
        chance: u32,
    },
    CompanionActed {
        companion: EntityId,
        action: String,
    },
    CompanionLeft {
        companion: EntityId,
        betrayed: bool,
    },
    SustainedActivated {
        ability: String,
    },
    SustainedDeactivated {
        ability: String,
        forced: bool,
    },
    StanceChanged {
        stance: Stance,
    },
    Victory {
        enemy: EntityId,
    },
    Defeat,
    RewardsGranted {
        gold: u32,
        experience: u32,
        loot: Vec<String>,
    },
    LevelUp {
        level: u32,
        unlocked: Vec<String>,
    },
    FloorCleared {
        floor: u32,
    },
    RoundEnded {
        round: u32,
    },
    TrapResolved {
        action: TrapAction,
        outcome: TrapOutcome,
    },
    ShrineResolved {
        outcome: ShrineOutcome,
    },
    Purchased {
        item: String,
        price: u32,
    },
    NpcHelped {
        gold: u32,
    },
    EncounterLeft,
}

impl GameEvent {
    /// Translates a pipeline report into events: applied effects in order, then rejections.
    pub fn from_report(report: &PipelineReport, enemy: Option<EntityId>) -> Vec<GameEvent> {
        let resolve = |target: Target| match target {
            Target::Player => EntityId::PLAYER,
            Target::Enemy => enemy.unwrap_or_default(),
        };

        let mut events: Vec<GameEvent> = report
            .applied
            .iter()
            .map(|applied| {
                let target = resolve(applied.effect.target());
                match &applied.value {
                    AppliedValue::Damage { dealt, remaining } => GameEvent::Damaged {
                        target,
                        amount: *dealt,
                        remaining: *remaining,
                    },
                    AppliedValue::Healed(amount) => GameEvent::Healed {
                        target,
                        amount: *amount,
                    },
                    AppliedValue::Status(outcome) => GameEvent::StatusApplied {
                        target,
                        status: match &applied.effect {
                            crate::effect::Effect::ApplyStatus { status, .. } => status.id.clone(),
                            _ => String::new(),
                        },
                        outcome: *outcome,
                    },
                    AppliedValue::Gold { delta, total } => GameEvent::GoldChanged {
                        delta: *delta,
                        total: *total,
                    },
                    AppliedValue::ItemGranted => GameEvent::ItemGranted {
                        item: match &applied.effect {
                            crate::effect::Effect::GrantItem { item } => item.name.clone(),
                            _ => String::new(),
                        },
                    },
                    AppliedValue::Restored(amount) => GameEvent::ResourceRestored {
                        target,
                        amount: *amount,
                    },
                    AppliedValue::Cleansed(removed) => GameEvent::Cleansed {
                        target,
                        removed: removed.clone(),
                    },
                }
            })
            .collect();

        events.extend(
            report
                .rejected
                .iter()
                .map(|r| GameEvent::EffectRejected { reason: r.reason }),
        );
        events
    }
}
