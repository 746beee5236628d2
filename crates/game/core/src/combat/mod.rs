//! Combat resolution system.
//!
//! # Architecture
//!
//! - **Pure math**: [`calculate_damage`] and friends never touch state
//! - **Policies**: enemy and companion action selection from their stats
//! - **Kernel**: [`resolve_round`] drives one full round through the effect pipeline
//!
//! All randomness comes from the command's [`RollStream`](crate::env::RollStream).

mod combo;
mod companion;
mod damage;
mod enemy;
mod kernel;
mod rewards;
mod triggers;

pub use combo::{ActiveCombo, ComboResult, ComboTracker};
pub use companion::{CompanionAction, choose_companion_action};
pub use damage::{
    DamageInput, DamageRoll, DamageType, Effectiveness, calculate_damage, effectiveness,
    roll_damage, scale_attack,
};
pub use enemy::{EnemyChoice, select_enemy_action};
pub use kernel::{CombatAction, flee_chance, resolve_round, start_combat};
pub use rewards::{LevelUp, RewardBundle, grant_experience, roll_rewards};
pub use triggers::{FiredTrigger, TriggerOutcome, fire_triggers};
