pub mod abilities;
pub mod actor;
pub mod class;
pub mod common;
pub mod item;
pub mod status;
pub mod sustained;

// Re-export ability types
pub use abilities::{
    Ability, AbilityKind, AbilityRole, CompanionAbility, CompanionAbilityKind, Cooldowns,
    EnemyAbility, EnemyAbilityKind,
};

// Re-export actor types
pub use actor::{
    Actor, Combatant, Companion, EnemyRank, EnemyTemplate, LootEntry, Player, Rewards, Stance,
};

// Re-export class catalog
pub use class::{CharacterClass, ResourceKind, Unlock};

// Re-export common types
pub use common::EntityId;

// Re-export item types
pub use item::{Consumable, Equipment, EquipmentSlot, Item, ItemTrigger, TriggerEvents};

// Re-export status effects
pub use status::{
    EffectDuration, EffectSource, StackPolicy, StatusCategory, StatusEffect, StatusEffects,
};

// Re-export sustained abilities
pub use sustained::{SustainedAbility, SustainedSpec, SustainedTick};
