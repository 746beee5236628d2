use crate::state::StatusEffect;

/// Static definition of a toggleable ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainedSpec {
    pub id: String,
    pub name: String,
    /// One-time resource cost paid on activation.
    pub activation_cost: u32,
    /// Resource held back from the pool while active.
    pub reserve: u32,
    /// Health paid on activation. Activation fails if it would be lethal.
    pub health_cost: u32,
    /// Resource drained at every round end.
    pub drain_resource: u32,
    /// Health drained at every round end.
    pub drain_health: u32,
    /// Periodic effect applied while the ability upkeep succeeds.
    pub tick: SustainedTick,
    /// Present on the owner exactly while the ability is active.
    pub constant_effect: StatusEffect,
    /// At most one ability per group can be active.
    pub exclusive_group: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainedTick {
    pub heal: u32,
    pub enemy_damage: u32,
}

/// A sustained ability known by the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainedAbility {
    pub spec: SustainedSpec,
    pub active: bool,
}

impl SustainedAbility {
    pub fn new(spec: SustainedSpec) -> Self {
        Self {
            spec,
            active: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }
}
