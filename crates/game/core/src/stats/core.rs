//! Stored stats: health, attack, defense and the class resource pool.

/// Base numeric state of any actor.
///
/// Health and resource are private so every write is clamped:
/// `0 <= health <= max_health` and `0 <= resource <= resource_max - resource_reserved`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    health: u32,
    max_health: u32,
    pub attack: u32,
    pub defense: u32,
    resource: u32,
    resource_max: u32,
    /// Portion of the pool held by active sustained abilities.
    resource_reserved: u32,
}

impl BaseStats {
    /// Creates stats with full health and a full resource pool.
    pub fn new(max_health: u32, attack: u32, defense: u32, resource_max: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            attack,
            defense,
            resource: resource_max,
            resource_max,
            resource_reserved: 0,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn resource(&self) -> u32 {
        self.resource
    }

    pub fn resource_max(&self) -> u32 {
        self.resource_max
    }

    pub fn resource_reserved(&self) -> u32 {
        self.resource_reserved
    }

    /// Ceiling of the spendable pool once reserves are held back.
    pub fn usable_resource_max(&self) -> u32 {
        self.resource_max.saturating_sub(self.resource_reserved)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Current health as a percentage of max (0 when max is 0).
    pub fn health_percent(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        self.health * 100 / self.max_health
    }

    /// Lowers health, saturating at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Raises health up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health - self.health);
        self.health += healed;
        healed
    }

    pub fn set_health(&mut self, value: u32) {
        self.health = value.min(self.max_health);
    }

    /// Raises max health and refills the pool.
    pub fn grow_max_health(&mut self, amount: u32) {
        self.max_health = self.max_health.saturating_add(amount);
        self.health = self.max_health;
    }

    /// Spends resource only when the full amount is available.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.resource < amount {
            return false;
        }
        self.resource -= amount;
        true
    }

    /// Removes up to `amount` resource. Returns what was removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.resource);
        self.resource -= drained;
        drained
    }

    /// Adds resource up to the usable ceiling. Returns what was added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let ceiling = self.usable_resource_max();
        let restored = amount.min(ceiling.saturating_sub(self.resource));
        self.resource += restored;
        restored
    }

    /// Moves `amount` out of the current pool into the reserve.
    ///
    /// Fails without change when the pool cannot cover it.
    pub fn reserve(&mut self, amount: u32) -> bool {
        if self.resource < amount {
            return false;
        }
        self.resource -= amount;
        self.resource_reserved += amount;
        true
    }

    /// Returns a reserved amount to the pool.
    pub fn release(&mut self, amount: u32) {
        let released = amount.min(self.resource_reserved);
        self.resource_reserved -= released;
        self.restore(released);
    }

    pub fn grow_resource_max(&mut self, amount: u32) {
        self.resource_max = self.resource_max.saturating_add(amount);
    }
}

/// Character attributes. Dexterity drives dodge, flee and disarm chances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub strength: u32,
    pub intelligence: u32,
    pub dexterity: u32,
}

impl Attributes {
    pub const fn new(strength: u32, intelligence: u32, dexterity: u32) -> Self {
        Self {
            strength,
            intelligence,
            dexterity,
        }
    }

    /// Raises every attribute by `amount`.
    pub fn raise_all(&mut self, amount: u32) {
        self.strength += amount;
        self.intelligence += amount;
        self.dexterity += amount;
    }
}
