//! Damage-type combos.
//!
//! Consecutive hits of the same damage type build a combo; reaching the
//! configured length triggers a timed damage bonus. A hit of a different type
//! resets the chain.

use arrayvec::ArrayVec;

use crate::combat::DamageType;
use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveCombo {
    pub damage_type: DamageType,
    pub bonus_percent: u32,
    pub turns_remaining: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboResult {
    Building { count: u32 },
    Triggered { damage_type: DamageType, bonus_percent: u32 },
    /// A different type broke the chain; it starts a new one.
    Reset,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboTracker {
    history: ArrayVec<DamageType, { GameConfig::MAX_COMBO_HISTORY }>,
    active: Option<ActiveCombo>,
}

impl ComboTracker {
    /// Hits recorded in the current chain, oldest first.
    pub fn history(&self) -> &[DamageType] {
        &self.history
    }

    pub fn active(&self) -> Option<&ActiveCombo> {
        self.active.as_ref()
    }

    /// Extra damage percent granted by the active combo.
    pub fn bonus_percent(&self) -> u32 {
        self.active.map_or(0, |a| a.bonus_percent)
    }

    /// Records a hit of `damage_type`.
    pub fn record(&mut self, damage_type: DamageType, config: &GameConfig) -> ComboResult {
        if self.history.last().is_some_and(|last| *last != damage_type) {
            self.history.clear();
            self.history.push(damage_type);
            return ComboResult::Reset;
        }

        if self.history.try_push(damage_type).is_err() {
            self.history.clear();
            self.history.push(damage_type);
        }

        if self.history.len() >= config.effective_combo_length() {
            self.history.clear();
            self.active = Some(ActiveCombo {
                damage_type,
                bonus_percent: config.combo_bonus_percent,
                turns_remaining: config.combo_duration,
            });
            return ComboResult::Triggered {
                damage_type,
                bonus_percent: config.combo_bonus_percent,
            };
        }

        ComboResult::Building {
            count: self.history.len() as u32,
        }
    }

    /// Counts the active bonus down by one round. Returns true when it just expired.
    pub fn tick(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.turns_remaining = active.turns_remaining.saturating_sub(1);
        if active.turns_remaining == 0 {
            self.active = None;
            return true;
        }
        false
    }
}
