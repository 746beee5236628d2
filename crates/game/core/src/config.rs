/// Kernel tuning constants and balance parameters.
///
/// Every percentage is an integer where `100` means ×1.0. Probabilities are
/// percent chances compared against a d100 roll (`roll <= chance` succeeds).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    // ===== damage =====
    /// Symmetric variance added to base damage (`-v..=+v`).
    pub damage_variance: u32,
    /// Defense is divided by this before being subtracted from attack.
    pub defense_divisor: u32,
    /// Multiplier applied when the damage type matches the target's weakness.
    pub weakness_percent: u32,
    /// Multiplier applied when the damage type matches the target's resistance.
    pub resistance_percent: u32,
    /// A hit is critical when final damage exceeds this share of effective attack.
    pub critical_threshold_percent: u32,

    // ===== combos =====
    pub combo_length: u32,
    pub combo_bonus_percent: u32,
    pub combo_duration: u32,

    // ===== enemy policy =====
    /// Enemies reach for self-healing abilities below this health share.
    pub enemy_mend_threshold_percent: u32,

    // ===== escape / hazards =====
    pub flee_base_percent: u32,
    pub flee_per_dexterity: u32,
    pub disarm_base_percent: u32,
    pub disarm_per_point: u32,
    pub avoid_base_percent: u32,
    pub avoid_per_dexterity: u32,
    pub trigger_salvage_percent: u32,
    /// Width of the "partial" band directly above a success roll.
    pub partial_band_percent: u32,

    // ===== companions =====
    pub companion_low_health_percent: u32,
    pub companion_high_bond: u32,
    pub companion_betrayal_bond: u32,

    // ===== progression =====
    pub level_health_gain: u32,
    pub level_attack_gain: u32,
    pub level_defense_gain: u32,
    pub level_attribute_gain: u32,
    pub level_threshold_growth_percent: u32,

    // ===== NPCs =====
    pub help_gold_min: u32,
    pub help_gold_max: u32,

    // ===== dungeon =====
    pub rooms_per_floor: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Capacity of the combo hit history.
    pub const MAX_COMBO_HISTORY: usize = 8;
    /// Upper bound for any dodge chance.
    pub const MAX_DODGE_PERCENT: u32 = 50;
    /// Lower clamp for computed success chances.
    pub const MIN_CHANCE_PERCENT: u32 = 5;
    /// Upper clamp for computed success chances.
    pub const MAX_CHANCE_PERCENT: u32 = 95;
    /// Flee chance never exceeds this.
    pub const MAX_FLEE_PERCENT: u32 = 90;
    /// Journal entries kept in state.
    pub const JOURNAL_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self {
            damage_variance: 2,
            defense_divisor: 2,
            weakness_percent: 150,
            resistance_percent: 50,
            critical_threshold_percent: 120,

            combo_length: 3,
            combo_bonus_percent: 25,
            combo_duration: 3,

            enemy_mend_threshold_percent: 50,

            flee_base_percent: 40,
            flee_per_dexterity: 2,
            disarm_base_percent: 50,
            disarm_per_point: 5,
            avoid_base_percent: 35,
            avoid_per_dexterity: 2,
            trigger_salvage_percent: 25,
            partial_band_percent: 15,

            companion_low_health_percent: 30,
            companion_high_bond: 70,
            companion_betrayal_bond: 20,

            level_health_gain: 10,
            level_attack_gain: 2,
            level_defense_gain: 1,
            level_attribute_gain: 1,
            level_threshold_growth_percent: 150,

            help_gold_min: 10,
            help_gold_max: 30,

            rooms_per_floor: 6,
        }
    }

    /// Combo length clamped to the history capacity (never below 2).
    pub fn effective_combo_length(&self) -> usize {
        (self.combo_length as usize).clamp(2, Self::MAX_COMBO_HISTORY)
    }

    /// Clamps a computed chance into the configured success window.
    pub fn clamp_chance(chance: i64) -> u32 {
        chance.clamp(
            Self::MIN_CHANCE_PERCENT as i64,
            Self::MAX_CHANCE_PERCENT as i64,
        ) as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
