// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const TICKS_PER_SECOND: u32 = (1000 / TICK_INTERVAL_MS) as u32;
pub const ENTERING_DURATION_TICKS: u32 = 5;

// Attack scheduler
pub const ATTACK_THRESHOLD: f64 = 100.0;
pub const BASE_PROGRESS_PER_TICK: f64 = 5.0;
pub const REFERENCE_SPEED: f64 = 10.0;
pub const MIN_EFFECTIVE_SPEED: u32 = 1;

// Derived stat formulas
pub const BASE_CRIT_CHANCE_PERCENT: u32 = 5;
pub const FORTUNE_PER_CRIT_PERCENT: u32 = 2;
pub const MAX_CRIT_CHANCE_PERCENT: u32 = 75;
pub const FORTUNE_PER_DODGE_PERCENT: u32 = 3;
pub const MAX_DODGE_CHANCE_PERCENT: u32 = 50;
pub const BASE_CRIT_MULTIPLIER_PERCENT: u32 = 150;
pub const MAX_CRIT_MULTIPLIER_PERCENT: u32 = 300;
pub const MIN_LANDED_DAMAGE: u32 = 1;
pub const MAX_SHIELD_PERCENT: u32 = 90;

// Path resources
pub const RESOURCE_CAP: u32 = 100;
pub const FURY_PER_HIT_DEALT: u32 = 10;
pub const FURY_PER_HIT_TAKEN: u32 = 5;
pub const ARCANE_CHARGES_PER_TICK: u32 = 1;
pub const MOMENTUM_PER_HIT_DEALT: u32 = 8;
pub const MOMENTUM_PER_CRIT: u32 = 7;
pub const MOMENTUM_PER_DODGE: u32 = 5;
pub const ZEAL_PER_HIT_DEALT: u32 = 7;
pub const ZEAL_PER_HIT_TAKEN: u32 = 3;

// Powers and stances
pub const MAX_POWER_TIER: u8 = 2;
pub const TIER_MAGNITUDE_BONUS_PERCENT: u32 = 25;
pub const TIER_COOLDOWN_REDUCTION_PERCENT: u32 = 15;
pub const POWER_CHOICE_OPTIONS: usize = 3;
pub const STANCE_ENHANCEMENT_OPTIONS: usize = 2;
pub const STANCE_SWITCH_COOLDOWN_SECONDS: u32 = 3;
pub const STANCE_SWITCH_COOLDOWN_ID: &str = "stance_switch";

// Status effects
pub const MAX_BLEED_MAGNITUDE: u32 = 40;

// XP and leveling
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const LEVEL_UP_HEALTH_GAIN: u32 = 10;
pub const LEVEL_UP_POWER_GAIN: u32 = 2;
pub const LEVEL_UP_ARMOR_GAIN: u32 = 1;

// Floors and rooms
pub const DEFAULT_ROOMS_PER_FLOOR: u32 = 5;
pub const FLOOR_SCALING_PERCENT: u32 = 25;

// Combat log
pub const COMBAT_LOG_CAPACITY: usize = 20;
