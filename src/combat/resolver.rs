//! Single-strike damage resolution.
//!
//! Order: dodge roll, raw damage, crit roll, shield reduction, flat armor.
//! A dodged strike deals exactly 0; a landed strike deals at least
//! `MIN_LANDED_DAMAGE`. The resolver never touches health, callers apply
//! the outcome.

use crate::character::stats::EffectiveStats;
use crate::core::constants::{MAX_SHIELD_PERCENT, MIN_LANDED_DAMAGE};
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrikeOutcome {
    pub damage: u32,
    pub dodged: bool,
    pub crit: bool,
    /// A shield or block reduced the hit
    pub blocked: bool,
}

impl StrikeOutcome {
    pub fn landed(&self) -> bool {
        !self.dodged
    }
}

/// Resolves one strike at `multiplier_percent` of the attacker's power.
pub fn resolve_strike<R: RandomSource + ?Sized>(
    attacker: &EffectiveStats,
    defender: &EffectiveStats,
    defender_shield_percent: u32,
    multiplier_percent: u32,
    rng: &mut R,
) -> StrikeOutcome {
    if rng.chance(defender.dodge_chance_percent) {
        return StrikeOutcome {
            dodged: true,
            ..Default::default()
        };
    }

    let mut raw = attacker.power as u64 * multiplier_percent as u64 / 100;

    let crit = rng.chance(attacker.crit_chance_percent);
    if crit {
        raw = raw * attacker.crit_multiplier_percent as u64 / 100;
    }

    let shield = defender_shield_percent.min(MAX_SHIELD_PERCENT) as u64;
    let blocked = shield > 0;
    if blocked {
        raw = raw * (100 - shield) / 100;
    }

    let damage = (raw.min(u32::MAX as u64) as u32)
        .saturating_sub(defender.armor)
        .max(MIN_LANDED_DAMAGE);

    StrikeOutcome {
        damage,
        dodged: false,
        crit,
        blocked,
    }
}
