//! Power effect dispatch.
//!
//! Every power is a [`PowerEffect`]; [`CastContext::resolve`] is the only
//! place effects are interpreted. Effects aimed at the enemy after a dodged
//! strike in the same cast are skipped, effects on the caster always apply.

use crate::character::player::Player;
use crate::character::stats::{EffectiveStats, StatKind};
use crate::combat::resolver::resolve_strike;
use crate::combat::status::{ApplyOutcome, StatusApplication, StatusKind};
use crate::combat::types::{Actor, Enemy};
use crate::core::constants::{
    MAX_POWER_TIER, TIER_COOLDOWN_REDUCTION_PERCENT, TIER_MAGNITUDE_BONUS_PERCENT,
};
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEffect {
    /// Strike at a percent of power
    Damage { multiplier_percent: u32 },
    /// Restore caster health
    Heal { amount: u32 },
    /// Status on the enemy
    ApplyStatus(StatusApplication),
    /// Percent stat buff on the caster
    SelfBuff {
        stat: StatKind,
        percent: u32,
        turns: u32,
    },
    /// Damage reduction on the caster
    Block { reduction_percent: u32, turns: u32 },
    /// Strike and heal a share of the damage dealt
    Drain {
        multiplier_percent: u32,
        heal_percent: u32,
    },
    /// Give resource back to the caster
    ResourceRefund { amount: u32 },
    /// Several effects in order
    Combo(&'static [PowerEffect]),
}

/// Magnitude percent at a tier: 100, 125, 150.
pub fn tier_magnitude_percent(tier: u8) -> u32 {
    100 + TIER_MAGNITUDE_BONUS_PERCENT * tier.min(MAX_POWER_TIER) as u32
}

/// Cooldown after tier reduction, in ticks.
pub fn tier_cooldown_ticks(base_ticks: u32, tier: u8) -> u32 {
    let reduction = TIER_COOLDOWN_REDUCTION_PERCENT * tier.min(MAX_POWER_TIER) as u32;
    (base_ticks as u64 * (100 - reduction.min(100)) as u64 / 100) as u32
}

/// `value * percent / 100`, computed wide and clamped to `u32`.
pub fn percent_of(value: u32, percent: u32) -> u32 {
    (value as u64 * percent as u64 / 100).min(u32::MAX as u64) as u32
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerOutcome {
    pub damage: u32,
    pub healed: u32,
    pub refunded: u32,
    pub crit: bool,
    pub dodged: bool,
    pub blocked: bool,
    pub statuses: Vec<(Actor, StatusKind)>,
}

pub struct CastContext<'a, R: RandomSource> {
    pub player: &'a mut Player,
    pub player_stats: EffectiveStats,
    pub enemy: &'a mut Enemy,
    pub enemy_stats: EffectiveStats,
    pub rng: &'a mut R,
    pub tier: u8,
    /// Display name of the power, used as the status source
    pub source: &'a str,
}

impl<R: RandomSource> CastContext<'_, R> {
    pub fn resolve(&mut self, effect: &PowerEffect) -> PowerOutcome {
        let mut outcome = PowerOutcome::default();
        self.apply(effect, &mut outcome);
        outcome
    }

    fn apply(&mut self, effect: &PowerEffect, outcome: &mut PowerOutcome) {
        let magnitude = tier_magnitude_percent(self.tier);
        match *effect {
            PowerEffect::Damage { multiplier_percent } => {
                self.strike(percent_of(multiplier_percent, magnitude), outcome);
            }
            PowerEffect::Heal { amount } => {
                outcome.healed += self.player.heal(percent_of(amount, magnitude));
            }
            PowerEffect::ApplyStatus(application) => {
                if outcome.dodged || !self.enemy.is_alive() {
                    return;
                }
                let application = application.scaled(magnitude);
                if self.enemy.statuses.apply(application, self.source) != ApplyOutcome::Ignored {
                    outcome.statuses.push((Actor::Enemy, application.kind));
                }
            }
            PowerEffect::SelfBuff {
                stat,
                percent,
                turns,
            } => {
                let application =
                    StatusApplication::new(StatusKind::Buff(stat), percent_of(percent, magnitude), turns);
                self.apply_to_self(application, outcome);
            }
            PowerEffect::Block {
                reduction_percent,
                turns,
            } => {
                let application = StatusApplication::new(
                    StatusKind::Shield,
                    percent_of(reduction_percent, magnitude),
                    turns,
                );
                self.apply_to_self(application, outcome);
            }
            PowerEffect::Drain {
                multiplier_percent,
                heal_percent,
            } => {
                let dealt = self.strike(percent_of(multiplier_percent, magnitude), outcome);
                outcome.healed += self.player.heal(percent_of(dealt, heal_percent));
            }
            PowerEffect::ResourceRefund { amount } => {
                if let Some(resource) = self.player.resource.as_mut() {
                    outcome.refunded += resource.gain(percent_of(amount, magnitude));
                }
            }
            PowerEffect::Combo(effects) => {
                for effect in effects {
                    self.apply(effect, outcome);
                }
            }
        }
    }

    fn apply_to_self(&mut self, application: StatusApplication, outcome: &mut PowerOutcome) {
        if self.player.statuses.apply(application, self.source) != ApplyOutcome::Ignored {
            outcome.statuses.push((Actor::Player, application.kind));
        }
    }

    /// Returns the damage dealt.
    fn strike(&mut self, multiplier_percent: u32, outcome: &mut PowerOutcome) -> u32 {
        if !self.enemy.is_alive() {
            return 0;
        }
        let strike = resolve_strike(
            &self.player_stats,
            &self.enemy_stats,
            self.enemy.statuses.shield_percent(),
            multiplier_percent,
            &mut *self.rng,
        );
        if strike.dodged {
            outcome.dodged = true;
            return 0;
        }
        outcome.crit |= strike.crit;
        outcome.blocked |= strike.blocked;
        let dealt = self.enemy.take_damage(strike.damage);
        outcome.damage += dealt;
        dealt
    }
}
