//! Per-actor attack timers.
//!
//! Each actor owns an [`AttackTimer`]. Every combat tick it gains
//! `BASE_PROGRESS_PER_TICK * speed / REFERENCE_SPEED * combat_speed` and
//! fires once it reaches `ATTACK_THRESHOLD`, resetting to zero (surplus is
//! discarded). A stunned actor's attack progress is frozen; a separate stun
//! counter keeps advancing so that stun turns still elapse at the actor's
//! own cadence.

use serde::{Deserialize, Serialize};

use crate::core::constants::{ATTACK_THRESHOLD, BASE_PROGRESS_PER_TICK, REFERENCE_SPEED};
use crate::core::error::ActionError;

/// Global time multiplier selected by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatSpeed {
    #[default]
    X1,
    X2,
    X3,
}

impl CombatSpeed {
    pub fn multiplier(&self) -> u32 {
        match self {
            CombatSpeed::X1 => 1,
            CombatSpeed::X2 => 2,
            CombatSpeed::X3 => 3,
        }
    }
}

impl TryFrom<u8> for CombatSpeed {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CombatSpeed::X1),
            2 => Ok(CombatSpeed::X2),
            3 => Ok(CombatSpeed::X3),
            other => Err(ActionError::InvalidSpeed(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStep {
    Waiting,
    /// Threshold reached, the actor acts now
    Attack,
    /// Threshold reached while stunned, the turn is lost
    SkippedTurn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackTimer {
    progress: f64,
    stun_progress: f64,
}

pub fn progress_per_tick(speed: u32, combat_speed: CombatSpeed) -> f64 {
    BASE_PROGRESS_PER_TICK * (speed as f64 / REFERENCE_SPEED) * combat_speed.multiplier() as f64
}

impl AttackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, speed: u32, combat_speed: CombatSpeed, stunned: bool) -> TimerStep {
        let increment = progress_per_tick(speed, combat_speed);

        if stunned {
            self.stun_progress += increment;
            if self.stun_progress >= ATTACK_THRESHOLD {
                self.stun_progress = 0.0;
                return TimerStep::SkippedTurn;
            }
            return TimerStep::Waiting;
        }

        self.stun_progress = 0.0;
        self.progress += increment;
        if self.progress >= ATTACK_THRESHOLD {
            self.progress = 0.0;
            return TimerStep::Attack;
        }
        TimerStep::Waiting
    }

    /// Normalized progress for UI bars.
    pub fn fraction(&self) -> f64 {
        (self.progress / ATTACK_THRESHOLD).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_until_attack(timer: &mut AttackTimer, speed: u32, combat_speed: CombatSpeed) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if timer.advance(speed, combat_speed, false) == TimerStep::Attack {
                return ticks;
            }
            assert!(ticks < 10_000, "timer never fired");
        }
    }

    #[test]
    fn test_reference_speed_fires_after_twenty_ticks() {
        let mut timer = AttackTimer::new();
        assert_eq!(ticks_until_attack(&mut timer, 10, CombatSpeed::X1), 20);
        assert_eq!(timer.fraction(), 0.0);
    }

    #[test]
    fn test_combat_speed_scales_cadence() {
        let mut timer = AttackTimer::new();
        assert_eq!(ticks_until_attack(&mut timer, 10, CombatSpeed::X2), 10);
        timer.reset();
        assert_eq!(ticks_until_attack(&mut timer, 10, CombatSpeed::X3), 7);
    }

    #[test]
    fn test_surplus_progress_is_discarded() {
        // Speed 30 overshoots the threshold on its seventh tick
        let mut timer = AttackTimer::new();
        assert_eq!(ticks_until_attack(&mut timer, 30, CombatSpeed::X1), 7);
        assert_eq!(timer.fraction(), 0.0);
        assert_eq!(ticks_until_attack(&mut timer, 30, CombatSpeed::X1), 7);
    }

    #[test]
    fn test_faster_actor_attacks_sooner() {
        let mut slow = AttackTimer::new();
        let mut fast = AttackTimer::new();
        assert!(
            ticks_until_attack(&mut fast, 20, CombatSpeed::X1)
                < ticks_until_attack(&mut slow, 8, CombatSpeed::X1)
        );
    }

    #[test]
    fn test_stun_freezes_progress_and_skips_turn() {
        let mut timer = AttackTimer::new();
        for _ in 0..10 {
            timer.advance(10, CombatSpeed::X1, false);
        }
        let frozen = timer.fraction();
        assert!((frozen - 0.5).abs() < 1e-9);

        let mut skipped = 0;
        for _ in 0..20 {
            if timer.advance(10, CombatSpeed::X1, true) == TimerStep::SkippedTurn {
                skipped += 1;
            }
        }
        assert_eq!(skipped, 1);
        assert_eq!(timer.fraction(), frozen);
    }

    #[test]
    fn test_fraction_stays_normalized() {
        let mut timer = AttackTimer::new();
        for _ in 0..200 {
            timer.advance(37, CombatSpeed::X3, false);
            let f = timer.fraction();
            assert!((0.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn test_combat_speed_try_from() {
        assert_eq!(CombatSpeed::try_from(2), Ok(CombatSpeed::X2));
        assert_eq!(CombatSpeed::try_from(4), Err(ActionError::InvalidSpeed(4)));
        assert_eq!(CombatSpeed::X3.multiplier(), 3);
    }
}
