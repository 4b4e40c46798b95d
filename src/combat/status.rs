//! Timed status effects attached to one actor.
//!
//! Effects tick at the owner's own turn boundary (see `combat::scheduler`),
//! never on the global tick. Same-kind applications follow a fixed policy:
//!
//! | kind                          | on re-application                              |
//! |-------------------------------|------------------------------------------------|
//! | poison, slow, regen, shield   | duration and magnitude take the max            |
//! | bleed                         | magnitude adds (capped), duration takes max    |
//! | stun                          | duration takes the max                         |
//! | buff / debuff                 | keyed by (stat, source), refresh in place      |

use serde::{Deserialize, Serialize};

use crate::character::stats::{PercentBlock, StatKind};
use crate::core::constants::{MAX_BLEED_MAGNITUDE, MAX_SHIELD_PERCENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Damage per turn
    Poison,
    /// Skips turns
    Stun,
    /// Percent speed reduction
    Slow,
    /// Stacking damage per turn
    Bleed,
    /// Healing per turn
    Regeneration,
    /// Percent damage reduction on incoming hits
    Shield,
    /// Percent stat increase
    Buff(StatKind),
    /// Percent stat decrease
    Debuff(StatKind),
}

impl StatusKind {
    pub fn label(&self) -> String {
        match self {
            StatusKind::Poison => "Poison".to_string(),
            StatusKind::Stun => "Stun".to_string(),
            StatusKind::Slow => "Slow".to_string(),
            StatusKind::Bleed => "Bleed".to_string(),
            StatusKind::Regeneration => "Regeneration".to_string(),
            StatusKind::Shield => "Shield".to_string(),
            StatusKind::Buff(stat) => format!("{} Up", stat.name()),
            StatusKind::Debuff(stat) => format!("{} Down", stat.name()),
        }
    }

    pub fn is_harmful(&self) -> bool {
        matches!(
            self,
            StatusKind::Poison
                | StatusKind::Stun
                | StatusKind::Slow
                | StatusKind::Bleed
                | StatusKind::Debuff(_)
        )
    }

    fn keyed_by_source(&self) -> bool {
        matches!(self, StatusKind::Buff(_) | StatusKind::Debuff(_))
    }
}

/// A status to apply, as carried by power, ability and proc definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub kind: StatusKind,
    pub magnitude: u32,
    pub turns: u32,
}

impl StatusApplication {
    pub const fn new(kind: StatusKind, magnitude: u32, turns: u32) -> Self {
        Self {
            kind,
            magnitude,
            turns,
        }
    }

    /// Same application with magnitude scaled by a percent.
    pub fn scaled(&self, percent: u32) -> Self {
        Self {
            magnitude: self.magnitude * percent / 100,
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: u32,
    pub remaining_turns: u32,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Added,
    Refreshed,
    Stacked,
    /// Zero-duration applications are dropped
    Ignored,
}

/// Result of one turn boundary for the owning actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnTick {
    pub damage: u32,
    pub healing: u32,
    pub expired: Vec<StatusKind>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusTracker {
    effects: Vec<StatusEffect>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn apply(&mut self, application: StatusApplication, source: &str) -> ApplyOutcome {
        if application.turns == 0 {
            return ApplyOutcome::Ignored;
        }

        let existing = self.effects.iter_mut().find(|e| {
            e.kind == application.kind
                && (!application.kind.keyed_by_source() || e.source == source)
        });

        let Some(effect) = existing else {
            let magnitude = match application.kind {
                StatusKind::Bleed => application.magnitude.min(MAX_BLEED_MAGNITUDE),
                _ => application.magnitude,
            };
            self.effects.push(StatusEffect {
                kind: application.kind,
                magnitude,
                remaining_turns: application.turns,
                source: source.to_string(),
            });
            return ApplyOutcome::Added;
        };

        effect.remaining_turns = effect.remaining_turns.max(application.turns);
        match application.kind {
            StatusKind::Bleed => {
                effect.magnitude = effect
                    .magnitude
                    .saturating_add(application.magnitude)
                    .min(MAX_BLEED_MAGNITUDE);
                ApplyOutcome::Stacked
            }
            StatusKind::Buff(_) | StatusKind::Debuff(_) => {
                effect.magnitude = application.magnitude;
                ApplyOutcome::Refreshed
            }
            _ => {
                effect.magnitude = effect.magnitude.max(application.magnitude);
                ApplyOutcome::Refreshed
            }
        }
    }

    /// Runs one turn boundary: periodic effects fire, then every counter
    /// drops by exactly one and finished effects are removed.
    pub fn tick_turn(&mut self) -> TurnTick {
        let mut tick = TurnTick::default();

        for effect in &mut self.effects {
            match effect.kind {
                StatusKind::Poison | StatusKind::Bleed => {
                    tick.damage = tick.damage.saturating_add(effect.magnitude)
                }
                StatusKind::Regeneration => {
                    tick.healing = tick.healing.saturating_add(effect.magnitude)
                }
                _ => {}
            }
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        self.effects.retain(|e| {
            if e.remaining_turns == 0 {
                tick.expired.push(e.kind);
                false
            } else {
                true
            }
        });

        tick
    }

    pub fn is_stunned(&self) -> bool {
        self.get(StatusKind::Stun).is_some()
    }

    /// Percent stat modifiers from buffs, debuffs and slow.
    pub fn percent_modifiers(&self) -> PercentBlock {
        let mut block = PercentBlock::default();
        for effect in &self.effects {
            let magnitude = effect.magnitude as i32;
            match effect.kind {
                StatusKind::Buff(stat) => block.adjust(stat, magnitude),
                StatusKind::Debuff(stat) => block.adjust(stat, -magnitude),
                StatusKind::Slow => block.adjust(StatKind::Speed, -magnitude),
                _ => {}
            }
        }
        block
    }

    pub fn shield_percent(&self) -> u32 {
        self.get(StatusKind::Shield)
            .map_or(0, |e| e.magnitude.min(MAX_SHIELD_PERCENT))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(magnitude: u32, turns: u32) -> StatusApplication {
        StatusApplication::new(StatusKind::Poison, magnitude, turns)
    }

    #[test]
    fn test_poison_refreshes_without_stacking() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.apply(poison(4, 3), "Spider"), ApplyOutcome::Added);
        assert_eq!(tracker.apply(poison(2, 5), "Spider"), ApplyOutcome::Refreshed);

        let effect = tracker.get(StatusKind::Poison).unwrap();
        assert_eq!(effect.magnitude, 4);
        assert_eq!(effect.remaining_turns, 5);
        assert_eq!(tracker.effects().len(), 1);
    }

    #[test]
    fn test_bleed_stacks_to_cap() {
        let mut tracker = StatusTracker::new();
        let bleed = StatusApplication::new(StatusKind::Bleed, 15, 3);
        tracker.apply(bleed, "a");
        assert_eq!(tracker.apply(bleed, "b"), ApplyOutcome::Stacked);
        tracker.apply(bleed, "c");
        assert_eq!(
            tracker.get(StatusKind::Bleed).unwrap().magnitude,
            MAX_BLEED_MAGNITUDE
        );
    }

    #[test]
    fn test_buffs_keyed_by_source() {
        let mut tracker = StatusTracker::new();
        let buff = StatusApplication::new(StatusKind::Buff(StatKind::Power), 20, 2);
        tracker.apply(buff, "Blood Rage");
        tracker.apply(buff, "Battle Trance");
        assert_eq!(tracker.effects().len(), 2);
        assert_eq!(tracker.percent_modifiers().power, 40);

        let weaker = StatusApplication::new(StatusKind::Buff(StatKind::Power), 10, 4);
        assert_eq!(tracker.apply(weaker, "Blood Rage"), ApplyOutcome::Refreshed);
        assert_eq!(tracker.percent_modifiers().power, 30);
    }

    #[test]
    fn test_tick_turn_fires_then_decrements_then_expires() {
        let mut tracker = StatusTracker::new();
        tracker.apply(poison(3, 2), "Spider");
        tracker.apply(StatusApplication::new(StatusKind::Regeneration, 5, 1), "Potion");

        let first = tracker.tick_turn();
        assert_eq!(first.damage, 3);
        assert_eq!(first.healing, 5);
        assert_eq!(first.expired, vec![StatusKind::Regeneration]);
        assert_eq!(tracker.get(StatusKind::Poison).unwrap().remaining_turns, 1);

        let second = tracker.tick_turn();
        assert_eq!(second.damage, 3);
        assert_eq!(second.expired, vec![StatusKind::Poison]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_stun_and_slow() {
        let mut tracker = StatusTracker::new();
        tracker.apply(StatusApplication::new(StatusKind::Stun, 0, 1), "Golem");
        tracker.apply(StatusApplication::new(StatusKind::Slow, 30, 2), "Frost Nova");
        assert!(tracker.is_stunned());
        assert_eq!(tracker.percent_modifiers().speed, -30);

        tracker.tick_turn();
        assert!(!tracker.is_stunned());
    }

    #[test]
    fn test_shield_capped() {
        let mut tracker = StatusTracker::new();
        tracker.apply(StatusApplication::new(StatusKind::Shield, 150, 2), "Wall");
        assert_eq!(tracker.shield_percent(), MAX_SHIELD_PERCENT);
    }

    #[test]
    fn test_zero_turn_application_ignored() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.apply(poison(5, 0), "x"), ApplyOutcome::Ignored);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(StatusKind::Buff(StatKind::Armor).label(), "Armor Up");
        assert_eq!(StatusKind::Debuff(StatKind::Speed).label(), "Speed Down");
        assert!(StatusKind::Bleed.is_harmful());
        assert!(!StatusKind::Shield.is_harmful());
    }
}
