//! Battle phase state machine.
//!
//! ```text
//! entering -> combat -> enemy_dying --ack--> transitioning -> entering
//!                    |                                    \-> floor_complete --continue--> entering
//!                    \-> player_dying --ack--> defeat --retry--> entering
//! ```
//!
//! Dying phases never advance on their own: they wait for the renderer to
//! acknowledge the death animation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::ENTERING_DURATION_TICKS;
use crate::core::error::{ActionError, ActionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Entering,
    Combat,
    EnemyDying,
    Transitioning,
    PlayerDying,
    Defeat,
    FloorComplete,
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BattlePhase::Entering => "entering",
            BattlePhase::Combat => "combat",
            BattlePhase::EnemyDying => "enemy_dying",
            BattlePhase::Transitioning => "transitioning",
            BattlePhase::PlayerDying => "player_dying",
            BattlePhase::Defeat => "defeat",
            BattlePhase::FloorComplete => "floor_complete",
        };
        write!(f, "{}", label)
    }
}

impl BattlePhase {
    pub fn can_transition_to(&self, next: BattlePhase) -> bool {
        use BattlePhase::*;
        matches!(
            (self, next),
            (Entering, Combat)
                | (Combat, EnemyDying)
                | (Combat, PlayerDying)
                | (EnemyDying, Transitioning)
                | (Transitioning, Entering)
                | (Transitioning, FloorComplete)
                | (PlayerDying, Defeat)
                | (Defeat, Entering)
                | (FloorComplete, Entering)
        )
    }

    /// Phases in which a death animation acknowledgment is outstanding.
    pub fn awaits_ack(&self) -> bool {
        matches!(self, BattlePhase::EnemyDying | BattlePhase::PlayerDying)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseState {
    phase: BattlePhase,
    entering_ticks_left: u32,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseState {
    /// Starts in `Entering` with a full countdown.
    pub fn new() -> Self {
        Self {
            phase: BattlePhase::Entering,
            entering_ticks_left: ENTERING_DURATION_TICKS,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is(&self, phase: BattlePhase) -> bool {
        self.phase == phase
    }

    pub fn entering_ticks_left(&self) -> u32 {
        self.entering_ticks_left
    }

    /// Moves to `next` if the edge exists. Returns the previous phase.
    pub fn transition(&mut self, next: BattlePhase) -> ActionResult<BattlePhase> {
        if !self.phase.can_transition_to(next) {
            return Err(ActionError::PhaseMismatch {
                expected: next,
                actual: self.phase,
            });
        }
        let previous = self.phase;
        self.phase = next;
        if next == BattlePhase::Entering {
            self.entering_ticks_left = ENTERING_DURATION_TICKS;
        }
        Ok(previous)
    }

    /// Counts the entering delay down. Returns true once it has elapsed.
    pub fn tick_entering(&mut self, elapsed: u32) -> bool {
        self.entering_ticks_left = self.entering_ticks_left.saturating_sub(elapsed);
        self.entering_ticks_left == 0
    }

    /// Requires the current phase to be `expected`.
    pub fn require(&self, expected: BattlePhase) -> ActionResult<()> {
        if self.phase != expected {
            return Err(ActionError::PhaseMismatch {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_cycle() {
        let mut state = PhaseState::new();
        assert_eq!(state.phase(), BattlePhase::Entering);
        for phase in [
            BattlePhase::Combat,
            BattlePhase::EnemyDying,
            BattlePhase::Transitioning,
            BattlePhase::Entering,
        ] {
            state.transition(phase).unwrap();
        }
        assert_eq!(state.entering_ticks_left(), ENTERING_DURATION_TICKS);
    }

    #[test]
    fn test_defeat_path() {
        let mut state = PhaseState::new();
        state.transition(BattlePhase::Combat).unwrap();
        state.transition(BattlePhase::PlayerDying).unwrap();
        assert!(state.phase().awaits_ack());
        state.transition(BattlePhase::Defeat).unwrap();
        assert_eq!(state.transition(BattlePhase::Entering), Ok(BattlePhase::Defeat));
    }

    #[test]
    fn test_illegal_edges_rejected() {
        let mut state = PhaseState::new();
        let err = state.transition(BattlePhase::Transitioning).unwrap_err();
        assert_eq!(
            err,
            ActionError::PhaseMismatch {
                expected: BattlePhase::Transitioning,
                actual: BattlePhase::Entering,
            }
        );
        assert_eq!(state.phase(), BattlePhase::Entering);

        state.transition(BattlePhase::Combat).unwrap();
        assert!(state.transition(BattlePhase::Defeat).is_err());
        assert!(state.transition(BattlePhase::FloorComplete).is_err());
    }

    #[test]
    fn test_entering_countdown() {
        let mut state = PhaseState::new();
        assert!(!state.tick_entering(2));
        assert!(!state.tick_entering(2));
        assert!(state.tick_entering(2));
        assert_eq!(state.entering_ticks_left(), 0);
    }

    #[test]
    fn test_display_is_snake_case() {
        assert_eq!(BattlePhase::FloorComplete.to_string(), "floor_complete");
        assert_eq!(BattlePhase::EnemyDying.to_string(), "enemy_dying");
    }
}
