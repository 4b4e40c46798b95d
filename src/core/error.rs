//! Error types surfaced by the engine.
//!
//! [`ActionError`] covers expected rejections at the action boundary: the
//! engine state is left untouched whenever one is returned. [`ConfigError`]
//! covers broken content or run configuration and is raised before any
//! encounter starts.

use thiserror::Error;

use crate::core::phase::BattlePhase;
use crate::core::progression::ChoiceKind;

pub type ActionResult<T> = std::result::Result<T, ActionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("power {0} has not been learned")]
    PowerNotLearned(String),

    #[error("power {power} is on cooldown ({remaining_seconds}s left)")]
    OnCooldown {
        power: String,
        remaining_seconds: u32,
    },

    #[error("not enough resource: need {needed}, have {available}")]
    InsufficientResource { needed: u32, available: u32 },

    #[error("action requires combat, current phase is {phase}")]
    NotInCombat { phase: BattlePhase },

    #[error("combat is paused")]
    Paused,

    #[error("a {0} choice is pending")]
    ChoicePending(ChoiceKind),

    #[error("player is stunned")]
    Stunned,

    #[error("no choice is pending")]
    NoPendingChoice,

    #[error("expected a {expected} choice, pending choice is {pending}")]
    WrongChoiceKind {
        expected: ChoiceKind,
        pending: ChoiceKind,
    },

    #[error("option {0} is not offered by the pending choice")]
    InvalidOption(String),

    #[error("combat speed must be 1, 2 or 3, got {0}")]
    InvalidSpeed(u8),

    #[error("action requires phase {expected}, current phase is {actual}")]
    PhaseMismatch {
        expected: BattlePhase,
        actual: BattlePhase,
    },

    #[error("player has no stance to switch")]
    NoStance,

    #[error("stance switch is on cooldown ({remaining_seconds}s left)")]
    StanceOnCooldown { remaining_seconds: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{owner} references unknown power {id}")]
    UnknownPower { owner: String, id: String },

    #[error("{owner} references unknown enemy ability {id}")]
    UnknownAbility { owner: String, id: String },

    #[error("{owner} references unknown stance enhancement {id}")]
    UnknownEnhancement { owner: String, id: String },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("no enemy template can spawn on floor {0}")]
    EmptyEnemyPool(u32),

    #[error("rooms per floor must be at least 1")]
    InvalidRoomsPerFloor,

    #[error("malformed run configuration")]
    Json(#[from] serde_json::Error),
}
