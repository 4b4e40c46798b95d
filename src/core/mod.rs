//! Encounter state, the engine and its action entry points.

pub mod config;
pub mod constants;
pub mod encounter;
pub mod engine;
pub mod error;
pub mod phase;
pub mod progression;
pub mod rng;
pub mod snapshot;
pub mod tick;

pub use config::RunConfig;
pub use engine::CombatEngine;
pub use error::{ActionError, ActionResult, ConfigError};
pub use phase::BattlePhase;
pub use tick::{TickEvent, TickResult};
