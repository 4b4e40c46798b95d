//! Combat system types and logic.

pub mod cooldown;
pub mod enemy_ai;
pub mod log;
pub mod powers;
pub mod resolver;
pub mod scheduler;
pub mod status;
pub mod types;

pub use types::{Actor, Enemy};
