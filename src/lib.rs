//! Roguewave - real-time combat and progression engine
//!
//! The engine advances battles tick by tick, resolves attacks, powers and
//! status effects through a single seedable random source, and drives the
//! level-up choice tree. Rendering, the shop and persistence are external
//! collaborators that read snapshots and call the action entry points on
//! [`core::engine::CombatEngine`].

pub mod catalog;
pub mod character;
pub mod combat;
pub mod core;

pub use crate::core::engine::CombatEngine;
pub use crate::core::config::RunConfig;
