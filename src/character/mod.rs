//! The player character: class, stats, equipment and path resource.

pub mod equipment;
pub mod player;
pub mod resource;
pub mod stats;

pub use player::{CharacterClass, Player};
