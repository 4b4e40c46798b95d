//! The single mutable state owned by the engine.
//!
//! Collaborators read it through [`crate::core::engine::CombatEngine::state`]
//! or a snapshot; every write goes through an engine action.

use crate::character::player::Player;
use crate::combat::cooldown::CooldownTracker;
use crate::combat::log::CombatLog;
use crate::combat::scheduler::CombatSpeed;
use crate::combat::types::Enemy;
use crate::core::config::RunConfig;
use crate::core::phase::{BattlePhase, PhaseState};
use crate::core::progression::ProgressionState;

#[derive(Debug, Clone)]
pub struct EncounterState {
    pub player: Player,
    /// Removed once the death animation of the enemy is acknowledged
    pub enemy: Option<Enemy>,
    pub phase: PhaseState,
    pub floor: u32,
    /// 1-based room within the floor
    pub room: u32,
    pub rooms_per_floor: u32,
    pub paused: bool,
    pub combat_speed: CombatSpeed,
    /// Player power and stance cooldowns, in ticks
    pub cooldowns: CooldownTracker,
    pub progression: ProgressionState,
    pub log: CombatLog,
    pub tick_count: u64,
    pub enemies_defeated: u32,
    pub invincible: bool,
    pub xp_multiplier: f64,
}

impl EncounterState {
    /// Run-start state. The first enemy is spawned by the engine.
    pub fn new(config: &RunConfig) -> Self {
        let mut player = Player::new(config.player_name.clone(), config.class);
        player.apply_overrides(&config.overrides);
        player.gold = config.starting_gold;

        Self {
            player,
            enemy: None,
            phase: PhaseState::new(),
            floor: config.starting_floor.max(1),
            room: 1,
            rooms_per_floor: config.rooms_per_floor.max(1),
            paused: false,
            combat_speed: CombatSpeed::default(),
            cooldowns: CooldownTracker::new(),
            progression: ProgressionState::new(),
            log: CombatLog::new(),
            tick_count: 0,
            enemies_defeated: 0,
            invincible: config.invincible,
            xp_multiplier: config.xp_factor(),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase.phase()
    }

    pub fn is_boss_room(&self) -> bool {
        self.room >= self.rooms_per_floor
    }

    /// Clears encounter-scoped state before a retry or a new floor.
    /// Level, powers, stance unlocks, gold and position are kept.
    pub fn reset_encounter(&mut self) {
        self.player.reset_for_encounter();
        self.cooldowns.clear();
        self.enemy = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::player::CharacterClass;
    use crate::core::config::StatOverrides;

    #[test]
    fn test_new_applies_config() {
        let config = RunConfig {
            player_name: "Tester".to_string(),
            class: CharacterClass::Rogue,
            overrides: StatOverrides {
                attack: Some(40),
                defense: None,
                health: Some(250),
            },
            starting_gold: 75,
            starting_floor: 3,
            rooms_per_floor: 4,
            invincible: true,
            ..RunConfig::default()
        };
        let state = EncounterState::new(&config);
        assert_eq!(state.player.base.power, 40);
        assert_eq!(state.player.health(), 250);
        assert_eq!(state.player.gold, 75);
        assert_eq!(state.floor, 3);
        assert_eq!(state.room, 1);
        assert_eq!(state.rooms_per_floor, 4);
        assert!(state.invincible);
        assert_eq!(state.phase(), BattlePhase::Entering);
    }

    #[test]
    fn test_boss_room_is_last() {
        let mut state = EncounterState::new(&RunConfig::default());
        assert!(!state.is_boss_room());
        state.room = state.rooms_per_floor;
        assert!(state.is_boss_room());
    }
}
