use serde::{Deserialize, Serialize};

use crate::catalog::enemies::{floor_scaled, AbilityDef, EnemyTemplate};
use crate::character::stats::{ChanceBonuses, EffectiveStats, StatBlock};
use crate::combat::scheduler::AttackTimer;
use crate::combat::status::StatusTracker;

/// Which side of the fight an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Enemy,
}

/// An enemy ability plus its cooldown, counted in enemy turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyAbilityState {
    pub def: AbilityDef,
    pub cooldown_remaining: u32,
}

impl EnemyAbilityState {
    pub fn new(def: AbilityDef) -> Self {
        Self {
            def,
            cooldown_remaining: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub template_id: &'static str,
    pub name: String,
    pub floor: u32,
    pub is_boss: bool,
    pub max_health: u32,
    health: u32,
    pub stats: StatBlock,
    pub statuses: StatusTracker,
    pub timer: AttackTimer,
    pub abilities: Vec<EnemyAbilityState>,
    pub xp_reward: u64,
    pub gold_reward: u64,
    /// Dead and waiting for the death animation to finish
    pub is_dying: bool,
}

impl Enemy {
    /// Builds an enemy from a template at floor strength. `abilities` must
    /// already be resolved from the template's ids.
    pub fn from_template(
        template: &EnemyTemplate,
        floor: u32,
        abilities: Vec<AbilityDef>,
    ) -> Self {
        let scale = |value: u32| floor_scaled(value as u64, floor).min(u32::MAX as u64) as u32;
        let max_health = scale(template.health).max(1);
        Self {
            template_id: template.id,
            name: template.name.to_string(),
            floor,
            is_boss: template.is_boss,
            max_health,
            health: max_health,
            stats: StatBlock::new(
                scale(template.stats.power),
                scale(template.stats.armor),
                template.stats.speed,
                template.stats.fortune,
            ),
            statuses: StatusTracker::new(),
            timer: AttackTimer::new(),
            abilities: abilities.into_iter().map(EnemyAbilityState::new).collect(),
            xp_reward: floor_scaled(template.xp_reward, floor),
            gold_reward: floor_scaled(template.gold_reward, floor),
            is_dying: false,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    pub fn effective_stats(&self) -> EffectiveStats {
        EffectiveStats::derive(
            &self.stats,
            &StatBlock::default(),
            &self.statuses.percent_modifiers(),
            ChanceBonuses::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::enemies::{ABILITIES, ENEMIES};

    fn spider(floor: u32) -> Enemy {
        let template = ENEMIES.iter().find(|e| e.id == "cave_spider").unwrap();
        let abilities = ABILITIES
            .iter()
            .filter(|a| template.abilities.contains(&a.id))
            .copied()
            .collect();
        Enemy::from_template(template, floor, abilities)
    }

    #[test]
    fn test_enemy_from_template() {
        let enemy = spider(1);
        assert_eq!(enemy.name, "Cave Spider");
        assert_eq!(enemy.health(), 45);
        assert_eq!(enemy.max_health, 45);
        assert_eq!(enemy.abilities.len(), 1);
        assert!(enemy.abilities[0].is_ready());
        assert!(!enemy.is_dying);
    }

    #[test]
    fn test_enemy_scales_with_floor() {
        let deep = spider(3);
        assert_eq!(deep.max_health, 67);
        assert_eq!(deep.stats.power, 12);
        assert_eq!(deep.stats.speed, 12);
        assert!(deep.xp_reward > spider(1).xp_reward);
    }

    #[test]
    fn test_enemy_take_damage_no_underflow() {
        let mut enemy = spider(1);
        assert_eq!(enemy.take_damage(30), 30);
        assert_eq!(enemy.take_damage(100), 15);
        assert_eq!(enemy.health(), 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_enemy_heal_capped() {
        let mut enemy = spider(1);
        enemy.take_damage(10);
        assert_eq!(enemy.heal(50), 10);
        assert_eq!(enemy.health(), enemy.max_health);
    }
}
