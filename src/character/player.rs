use serde::{Deserialize, Serialize};

use crate::catalog::paths::{PathId, StanceBonus, StanceId};
use crate::catalog::Catalog;
use crate::character::equipment::Equipment;
use crate::character::resource::PathResource;
use crate::character::stats::{ChanceBonuses, EffectiveStats, StatBlock};
use crate::combat::scheduler::AttackTimer;
use crate::combat::status::StatusTracker;
use crate::core::config::StatOverrides;
use crate::core::constants::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    #[default]
    Warrior,
    Mage,
    Rogue,
    Paladin,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Paladin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Paladin => "Paladin",
        }
    }

    pub fn base_stats(&self) -> StatBlock {
        match self {
            CharacterClass::Warrior => StatBlock::new(14, 6, 9, 4),
            CharacterClass::Mage => StatBlock::new(18, 3, 10, 6),
            CharacterClass::Rogue => StatBlock::new(13, 4, 13, 12),
            CharacterClass::Paladin => StatBlock::new(12, 7, 9, 5),
        }
    }

    pub fn base_health(&self) -> u32 {
        match self {
            CharacterClass::Warrior => 120,
            CharacterClass::Mage => 90,
            CharacterClass::Rogue => 100,
            CharacterClass::Paladin => 115,
        }
    }
}

/// XP required to go from `level` to `level + 1`.
pub fn xp_for_next_level(level: u32) -> u64 {
    (XP_CURVE_BASE * f64::powf(level as f64, XP_CURVE_EXPONENT)) as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedPower {
    pub id: String,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceState {
    pub active: StanceId,
    /// Enhancement ids unlocked so far, across both stances
    pub unlocked: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    /// XP into the current level
    pub xp: u64,
    pub gold: u64,
    pub base: StatBlock,
    pub base_max_health: u32,
    health: u32,
    pub equipment: Equipment,
    pub path: Option<PathId>,
    pub resource: Option<PathResource>,
    powers: Vec<LearnedPower>,
    pub stance: Option<StanceState>,
    pub statuses: StatusTracker,
    pub timer: AttackTimer,
}

impl Player {
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let base_max_health = class.base_health();
        Self {
            name: name.into(),
            class,
            level: 1,
            xp: 0,
            gold: 0,
            base: class.base_stats(),
            base_max_health,
            health: base_max_health,
            equipment: Equipment::new(),
            path: None,
            resource: None,
            powers: Vec::new(),
            stance: None,
            statuses: StatusTracker::new(),
            timer: AttackTimer::new(),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &StatOverrides) {
        if let Some(attack) = overrides.attack {
            self.base.power = attack;
        }
        if let Some(defense) = overrides.defense {
            self.base.armor = defense;
        }
        if let Some(health) = overrides.health {
            self.base_max_health = health.max(1);
        }
        self.health = self.max_health();
    }

    pub fn max_health(&self) -> u32 {
        self.base_max_health
            .saturating_add(self.equipment.health_bonus())
            .max(1)
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns the damage actually taken. An invincible player never drops
    /// below 1 health.
    pub fn take_damage(&mut self, amount: u32, invincible: bool) -> u32 {
        let floor = if invincible { 1.min(self.health) } else { 0 };
        let dealt = amount.min(self.health - floor);
        self.health -= dealt;
        dealt
    }

    /// Returns the health actually restored. Never overshoots max health.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health());
        self.health - before
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health();
    }

    /// Keeps health within the current max after equipment changes.
    pub fn clamp_health(&mut self) {
        self.health = self.health.min(self.max_health());
    }

    pub fn powers(&self) -> &[LearnedPower] {
        &self.powers
    }

    pub fn power_tier(&self, id: &str) -> Option<u8> {
        self.powers.iter().find(|p| p.id == id).map(|p| p.tier)
    }

    pub fn knows_power(&self, id: &str) -> bool {
        self.power_tier(id).is_some()
    }

    pub(crate) fn learn_power(&mut self, id: &str) -> bool {
        if self.knows_power(id) {
            return false;
        }
        self.powers.push(LearnedPower {
            id: id.to_string(),
            tier: 0,
        });
        true
    }

    /// Raises a learned power one tier. Returns the new tier.
    pub(crate) fn upgrade_power(&mut self, id: &str) -> Option<u8> {
        let power = self.powers.iter_mut().find(|p| p.id == id)?;
        if power.tier >= MAX_POWER_TIER {
            return None;
        }
        power.tier += 1;
        Some(power.tier)
    }

    /// Bonus from the active stance plus that stance's unlocked enhancements.
    pub fn stance_bonus(&self, catalog: &Catalog) -> StanceBonus {
        let Some(stance) = &self.stance else {
            return StanceBonus::NONE;
        };
        let mut bonus = catalog
            .stance(stance.active)
            .map_or(StanceBonus::NONE, |s| s.bonus);
        for id in &stance.unlocked {
            if let Some(enhancement) = catalog.enhancement(id) {
                if enhancement.stance == stance.active {
                    bonus.merge(&enhancement.bonus);
                }
            }
        }
        bonus
    }

    pub fn effective_stats(&self, catalog: &Catalog) -> EffectiveStats {
        let stance = self.stance_bonus(catalog);
        let mut percent = self.equipment.percent_bonus();
        percent.add(&self.statuses.percent_modifiers());
        percent.add(&stance.percent);
        EffectiveStats::derive(
            &self.base,
            &self.equipment.flat_bonus(),
            &percent,
            ChanceBonuses {
                crit_percent: stance.crit_percent,
                dodge_percent: stance.dodge_percent,
            },
        )
    }

    /// Adds XP and processes level-ups. Returns every level reached.
    pub fn add_xp(&mut self, amount: u64) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        let mut reached = Vec::new();
        loop {
            let needed = xp_for_next_level(self.level);
            if self.xp < needed {
                break;
            }
            self.xp -= needed;
            self.level += 1;
            self.base_max_health += LEVEL_UP_HEALTH_GAIN;
            self.base.power += LEVEL_UP_POWER_GAIN;
            self.base.armor += LEVEL_UP_ARMOR_GAIN;
            self.heal(LEVEL_UP_HEALTH_GAIN);
            reached.push(self.level);
        }
        reached
    }

    /// Floor-start baseline: full health, empty resource, no statuses,
    /// fresh attack timer. Progression is untouched.
    pub fn reset_for_encounter(&mut self) {
        self.heal_full();
        if let Some(resource) = self.resource.as_mut() {
            resource.reset();
        }
        self.statuses.clear();
        self.timer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::equipment::{EquipmentSlot, Item};
    use crate::character::resource::ResourceType;

    #[test]
    fn test_new_player_uses_class_stats() {
        let player = Player::new("Aria", CharacterClass::Mage);
        assert_eq!(player.level, 1);
        assert_eq!(player.health(), 90);
        assert_eq!(player.base, CharacterClass::Mage.base_stats());
        assert!(player.path.is_none());
        assert!(player.powers().is_empty());
    }

    #[test]
    fn test_xp_curve() {
        assert_eq!(xp_for_next_level(1), 100);
        assert_eq!(xp_for_next_level(4), 800);
        assert!(xp_for_next_level(10) > xp_for_next_level(9));
    }

    #[test]
    fn test_add_xp_multiple_levels() {
        let mut player = Player::new("Aria", CharacterClass::Warrior);
        let needed = xp_for_next_level(1) + xp_for_next_level(2) + 5;
        let reached = player.add_xp(needed);
        assert_eq!(reached, vec![2, 3]);
        assert_eq!(player.level, 3);
        assert_eq!(player.xp, 5);
        assert_eq!(player.base_max_health, 120 + 2 * LEVEL_UP_HEALTH_GAIN);
        assert_eq!(player.base.power, 14 + 2 * LEVEL_UP_POWER_GAIN);
    }

    #[test]
    fn test_heal_never_overshoots() {
        let mut player = Player::new("Aria", CharacterClass::Paladin);
        player.base_max_health = 100;
        player.heal_full();
        player.take_damage(50, false);
        assert_eq!(player.heal(80), 50);
        assert_eq!(player.health(), 100);
    }

    #[test]
    fn test_invincible_floor() {
        let mut player = Player::new("Aria", CharacterClass::Rogue);
        assert_eq!(player.take_damage(1000, true), 99);
        assert_eq!(player.health(), 1);
        assert_eq!(player.take_damage(5, true), 0);
        assert!(player.is_alive());
        assert_eq!(player.take_damage(5, false), 1);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_overrides() {
        let mut player = Player::new("Aria", CharacterClass::Warrior);
        player.apply_overrides(&StatOverrides {
            attack: Some(99),
            defense: None,
            health: Some(500),
        });
        assert_eq!(player.base.power, 99);
        assert_eq!(player.base.armor, 6);
        assert_eq!(player.health(), 500);
    }

    #[test]
    fn test_tiers_only_go_up_to_max() {
        let mut player = Player::new("Aria", CharacterClass::Warrior);
        assert!(player.upgrade_power("cleave").is_none());
        assert!(player.learn_power("cleave"));
        assert!(!player.learn_power("cleave"));
        assert_eq!(player.upgrade_power("cleave"), Some(1));
        assert_eq!(player.upgrade_power("cleave"), Some(2));
        assert_eq!(player.upgrade_power("cleave"), None);
        assert_eq!(player.power_tier("cleave"), Some(MAX_POWER_TIER));
    }

    #[test]
    fn test_stance_bonus_only_counts_active_stance_enhancements() {
        let catalog = Catalog::builtin();
        let mut player = Player::new("Aria", CharacterClass::Warrior);
        player.stance = Some(StanceState {
            active: StanceId::Iron,
            unlocked: vec!["iron_skin".to_string(), "thorns".to_string()],
        });
        let iron = player.stance_bonus(&catalog);
        assert_eq!(iron.percent.armor, 50);
        assert_eq!(iron.reflect_percent, 0);

        player.stance.as_mut().unwrap().active = StanceId::Retribution;
        let retribution = player.stance_bonus(&catalog);
        assert_eq!(retribution.percent.armor, 0);
        assert_eq!(retribution.reflect_percent, 40);
    }

    #[test]
    fn test_equipment_health_raises_max() {
        let mut player = Player::new("Aria", CharacterClass::Mage);
        player
            .equipment
            .equip(Item::new("Robe", EquipmentSlot::Armor).with_health(30));
        assert_eq!(player.max_health(), 120);
        assert_eq!(player.health(), 90);
        player.equipment.unequip(EquipmentSlot::Armor);
        player.heal(500);
        assert_eq!(player.health(), 90);
    }

    #[test]
    fn test_reset_for_encounter_keeps_progression() {
        let mut player = Player::new("Aria", CharacterClass::Warrior);
        player.learn_power("cleave");
        player.gold = 40;
        let mut fury = PathResource::new(ResourceType::Fury);
        fury.gain(60);
        player.resource = Some(fury);
        player.take_damage(70, false);

        player.reset_for_encounter();
        assert_eq!(player.health(), player.max_health());
        assert_eq!(player.resource.as_ref().unwrap().current(), 0);
        assert_eq!(player.gold, 40);
        assert!(player.knows_power("cleave"));
    }
}
