//! Enemy templates and enemy abilities.

use crate::character::stats::StatBlock;
use crate::core::constants::FLOOR_SCALING_PERCENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    /// `magnitude` strikes at reduced power
    MultiHit,
    /// A strike that poisons for `magnitude` per turn
    Poison,
    /// A strike that stuns for `turns`
    Stun,
    /// Heals `magnitude` percent of max health
    Heal,
    /// Raises own power by `magnitude` percent
    Enrage,
    /// Blocks `magnitude` percent of incoming damage
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: AbilityKind,
    pub magnitude: u32,
    pub turns: u32,
    /// Chance per eligible enemy turn
    pub trigger_percent: u32,
    /// Enemy turns before the ability can trigger again
    pub cooldown_turns: u32,
}

/// Power percent of each strike of a multi-hit ability.
pub const MULTI_HIT_DAMAGE_PERCENT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub health: u32,
    pub stats: StatBlock,
    pub xp_reward: u64,
    pub gold_reward: u64,
    /// First floor this enemy can appear on
    pub min_floor: u32,
    pub is_boss: bool,
    /// Ability ids in trigger priority order
    pub abilities: &'static [&'static str],
}

impl EnemyTemplate {
    pub fn can_spawn(&self, floor: u32, boss_room: bool) -> bool {
        self.is_boss == boss_room && self.min_floor <= floor
    }
}

/// Scales a base value for a floor: +`FLOOR_SCALING_PERCENT` per floor past the first.
pub fn floor_scaled(value: u64, floor: u32) -> u64 {
    let bonus = FLOOR_SCALING_PERCENT as u64 * floor.saturating_sub(1) as u64;
    value * (100 + bonus) / 100
}

pub const ABILITIES: &[AbilityDef] = &[
    AbilityDef {
        id: "venom_spit",
        name: "Venom Spit",
        kind: AbilityKind::Poison,
        magnitude: 4,
        turns: 3,
        trigger_percent: 40,
        cooldown_turns: 0,
    },
    AbilityDef {
        id: "crushing_blow",
        name: "Crushing Blow",
        kind: AbilityKind::Stun,
        magnitude: 0,
        turns: 1,
        trigger_percent: 25,
        cooldown_turns: 3,
    },
    AbilityDef {
        id: "flurry",
        name: "Flurry",
        kind: AbilityKind::MultiHit,
        magnitude: 3,
        turns: 0,
        trigger_percent: 30,
        cooldown_turns: 2,
    },
    AbilityDef {
        id: "regenerate",
        name: "Regenerate",
        kind: AbilityKind::Heal,
        magnitude: 20,
        turns: 0,
        trigger_percent: 35,
        cooldown_turns: 4,
    },
    AbilityDef {
        id: "war_cry",
        name: "War Cry",
        kind: AbilityKind::Enrage,
        magnitude: 30,
        turns: 3,
        trigger_percent: 30,
        cooldown_turns: 5,
    },
    AbilityDef {
        id: "stone_skin",
        name: "Stone Skin",
        kind: AbilityKind::Shield,
        magnitude: 40,
        turns: 2,
        trigger_percent: 30,
        cooldown_turns: 4,
    },
];

pub const ENEMIES: &[EnemyTemplate] = &[
    EnemyTemplate {
        id: "sewer_rat",
        name: "Sewer Rat",
        health: 40,
        stats: StatBlock::new(7, 1, 11, 3),
        xp_reward: 25,
        gold_reward: 5,
        min_floor: 1,
        is_boss: false,
        abilities: &[],
    },
    EnemyTemplate {
        id: "goblin_skirmisher",
        name: "Goblin Skirmisher",
        health: 55,
        stats: StatBlock::new(9, 2, 10, 5),
        xp_reward: 35,
        gold_reward: 8,
        min_floor: 1,
        is_boss: false,
        abilities: &["flurry"],
    },
    EnemyTemplate {
        id: "cave_spider",
        name: "Cave Spider",
        health: 45,
        stats: StatBlock::new(8, 1, 12, 6),
        xp_reward: 35,
        gold_reward: 7,
        min_floor: 1,
        is_boss: false,
        abilities: &["venom_spit"],
    },
    EnemyTemplate {
        id: "skeleton_warrior",
        name: "Skeleton Warrior",
        health: 70,
        stats: StatBlock::new(11, 4, 8, 2),
        xp_reward: 50,
        gold_reward: 12,
        min_floor: 2,
        is_boss: false,
        abilities: &["crushing_blow"],
    },
    EnemyTemplate {
        id: "bog_troll",
        name: "Bog Troll",
        health: 110,
        stats: StatBlock::new(13, 3, 7, 2),
        xp_reward: 70,
        gold_reward: 15,
        min_floor: 3,
        is_boss: false,
        abilities: &["regenerate"],
    },
    EnemyTemplate {
        id: "orc_berserker",
        name: "Orc Berserker",
        health: 90,
        stats: StatBlock::new(14, 3, 10, 4),
        xp_reward: 65,
        gold_reward: 14,
        min_floor: 3,
        is_boss: false,
        abilities: &["war_cry", "flurry"],
    },
    EnemyTemplate {
        id: "stone_golem",
        name: "Stone Golem",
        health: 140,
        stats: StatBlock::new(12, 8, 6, 1),
        xp_reward: 85,
        gold_reward: 20,
        min_floor: 4,
        is_boss: false,
        abilities: &["stone_skin", "crushing_blow"],
    },
    EnemyTemplate {
        id: "goblin_chieftain",
        name: "Goblin Chieftain",
        health: 160,
        stats: StatBlock::new(13, 4, 10, 6),
        xp_reward: 150,
        gold_reward: 50,
        min_floor: 1,
        is_boss: true,
        abilities: &["war_cry", "flurry"],
    },
    EnemyTemplate {
        id: "broodmother",
        name: "Broodmother",
        health: 200,
        stats: StatBlock::new(14, 3, 11, 8),
        xp_reward: 200,
        gold_reward: 70,
        min_floor: 2,
        is_boss: true,
        abilities: &["venom_spit", "regenerate"],
    },
    EnemyTemplate {
        id: "bone_lich",
        name: "Bone Lich",
        health: 240,
        stats: StatBlock::new(17, 5, 9, 6),
        xp_reward: 280,
        gold_reward: 100,
        min_floor: 4,
        is_boss: true,
        abilities: &["crushing_blow", "stone_skin", "venom_spit"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_scaling() {
        assert_eq!(floor_scaled(100, 1), 100);
        assert_eq!(floor_scaled(100, 2), 125);
        assert_eq!(floor_scaled(40, 3), 60);
        assert_eq!(floor_scaled(100, 0), 100);
    }

    #[test]
    fn test_floor_one_has_regular_and_boss_enemies() {
        assert!(ENEMIES.iter().any(|e| e.can_spawn(1, false)));
        assert!(ENEMIES.iter().any(|e| e.can_spawn(1, true)));
    }

    #[test]
    fn test_floor_gating() {
        let golem = ENEMIES.iter().find(|e| e.id == "stone_golem").unwrap();
        assert!(!golem.can_spawn(3, false));
        assert!(golem.can_spawn(4, false));
        assert!(!golem.can_spawn(4, true));
    }

    #[test]
    fn test_ability_chances_are_percentages() {
        for ability in ABILITIES {
            assert!(ability.trigger_percent <= 100, "{}", ability.id);
        }
    }
}
