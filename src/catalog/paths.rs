//! Paths, stances and stance enhancements.

use serde::{Deserialize, Serialize};

use crate::character::player::CharacterClass;
use crate::character::resource::ResourceType;
use crate::character::stats::{PercentBlock, StatKind};
use crate::combat::status::{StatusApplication, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathId {
    Berserker,
    Guardian,
    Archmage,
    Enchanter,
    Assassin,
    Duelist,
    Crusader,
    Protector,
}

impl PathId {
    pub const ALL: [PathId; 8] = [
        PathId::Berserker,
        PathId::Guardian,
        PathId::Archmage,
        PathId::Enchanter,
        PathId::Assassin,
        PathId::Duelist,
        PathId::Crusader,
        PathId::Protector,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PathId::Berserker => "berserker",
            PathId::Guardian => "guardian",
            PathId::Archmage => "archmage",
            PathId::Enchanter => "enchanter",
            PathId::Assassin => "assassin",
            PathId::Duelist => "duelist",
            PathId::Crusader => "crusader",
            PathId::Protector => "protector",
        }
    }

    pub fn from_key(key: &str) -> Option<PathId> {
        PathId::ALL.into_iter().find(|p| p.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceId {
    Iron,
    Retribution,
    ArcaneSurge,
    HexVeil,
    Riposte,
    Evasion,
    Sentinel,
    Martyr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCategory {
    /// Spends a resource on powers
    Active(ResourceType),
    /// Fights from one of two stances
    Passive([StanceId; 2]),
}

#[derive(Debug, Clone, Copy)]
pub struct PathDef {
    pub id: PathId,
    pub name: &'static str,
    pub class: CharacterClass,
    pub category: PathCategory,
    /// Power ids this path can learn, in offer order
    pub powers: &'static [&'static str],
    pub description: &'static str,
}

impl PathDef {
    pub fn is_active(&self) -> bool {
        matches!(self.category, PathCategory::Active(_))
    }

    pub fn resource(&self) -> Option<ResourceType> {
        match self.category {
            PathCategory::Active(resource) => Some(resource),
            PathCategory::Passive(_) => None,
        }
    }

    pub fn stances(&self) -> Option<[StanceId; 2]> {
        match self.category {
            PathCategory::Passive(stances) => Some(stances),
            PathCategory::Active(_) => None,
        }
    }
}

/// Passive bonuses granted by a stance or one of its enhancements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StanceBonus {
    pub percent: PercentBlock,
    pub crit_percent: u32,
    pub dodge_percent: u32,
    /// Incoming damage reduction, same scale as the Shield status
    pub shield_percent: u32,
    /// Share of landed damage taken that is dealt back
    pub reflect_percent: u32,
    /// Healing at each of the player's turns
    pub regen_per_turn: u32,
    /// Share of basic-attack damage healed
    pub lifesteal_percent: u32,
    /// Applied to the enemy on a landed basic attack
    pub on_hit: Option<StatusApplication>,
}

impl StanceBonus {
    pub const NONE: StanceBonus = StanceBonus {
        percent: PercentBlock::new(0, 0, 0, 0),
        crit_percent: 0,
        dodge_percent: 0,
        shield_percent: 0,
        reflect_percent: 0,
        regen_per_turn: 0,
        lifesteal_percent: 0,
        on_hit: None,
    };

    /// Adds another bonus on top. An incoming on-hit status replaces the
    /// current one.
    pub fn merge(&mut self, other: &StanceBonus) {
        self.percent.add(&other.percent);
        self.crit_percent += other.crit_percent;
        self.dodge_percent += other.dodge_percent;
        self.shield_percent += other.shield_percent;
        self.reflect_percent += other.reflect_percent;
        self.regen_per_turn += other.regen_per_turn;
        self.lifesteal_percent += other.lifesteal_percent;
        if other.on_hit.is_some() {
            self.on_hit = other.on_hit;
        }
    }
}

impl Default for StanceBonus {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StanceDef {
    pub id: StanceId,
    pub name: &'static str,
    pub bonus: StanceBonus,
    /// Enhancement ids for this stance, unlocked in any order
    pub enhancements: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct EnhancementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub stance: StanceId,
    pub bonus: StanceBonus,
    pub description: &'static str,
}

pub const PATHS: &[PathDef] = &[
    PathDef {
        id: PathId::Berserker,
        name: "Berserker",
        class: CharacterClass::Warrior,
        category: PathCategory::Active(ResourceType::Fury),
        powers: &[
            "cleave",
            "blood_rage",
            "reckless_fury",
            "bloodbath",
            "battle_trance",
        ],
        description: "Builds Fury from every blow dealt or taken",
    },
    PathDef {
        id: PathId::Guardian,
        name: "Guardian",
        class: CharacterClass::Warrior,
        category: PathCategory::Passive([StanceId::Iron, StanceId::Retribution]),
        powers: &[],
        description: "Holds the line in Iron or strikes back in Retribution",
    },
    PathDef {
        id: PathId::Archmage,
        name: "Archmage",
        class: CharacterClass::Mage,
        category: PathCategory::Active(ResourceType::ArcaneCharges),
        powers: &[
            "arcane_missiles",
            "fireball",
            "frost_nova",
            "mana_shield",
            "arcane_recursion",
        ],
        description: "Gathers Arcane Charges steadily while fighting",
    },
    PathDef {
        id: PathId::Enchanter,
        name: "Enchanter",
        class: CharacterClass::Mage,
        category: PathCategory::Passive([StanceId::ArcaneSurge, StanceId::HexVeil]),
        powers: &[],
        description: "Channels raw power or weaves hexes into every strike",
    },
    PathDef {
        id: PathId::Assassin,
        name: "Assassin",
        class: CharacterClass::Rogue,
        category: PathCategory::Active(ResourceType::Momentum),
        powers: &[
            "vital_strike",
            "ambush",
            "death_mark",
            "shadow_dance",
            "envenom",
        ],
        description: "Gains Momentum from hits, crits and dodges",
    },
    PathDef {
        id: PathId::Duelist,
        name: "Duelist",
        class: CharacterClass::Rogue,
        category: PathCategory::Passive([StanceId::Riposte, StanceId::Evasion]),
        powers: &[],
        description: "Counters every blow or avoids it entirely",
    },
    PathDef {
        id: PathId::Crusader,
        name: "Crusader",
        class: CharacterClass::Paladin,
        category: PathCategory::Active(ResourceType::Zeal),
        powers: &[
            "holy_strike",
            "divine_heal",
            "smite_the_wicked",
            "mark_of_judgment",
            "weakening_light",
        ],
        description: "Kindles Zeal in the thick of battle",
    },
    PathDef {
        id: PathId::Protector,
        name: "Protector",
        class: CharacterClass::Paladin,
        category: PathCategory::Passive([StanceId::Sentinel, StanceId::Martyr]),
        powers: &[],
        description: "Endures as a Sentinel or sacrifices as a Martyr",
    },
];

pub const STANCES: &[StanceDef] = &[
    StanceDef {
        id: StanceId::Iron,
        name: "Iron",
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 30, 0, 0),
            shield_percent: 10,
            ..StanceBonus::NONE
        },
        enhancements: &["iron_skin", "bulwark", "unbreakable"],
    },
    StanceDef {
        id: StanceId::Retribution,
        name: "Retribution",
        bonus: StanceBonus {
            percent: PercentBlock::new(10, 0, 0, 0),
            reflect_percent: 25,
            ..StanceBonus::NONE
        },
        enhancements: &["thorns", "vengeful_strike", "reprisal"],
    },
    StanceDef {
        id: StanceId::ArcaneSurge,
        name: "Arcane Surge",
        bonus: StanceBonus {
            percent: PercentBlock::new(25, 0, 0, 0),
            crit_percent: 5,
            ..StanceBonus::NONE
        },
        enhancements: &["overflow", "spell_echo", "ley_conduit"],
    },
    StanceDef {
        id: StanceId::HexVeil,
        name: "Hex Veil",
        bonus: StanceBonus {
            dodge_percent: 5,
            on_hit: Some(StatusApplication::new(
                StatusKind::Debuff(StatKind::Power),
                15,
                2,
            )),
            ..StanceBonus::NONE
        },
        enhancements: &["withering_hex", "veil_of_mist", "hex_mastery"],
    },
    StanceDef {
        id: StanceId::Riposte,
        name: "Riposte",
        bonus: StanceBonus {
            crit_percent: 10,
            reflect_percent: 15,
            ..StanceBonus::NONE
        },
        enhancements: &["counter_edge", "lunge", "perfect_parry"],
    },
    StanceDef {
        id: StanceId::Evasion,
        name: "Evasion",
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 0, 10, 0),
            dodge_percent: 15,
            ..StanceBonus::NONE
        },
        enhancements: &["fleet_foot", "smoke_step", "untouchable"],
    },
    StanceDef {
        id: StanceId::Sentinel,
        name: "Sentinel",
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 20, 0, 0),
            regen_per_turn: 3,
            ..StanceBonus::NONE
        },
        enhancements: &["steadfast", "holy_ward", "guardian_light"],
    },
    StanceDef {
        id: StanceId::Martyr,
        name: "Martyr",
        bonus: StanceBonus {
            percent: PercentBlock::new(10, 0, 0, 0),
            lifesteal_percent: 15,
            ..StanceBonus::NONE
        },
        enhancements: &["blood_oath", "sacred_wound", "final_stand"],
    },
];

pub const ENHANCEMENTS: &[EnhancementDef] = &[
    // Iron
    EnhancementDef {
        id: "iron_skin",
        name: "Iron Skin",
        stance: StanceId::Iron,
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 20, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+20% armor in Iron",
    },
    EnhancementDef {
        id: "bulwark",
        name: "Bulwark",
        stance: StanceId::Iron,
        bonus: StanceBonus {
            shield_percent: 10,
            ..StanceBonus::NONE
        },
        description: "Iron blocks an extra 10% of incoming damage",
    },
    EnhancementDef {
        id: "unbreakable",
        name: "Unbreakable",
        stance: StanceId::Iron,
        bonus: StanceBonus {
            regen_per_turn: 3,
            ..StanceBonus::NONE
        },
        description: "Recover 3 health every turn in Iron",
    },
    // Retribution
    EnhancementDef {
        id: "thorns",
        name: "Thorns",
        stance: StanceId::Retribution,
        bonus: StanceBonus {
            reflect_percent: 15,
            ..StanceBonus::NONE
        },
        description: "Reflect an extra 15% of damage taken",
    },
    EnhancementDef {
        id: "vengeful_strike",
        name: "Vengeful Strike",
        stance: StanceId::Retribution,
        bonus: StanceBonus {
            percent: PercentBlock::new(15, 0, 0, 0),
            crit_percent: 5,
            ..StanceBonus::NONE
        },
        description: "+15% power and +5% crit in Retribution",
    },
    EnhancementDef {
        id: "reprisal",
        name: "Reprisal",
        stance: StanceId::Retribution,
        bonus: StanceBonus {
            on_hit: Some(StatusApplication::new(StatusKind::Bleed, 4, 3)),
            ..StanceBonus::NONE
        },
        description: "Basic attacks open bleeding wounds",
    },
    // Arcane Surge
    EnhancementDef {
        id: "overflow",
        name: "Overflow",
        stance: StanceId::ArcaneSurge,
        bonus: StanceBonus {
            percent: PercentBlock::new(15, 0, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+15% power in Arcane Surge",
    },
    EnhancementDef {
        id: "spell_echo",
        name: "Spell Echo",
        stance: StanceId::ArcaneSurge,
        bonus: StanceBonus {
            crit_percent: 10,
            ..StanceBonus::NONE
        },
        description: "+10% crit chance in Arcane Surge",
    },
    EnhancementDef {
        id: "ley_conduit",
        name: "Ley Conduit",
        stance: StanceId::ArcaneSurge,
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 0, 15, 0),
            ..StanceBonus::NONE
        },
        description: "+15% speed in Arcane Surge",
    },
    // Hex Veil
    EnhancementDef {
        id: "withering_hex",
        name: "Withering Hex",
        stance: StanceId::HexVeil,
        bonus: StanceBonus {
            on_hit: Some(StatusApplication::new(
                StatusKind::Debuff(StatKind::Power),
                25,
                3,
            )),
            ..StanceBonus::NONE
        },
        description: "Hexes weaken enemy power by 25%",
    },
    EnhancementDef {
        id: "veil_of_mist",
        name: "Veil of Mist",
        stance: StanceId::HexVeil,
        bonus: StanceBonus {
            dodge_percent: 10,
            ..StanceBonus::NONE
        },
        description: "+10% dodge in Hex Veil",
    },
    EnhancementDef {
        id: "hex_mastery",
        name: "Hex Mastery",
        stance: StanceId::HexVeil,
        bonus: StanceBonus {
            percent: PercentBlock::new(10, 10, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+10% power and armor in Hex Veil",
    },
    // Riposte
    EnhancementDef {
        id: "counter_edge",
        name: "Counter Edge",
        stance: StanceId::Riposte,
        bonus: StanceBonus {
            reflect_percent: 15,
            ..StanceBonus::NONE
        },
        description: "Counter an extra 15% of damage taken",
    },
    EnhancementDef {
        id: "lunge",
        name: "Lunge",
        stance: StanceId::Riposte,
        bonus: StanceBonus {
            percent: PercentBlock::new(15, 0, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+15% power in Riposte",
    },
    EnhancementDef {
        id: "perfect_parry",
        name: "Perfect Parry",
        stance: StanceId::Riposte,
        bonus: StanceBonus {
            shield_percent: 15,
            ..StanceBonus::NONE
        },
        description: "Parry 15% of incoming damage in Riposte",
    },
    // Evasion
    EnhancementDef {
        id: "fleet_foot",
        name: "Fleet Foot",
        stance: StanceId::Evasion,
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 0, 15, 0),
            ..StanceBonus::NONE
        },
        description: "+15% speed in Evasion",
    },
    EnhancementDef {
        id: "smoke_step",
        name: "Smoke Step",
        stance: StanceId::Evasion,
        bonus: StanceBonus {
            dodge_percent: 10,
            ..StanceBonus::NONE
        },
        description: "+10% dodge in Evasion",
    },
    EnhancementDef {
        id: "untouchable",
        name: "Untouchable",
        stance: StanceId::Evasion,
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 0, 0, 25),
            ..StanceBonus::NONE
        },
        description: "+25% fortune in Evasion",
    },
    // Sentinel
    EnhancementDef {
        id: "steadfast",
        name: "Steadfast",
        stance: StanceId::Sentinel,
        bonus: StanceBonus {
            percent: PercentBlock::new(0, 20, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+20% armor in Sentinel",
    },
    EnhancementDef {
        id: "holy_ward",
        name: "Holy Ward",
        stance: StanceId::Sentinel,
        bonus: StanceBonus {
            shield_percent: 10,
            ..StanceBonus::NONE
        },
        description: "Ward off 10% of incoming damage in Sentinel",
    },
    EnhancementDef {
        id: "guardian_light",
        name: "Guardian Light",
        stance: StanceId::Sentinel,
        bonus: StanceBonus {
            regen_per_turn: 4,
            ..StanceBonus::NONE
        },
        description: "Recover 4 more health every turn in Sentinel",
    },
    // Martyr
    EnhancementDef {
        id: "blood_oath",
        name: "Blood Oath",
        stance: StanceId::Martyr,
        bonus: StanceBonus {
            lifesteal_percent: 10,
            ..StanceBonus::NONE
        },
        description: "+10% lifesteal in Martyr",
    },
    EnhancementDef {
        id: "sacred_wound",
        name: "Sacred Wound",
        stance: StanceId::Martyr,
        bonus: StanceBonus {
            reflect_percent: 20,
            ..StanceBonus::NONE
        },
        description: "Reflect 20% of damage taken in Martyr",
    },
    EnhancementDef {
        id: "final_stand",
        name: "Final Stand",
        stance: StanceId::Martyr,
        bonus: StanceBonus {
            percent: PercentBlock::new(20, 0, 0, 0),
            ..StanceBonus::NONE
        },
        description: "+20% power in Martyr",
    },
];
