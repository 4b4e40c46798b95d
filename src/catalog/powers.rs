//! Power definitions for the active paths.

use crate::catalog::paths::PathId;
use crate::character::stats::StatKind;
use crate::combat::powers::PowerEffect;
use crate::combat::status::{StatusApplication, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerDef {
    pub id: &'static str,
    pub name: &'static str,
    pub path: PathId,
    pub cost: u32,
    pub cooldown_seconds: u32,
    pub effect: PowerEffect,
    pub description: &'static str,
}

pub const POWERS: &[PowerDef] = &[
    // Berserker
    PowerDef {
        id: "cleave",
        name: "Cleave",
        path: PathId::Berserker,
        cost: 15,
        cooldown_seconds: 3,
        effect: PowerEffect::Damage {
            multiplier_percent: 140,
        },
        description: "A wide swing for 140% damage",
    },
    PowerDef {
        id: "blood_rage",
        name: "Blood Rage",
        path: PathId::Berserker,
        cost: 20,
        cooldown_seconds: 8,
        effect: PowerEffect::SelfBuff {
            stat: StatKind::Power,
            percent: 30,
            turns: 3,
        },
        description: "+30% power for 3 turns",
    },
    PowerDef {
        id: "reckless_fury",
        name: "Reckless Fury",
        path: PathId::Berserker,
        cost: 30,
        cooldown_seconds: 5,
        effect: PowerEffect::Damage {
            multiplier_percent: 200,
        },
        description: "An all-out blow for 200% damage",
    },
    PowerDef {
        id: "bloodbath",
        name: "Bloodbath",
        path: PathId::Berserker,
        cost: 40,
        cooldown_seconds: 10,
        effect: PowerEffect::Combo(&[
            PowerEffect::Damage {
                multiplier_percent: 150,
            },
            PowerEffect::ApplyStatus(StatusApplication::new(StatusKind::Bleed, 6, 3)),
        ]),
        description: "150% damage and a deep bleed",
    },
    PowerDef {
        id: "battle_trance",
        name: "Battle Trance",
        path: PathId::Berserker,
        cost: 25,
        cooldown_seconds: 12,
        effect: PowerEffect::Combo(&[
            PowerEffect::SelfBuff {
                stat: StatKind::Speed,
                percent: 25,
                turns: 3,
            },
            PowerEffect::SelfBuff {
                stat: StatKind::Fortune,
                percent: 30,
                turns: 3,
            },
        ]),
        description: "+25% speed and +30% fortune for 3 turns",
    },
    // Archmage
    PowerDef {
        id: "arcane_missiles",
        name: "Arcane Missiles",
        path: PathId::Archmage,
        cost: 20,
        cooldown_seconds: 2,
        effect: PowerEffect::Damage {
            multiplier_percent: 160,
        },
        description: "A volley of bolts for 160% damage",
    },
    PowerDef {
        id: "fireball",
        name: "Fireball",
        path: PathId::Archmage,
        cost: 35,
        cooldown_seconds: 6,
        effect: PowerEffect::Damage {
            multiplier_percent: 250,
        },
        description: "A blazing orb for 250% damage",
    },
    PowerDef {
        id: "frost_nova",
        name: "Frost Nova",
        path: PathId::Archmage,
        cost: 30,
        cooldown_seconds: 10,
        effect: PowerEffect::Combo(&[
            PowerEffect::Damage {
                multiplier_percent: 100,
            },
            PowerEffect::ApplyStatus(StatusApplication::new(StatusKind::Slow, 40, 3)),
        ]),
        description: "100% damage and slows the enemy by 40%",
    },
    PowerDef {
        id: "mana_shield",
        name: "Mana Shield",
        path: PathId::Archmage,
        cost: 40,
        cooldown_seconds: 15,
        effect: PowerEffect::Block {
            reduction_percent: 50,
            turns: 3,
        },
        description: "Absorb 50% of incoming damage for 3 turns",
    },
    PowerDef {
        id: "arcane_recursion",
        name: "Arcane Recursion",
        path: PathId::Archmage,
        cost: 10,
        cooldown_seconds: 20,
        effect: PowerEffect::ResourceRefund { amount: 35 },
        description: "Fold spent charges back into the weave",
    },
    // Assassin
    PowerDef {
        id: "vital_strike",
        name: "Vital Strike",
        path: PathId::Assassin,
        cost: 20,
        cooldown_seconds: 3,
        effect: PowerEffect::Damage {
            multiplier_percent: 180,
        },
        description: "A precise cut for 180% damage",
    },
    PowerDef {
        id: "ambush",
        name: "Ambush",
        path: PathId::Assassin,
        cost: 35,
        cooldown_seconds: 8,
        effect: PowerEffect::Combo(&[
            PowerEffect::Damage {
                multiplier_percent: 150,
            },
            PowerEffect::ApplyStatus(StatusApplication::new(StatusKind::Stun, 0, 1)),
        ]),
        description: "150% damage and stuns for a turn",
    },
    PowerDef {
        id: "death_mark",
        name: "Death Mark",
        path: PathId::Assassin,
        cost: 30,
        cooldown_seconds: 12,
        effect: PowerEffect::ApplyStatus(StatusApplication::new(
            StatusKind::Debuff(StatKind::Armor),
            50,
            3,
        )),
        description: "Strip 50% of the enemy's armor for 3 turns",
    },
    PowerDef {
        id: "shadow_dance",
        name: "Shadow Dance",
        path: PathId::Assassin,
        cost: 25,
        cooldown_seconds: 10,
        effect: PowerEffect::SelfBuff {
            stat: StatKind::Fortune,
            percent: 60,
            turns: 3,
        },
        description: "+60% fortune for 3 turns",
    },
    PowerDef {
        id: "envenom",
        name: "Envenom",
        path: PathId::Assassin,
        cost: 20,
        cooldown_seconds: 6,
        effect: PowerEffect::Combo(&[
            PowerEffect::Damage {
                multiplier_percent: 120,
            },
            PowerEffect::ApplyStatus(StatusApplication::new(StatusKind::Poison, 5, 4)),
        ]),
        description: "120% damage and a lingering poison",
    },
    // Crusader
    PowerDef {
        id: "holy_strike",
        name: "Holy Strike",
        path: PathId::Crusader,
        cost: 15,
        cooldown_seconds: 3,
        effect: PowerEffect::Damage {
            multiplier_percent: 170,
        },
        description: "A radiant blow for 170% damage",
    },
    PowerDef {
        id: "divine_heal",
        name: "Divine Heal",
        path: PathId::Crusader,
        cost: 30,
        cooldown_seconds: 10,
        effect: PowerEffect::Heal { amount: 80 },
        description: "Restore 80 health",
    },
    PowerDef {
        id: "smite_the_wicked",
        name: "Smite the Wicked",
        path: PathId::Crusader,
        cost: 35,
        cooldown_seconds: 8,
        effect: PowerEffect::Drain {
            multiplier_percent: 180,
            heal_percent: 30,
        },
        description: "180% damage, healing for 30% of it",
    },
    PowerDef {
        id: "mark_of_judgment",
        name: "Mark of Judgment",
        path: PathId::Crusader,
        cost: 20,
        cooldown_seconds: 12,
        effect: PowerEffect::ApplyStatus(StatusApplication::new(
            StatusKind::Debuff(StatKind::Armor),
            40,
            4,
        )),
        description: "Strip 40% of the enemy's armor for 4 turns",
    },
    PowerDef {
        id: "weakening_light",
        name: "Weakening Light",
        path: PathId::Crusader,
        cost: 25,
        cooldown_seconds: 10,
        effect: PowerEffect::ApplyStatus(StatusApplication::new(
            StatusKind::Debuff(StatKind::Power),
            30,
            3,
        )),
        description: "Weaken enemy power by 30% for 3 turns",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::paths::PATHS;
    use crate::core::constants::RESOURCE_CAP;

    #[test]
    fn test_every_power_belongs_to_an_active_path_that_lists_it() {
        for power in POWERS {
            let path = PATHS.iter().find(|p| p.id == power.path).unwrap();
            assert!(path.is_active(), "{}", power.id);
            assert!(path.powers.contains(&power.id), "{}", power.id);
        }
    }

    #[test]
    fn test_costs_fit_under_cap() {
        for power in POWERS {
            assert!(power.cost <= RESOURCE_CAP, "{}", power.id);
            assert!(power.cooldown_seconds > 0, "{}", power.id);
        }
    }

    #[test]
    fn test_ids_and_names_differ() {
        for power in POWERS {
            assert_ne!(power.id, power.name);
        }
    }
}
