//! Static game content: paths, stances, powers and enemies.
//!
//! The engine only ever sees content through a validated [`Catalog`]. Every
//! id reference is checked once in [`Catalog::validate`] so lookups during
//! play can treat a miss as "not offered" instead of an error.

pub mod enemies;
pub mod paths;
pub mod powers;

use std::collections::HashSet;

use crate::core::error::ConfigError;
use enemies::{AbilityDef, EnemyTemplate, ABILITIES, ENEMIES};
use paths::{EnhancementDef, PathDef, PathId, StanceDef, StanceId, ENHANCEMENTS, PATHS, STANCES};
use powers::{PowerDef, POWERS};

#[derive(Debug, Clone)]
pub struct Catalog {
    pub paths: Vec<PathDef>,
    pub stances: Vec<StanceDef>,
    pub enhancements: Vec<EnhancementDef>,
    pub powers: Vec<PowerDef>,
    pub abilities: Vec<AbilityDef>,
    pub enemies: Vec<EnemyTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            paths: PATHS.to_vec(),
            stances: STANCES.to_vec(),
            enhancements: ENHANCEMENTS.to_vec(),
            powers: POWERS.to_vec(),
            abilities: ABILITIES.to_vec(),
            enemies: ENEMIES.to_vec(),
        }
    }

    /// Checks every cross reference. Called before any encounter starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique("power", self.powers.iter().map(|p| p.id))?;
        check_unique("ability", self.abilities.iter().map(|a| a.id))?;
        check_unique("enhancement", self.enhancements.iter().map(|e| e.id))?;
        check_unique("enemy", self.enemies.iter().map(|e| e.id))?;
        check_unique("path", self.paths.iter().map(|p| p.id.key()))?;

        for path in &self.paths {
            for id in path.powers {
                if self.power(id).is_none() {
                    return Err(ConfigError::UnknownPower {
                        owner: path.name.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }

        for stance in &self.stances {
            for id in stance.enhancements {
                if self.enhancement(id).is_none() {
                    return Err(ConfigError::UnknownEnhancement {
                        owner: stance.name.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }

        for enemy in &self.enemies {
            for id in enemy.abilities {
                if self.ability(id).is_none() {
                    return Err(ConfigError::UnknownAbility {
                        owner: enemy.name.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }

        if !self.enemies.iter().any(|e| e.can_spawn(1, false)) {
            return Err(ConfigError::EmptyEnemyPool(1));
        }
        if !self.enemies.iter().any(|e| e.can_spawn(1, true)) {
            return Err(ConfigError::EmptyEnemyPool(1));
        }

        Ok(())
    }

    pub fn path(&self, id: PathId) -> Option<&PathDef> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn stance(&self, id: StanceId) -> Option<&StanceDef> {
        self.stances.iter().find(|s| s.id == id)
    }

    pub fn enhancement(&self, id: &str) -> Option<&EnhancementDef> {
        self.enhancements.iter().find(|e| e.id == id)
    }

    pub fn power(&self, id: &str) -> Option<&PowerDef> {
        self.powers.iter().find(|p| p.id == id)
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Abilities of a template, in priority order.
    pub fn abilities_for(&self, template: &EnemyTemplate) -> Vec<AbilityDef> {
        template
            .abilities
            .iter()
            .filter_map(|id| self.ability(id).copied())
            .collect()
    }

    /// Templates that may spawn in a room on `floor`.
    pub fn spawn_pool(&self, floor: u32, boss_room: bool) -> Vec<&EnemyTemplate> {
        self.enemies
            .iter()
            .filter(|e| e.can_spawn(floor, boss_room))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        Catalog::builtin().validate().unwrap();
    }

    #[test]
    fn test_unknown_ability_rejected() {
        let mut catalog = Catalog::builtin();
        catalog.enemies[0].abilities = &["raw_ability_id"];
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAbility { ref id, .. } if id == "raw_ability_id"));
    }

    #[test]
    fn test_unknown_power_rejected() {
        let mut catalog = Catalog::builtin();
        catalog.powers.retain(|p| p.id != "fireball");
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPower { ref id, .. } if id == "fireball"));
    }

    #[test]
    fn test_unknown_enhancement_rejected() {
        let mut catalog = Catalog::builtin();
        catalog.enhancements.retain(|e| e.id != "thorns");
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::UnknownEnhancement { .. })
        ));
    }

    #[test]
    fn test_duplicate_power_rejected() {
        let mut catalog = Catalog::builtin();
        let copy = catalog.powers[0];
        catalog.powers.push(copy);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::DuplicateId { kind: "power", .. })
        ));
    }

    #[test]
    fn test_missing_boss_pool_rejected() {
        let mut catalog = Catalog::builtin();
        catalog.enemies.retain(|e| !e.is_boss);
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::EmptyEnemyPool(1))
        ));
    }

    #[test]
    fn test_spawn_pool_respects_floor_and_room() {
        let catalog = Catalog::builtin();
        let regular = catalog.spawn_pool(1, false);
        assert!(regular.iter().all(|e| !e.is_boss && e.min_floor <= 1));
        let bosses = catalog.spawn_pool(4, true);
        assert!(bosses.iter().any(|e| e.id == "bone_lich"));
    }
}
