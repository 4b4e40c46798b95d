//! Equipped items as seen by the combat engine.
//!
//! The shop decides what gets bought; the engine only reads the resulting
//! stat bonuses and on-hit procs.

use serde::{Deserialize, Serialize};

use crate::character::stats::{PercentBlock, StatBlock};
use crate::combat::status::StatusApplication;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 3] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Armor,
        EquipmentSlot::Accessory,
    ];
}

/// What an item does when its proc fires on a landed basic attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemProc {
    /// Applied to the enemy
    ApplyStatus(StatusApplication),
    /// Heals the wearer
    Heal(u32),
    /// Extra damage to the enemy, ignores armor
    BonusDamage(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredEffect {
    pub chance_percent: u32,
    pub proc: ItemProc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub flat: StatBlock,
    #[serde(default)]
    pub percent: PercentBlock,
    #[serde(default)]
    pub health_bonus: u32,
    #[serde(default)]
    pub trigger: Option<TriggeredEffect>,
}

impl Item {
    pub fn new(name: impl Into<String>, slot: EquipmentSlot) -> Self {
        Self {
            name: name.into(),
            slot,
            flat: StatBlock::default(),
            percent: PercentBlock::default(),
            health_bonus: 0,
            trigger: None,
        }
    }

    pub fn with_flat(mut self, flat: StatBlock) -> Self {
        self.flat = flat;
        self
    }

    pub fn with_percent(mut self, percent: PercentBlock) -> Self {
        self.percent = percent;
        self
    }

    pub fn with_health(mut self, health_bonus: u32) -> Self {
        self.health_bonus = health_bonus;
        self
    }

    pub fn with_trigger(mut self, chance_percent: u32, proc: ItemProc) -> Self {
        self.trigger = Some(TriggeredEffect {
            chance_percent,
            proc,
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    /// Puts the item in its slot, returning whatever was there.
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        let slot = match item.slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        };
        slot.replace(item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.take(),
            EquipmentSlot::Armor => self.armor.take(),
            EquipmentSlot::Accessory => self.accessory.take(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|slot| slot.as_ref())
    }

    pub fn flat_bonus(&self) -> StatBlock {
        let mut total = StatBlock::default();
        for item in self.iter() {
            total.add(&item.flat);
        }
        total
    }

    pub fn percent_bonus(&self) -> PercentBlock {
        let mut total = PercentBlock::default();
        for item in self.iter() {
            total.add(&item.percent);
        }
        total
    }

    pub fn health_bonus(&self) -> u32 {
        self.iter()
            .fold(0u32, |total, item| total.saturating_add(item.health_bonus))
    }

    pub fn triggers(&self) -> impl Iterator<Item = (&str, TriggeredEffect)> {
        self.iter()
            .filter_map(|item| item.trigger.map(|t| (item.name.as_str(), t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::StatusKind;

    #[test]
    fn test_equip_replaces_same_slot() {
        let mut equipment = Equipment::new();
        assert!(equipment.equip(Item::new("Rusty Sword", EquipmentSlot::Weapon)).is_none());
        let previous = equipment.equip(Item::new("Steel Sword", EquipmentSlot::Weapon));
        assert_eq!(previous.unwrap().name, "Rusty Sword");
        assert_eq!(
            equipment.get(EquipmentSlot::Weapon).unwrap().name,
            "Steel Sword"
        );
    }

    #[test]
    fn test_bonuses_sum_across_slots() {
        let mut equipment = Equipment::new();
        equipment.equip(
            Item::new("Axe", EquipmentSlot::Weapon)
                .with_flat(StatBlock::new(5, 0, 0, 0))
                .with_percent(PercentBlock::new(10, 0, 0, 0)),
        );
        equipment.equip(
            Item::new("Mail", EquipmentSlot::Armor)
                .with_flat(StatBlock::new(0, 4, 0, 0))
                .with_health(25),
        );
        equipment.equip(
            Item::new("Charm", EquipmentSlot::Accessory)
                .with_percent(PercentBlock::new(5, 0, 0, 20))
                .with_health(5),
        );

        assert_eq!(equipment.flat_bonus(), StatBlock::new(5, 4, 0, 0));
        assert_eq!(equipment.percent_bonus(), PercentBlock::new(15, 0, 0, 20));
        assert_eq!(equipment.health_bonus(), 30);
    }

    #[test]
    fn test_triggers_listed_with_item_name() {
        let mut equipment = Equipment::new();
        equipment.equip(Item::new("Venom Dagger", EquipmentSlot::Weapon).with_trigger(
            20,
            ItemProc::ApplyStatus(StatusApplication::new(StatusKind::Poison, 3, 3)),
        ));
        equipment.equip(Item::new("Plain Ring", EquipmentSlot::Accessory));

        let triggers: Vec<_> = equipment.triggers().collect();
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].0, "Venom Dagger");
        assert_eq!(triggers[0].1.chance_percent, 20);
    }

    #[test]
    fn test_item_deserializes_with_defaults() {
        let item: Item = serde_json::from_str(r#"{ "name": "Cap", "slot": "armor" }"#).unwrap();
        assert_eq!(item.slot, EquipmentSlot::Armor);
        assert_eq!(item.health_bonus, 0);
        assert!(item.trigger.is_none());
    }
}
