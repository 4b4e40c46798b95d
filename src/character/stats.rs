use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// The four base stats every actor carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Power,
    Armor,
    Speed,
    Fortune,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::Power,
        StatKind::Armor,
        StatKind::Speed,
        StatKind::Fortune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Power => "Power",
            StatKind::Armor => "Armor",
            StatKind::Speed => "Speed",
            StatKind::Fortune => "Fortune",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub power: u32,
    pub armor: u32,
    pub speed: u32,
    pub fortune: u32,
}

impl StatBlock {
    pub const fn new(power: u32, armor: u32, speed: u32, fortune: u32) -> Self {
        Self {
            power,
            armor,
            speed,
            fortune,
        }
    }

    pub fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Power => self.power,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::Fortune => self.fortune,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut u32 {
        match stat {
            StatKind::Power => &mut self.power,
            StatKind::Armor => &mut self.armor,
            StatKind::Speed => &mut self.speed,
            StatKind::Fortune => &mut self.fortune,
        }
    }

    pub fn add(&mut self, other: &StatBlock) {
        for stat in StatKind::ALL {
            let value = self.get_mut(stat);
            *value = value.saturating_add(other.get(stat));
        }
    }
}

/// Signed percent modifiers (buffs, debuffs, stance and item bonuses).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentBlock {
    pub power: i32,
    pub armor: i32,
    pub speed: i32,
    pub fortune: i32,
}

impl PercentBlock {
    pub const fn new(power: i32, armor: i32, speed: i32, fortune: i32) -> Self {
        Self {
            power,
            armor,
            speed,
            fortune,
        }
    }

    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Power => self.power,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::Fortune => self.fortune,
        }
    }

    pub fn adjust(&mut self, stat: StatKind, delta: i32) {
        let value = match stat {
            StatKind::Power => &mut self.power,
            StatKind::Armor => &mut self.armor,
            StatKind::Speed => &mut self.speed,
            StatKind::Fortune => &mut self.fortune,
        };
        *value = value.saturating_add(delta);
    }

    pub fn add(&mut self, other: &PercentBlock) {
        for stat in StatKind::ALL {
            self.adjust(stat, other.get(stat));
        }
    }
}

/// Flat chance bonuses layered on top of the fortune-derived values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChanceBonuses {
    pub crit_percent: u32,
    pub dodge_percent: u32,
}

/// Stats after equipment, buffs and stance bonuses, plus the values derived
/// from fortune. Recomputed whenever needed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveStats {
    pub power: u32,
    pub armor: u32,
    pub speed: u32,
    pub fortune: u32,
    pub crit_chance_percent: u32,
    pub crit_multiplier_percent: u32,
    pub dodge_chance_percent: u32,
}

impl EffectiveStats {
    /// `(base + flat) * (100 + percent) / 100` per stat, then fortune-derived
    /// chances. Percent totals below -100 floor the stat at zero.
    pub fn derive(
        base: &StatBlock,
        flat: &StatBlock,
        percent: &PercentBlock,
        bonuses: ChanceBonuses,
    ) -> Self {
        let scale = |stat: StatKind| -> u32 {
            let raw = base.get(stat).saturating_add(flat.get(stat)) as i64;
            let factor = (100 + percent.get(stat) as i64).max(0);
            (raw.saturating_mul(factor) / 100).min(u32::MAX as i64) as u32
        };

        let power = scale(StatKind::Power);
        let armor = scale(StatKind::Armor);
        let speed = scale(StatKind::Speed).max(MIN_EFFECTIVE_SPEED);
        let fortune = scale(StatKind::Fortune);

        // Crit chance = base + fortune / 2, capped
        let crit_chance_percent = BASE_CRIT_CHANCE_PERCENT
            .saturating_add(fortune / FORTUNE_PER_CRIT_PERCENT)
            .saturating_add(bonuses.crit_percent)
            .min(MAX_CRIT_CHANCE_PERCENT);

        // Dodge chance = fortune / 3, capped
        let dodge_chance_percent = (fortune / FORTUNE_PER_DODGE_PERCENT)
            .saturating_add(bonuses.dodge_percent)
            .min(MAX_DODGE_CHANCE_PERCENT);

        // Crit damage = 150% + 1% per fortune point, capped
        let crit_multiplier_percent = BASE_CRIT_MULTIPLIER_PERCENT
            .saturating_add(fortune)
            .min(MAX_CRIT_MULTIPLIER_PERCENT);

        Self {
            power,
            armor,
            speed,
            fortune,
            crit_chance_percent,
            crit_multiplier_percent,
            dodge_chance_percent,
        }
    }

    /// Effective stats with no modifiers at all.
    pub fn from_base(base: &StatBlock) -> Self {
        Self::derive(
            base,
            &StatBlock::default(),
            &PercentBlock::default(),
            ChanceBonuses::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base_derives_fortune_chances() {
        let stats = EffectiveStats::from_base(&StatBlock::new(10, 5, 10, 12));
        assert_eq!(stats.power, 10);
        assert_eq!(stats.crit_chance_percent, BASE_CRIT_CHANCE_PERCENT + 6);
        assert_eq!(stats.dodge_chance_percent, 4);
        assert_eq!(stats.crit_multiplier_percent, 162);
    }

    #[test]
    fn test_flat_then_percent() {
        let stats = EffectiveStats::derive(
            &StatBlock::new(10, 0, 10, 0),
            &StatBlock::new(10, 0, 0, 0),
            &PercentBlock::new(50, 0, 0, 0),
            ChanceBonuses::default(),
        );
        assert_eq!(stats.power, 30);
    }

    #[test]
    fn test_heavy_debuff_floors_at_zero_and_speed_at_minimum() {
        let stats = EffectiveStats::derive(
            &StatBlock::new(10, 10, 10, 10),
            &StatBlock::default(),
            &PercentBlock::new(-150, -100, -200, 0),
            ChanceBonuses::default(),
        );
        assert_eq!(stats.power, 0);
        assert_eq!(stats.armor, 0);
        assert_eq!(stats.speed, MIN_EFFECTIVE_SPEED);
    }

    #[test]
    fn test_chances_are_capped() {
        let stats = EffectiveStats::derive(
            &StatBlock::new(1, 1, 1, 1000),
            &StatBlock::default(),
            &PercentBlock::default(),
            ChanceBonuses {
                crit_percent: 50,
                dodge_percent: 50,
            },
        );
        assert_eq!(stats.crit_chance_percent, MAX_CRIT_CHANCE_PERCENT);
        assert_eq!(stats.dodge_chance_percent, MAX_DODGE_CHANCE_PERCENT);
        assert_eq!(stats.crit_multiplier_percent, MAX_CRIT_MULTIPLIER_PERCENT);
    }

    #[test]
    fn test_extreme_stats_saturate() {
        let stats = EffectiveStats::derive(
            &StatBlock::new(u32::MAX, 0, 10, u32::MAX),
            &StatBlock::new(u32::MAX, 0, 0, u32::MAX),
            &PercentBlock::new(i32::MAX, 0, 0, i32::MAX),
            ChanceBonuses {
                crit_percent: u32::MAX,
                dodge_percent: u32::MAX,
            },
        );
        assert_eq!(stats.power, u32::MAX);
        assert_eq!(stats.fortune, u32::MAX);
        assert_eq!(stats.crit_chance_percent, MAX_CRIT_CHANCE_PERCENT);
        assert_eq!(stats.dodge_chance_percent, MAX_DODGE_CHANCE_PERCENT);
        assert_eq!(stats.crit_multiplier_percent, MAX_CRIT_MULTIPLIER_PERCENT);
    }
}
