//! Read-only view of an encounter for the renderer and test tooling.
//!
//! All counters are whole numbers: cooldowns are reported in seconds rounded
//! up, status durations in turns.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::character::player::xp_for_next_level;
use crate::character::resource::ResourceType;
use crate::character::stats::EffectiveStats;
use crate::combat::log::CombatLogEntry;
use crate::combat::status::StatusTracker;
use crate::core::encounter::EncounterState;
use crate::core::phase::BattlePhase;
use crate::core::progression::PendingChoice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceBar {
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub label: String,
    pub magnitude: u32,
    pub remaining_turns: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerView {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub cost: u32,
    pub cooldown_remaining_seconds: u32,
    /// Off cooldown and affordable
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub gold: u64,
    pub health: u32,
    pub max_health: u32,
    pub stats: EffectiveStats,
    pub path: Option<String>,
    pub stance: Option<String>,
    pub attack_progress: f64,
    pub statuses: Vec<StatusView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub name: String,
    pub is_boss: bool,
    pub is_dying: bool,
    pub health: u32,
    pub max_health: u32,
    pub attack_progress: f64,
    pub statuses: Vec<StatusView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterSnapshot {
    pub phase: BattlePhase,
    pub floor: u32,
    pub room: u32,
    pub rooms_per_floor: u32,
    pub paused: bool,
    pub combat_speed: u32,
    pub player: PlayerView,
    pub enemy: Option<EnemyView>,
    /// Keyed by resource type key, e.g. `fury`
    pub resources: BTreeMap<String, ResourceBar>,
    pub powers: Vec<PowerView>,
    pub pending_choice: Option<PendingChoice>,
    pub log: Vec<CombatLogEntry>,
}

fn status_views(statuses: &StatusTracker) -> Vec<StatusView> {
    statuses
        .effects()
        .iter()
        .map(|e| StatusView {
            label: e.kind.label(),
            magnitude: e.magnitude,
            remaining_turns: e.remaining_turns,
        })
        .collect()
}

impl EncounterSnapshot {
    pub fn capture(state: &EncounterState, catalog: &Catalog) -> Self {
        let player = &state.player;

        let resources = player
            .resource
            .iter()
            .map(|r| {
                (
                    r.kind().key().to_string(),
                    ResourceBar {
                        current: r.current(),
                        max: r.max(),
                    },
                )
            })
            .collect();

        let available = player.resource.as_ref().map_or(0, |r| r.current());
        let powers = player
            .powers()
            .iter()
            .filter_map(|learned| {
                let def = catalog.power(&learned.id)?;
                let cooldown = state.cooldowns.remaining_seconds(def.id);
                Some(PowerView {
                    id: def.id.to_string(),
                    name: def.name.to_string(),
                    tier: learned.tier,
                    cost: def.cost,
                    cooldown_remaining_seconds: cooldown,
                    ready: cooldown == 0 && available >= def.cost,
                })
            })
            .collect();

        let path = player.path.and_then(|id| catalog.path(id));
        let stance = player
            .stance
            .as_ref()
            .and_then(|s| catalog.stance(s.active))
            .map(|s| s.name.to_string());

        Self {
            phase: state.phase(),
            floor: state.floor,
            room: state.room,
            rooms_per_floor: state.rooms_per_floor,
            paused: state.paused,
            combat_speed: state.combat_speed.multiplier(),
            player: PlayerView {
                name: player.name.clone(),
                class: player.class.name().to_string(),
                level: player.level,
                xp: player.xp,
                xp_to_next: xp_for_next_level(player.level),
                gold: player.gold,
                health: player.health(),
                max_health: player.max_health(),
                stats: player.effective_stats(catalog),
                path: path.map(|p| p.name.to_string()),
                stance,
                attack_progress: player.timer.fraction(),
                statuses: status_views(&player.statuses),
            },
            enemy: state.enemy.as_ref().map(|enemy| EnemyView {
                name: enemy.name.clone(),
                is_boss: enemy.is_boss,
                is_dying: enemy.is_dying,
                health: enemy.health(),
                max_health: enemy.max_health,
                attack_progress: enemy.timer.fraction(),
                statuses: status_views(&enemy.statuses),
            }),
            resources,
            powers,
            pending_choice: state.progression.pending().cloned(),
            log: state.log.entries().cloned().collect(),
        }
    }

    /// `current`/`max` for a resource type, if the player has it.
    pub fn resource_bar(&self, kind: ResourceType) -> Option<&ResourceBar> {
        self.resources.get(kind.key())
    }

    /// Whole seconds of cooldown left on a learned power.
    pub fn power_cooldown(&self, id: &str) -> Option<u32> {
        self.powers
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.cooldown_remaining_seconds)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
