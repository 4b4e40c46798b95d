//! Structured combat events and their human-readable log lines.
//!
//! Log lines only ever use display names. Power and ability ids travel on
//! the event for animation lookups but are never formatted.

use std::collections::VecDeque;

use serde::Serialize;

use crate::combat::status::StatusKind;
use crate::combat::types::Actor;
use crate::core::constants::COMBAT_LOG_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatAction {
    BasicAttack,
    Power { id: String, name: String },
    Ability { id: String, name: String },
    ItemProc { item: String },
    Reflect,
    /// Periodic damage and healing at a turn boundary
    StatusTick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatEvent {
    pub actor: Actor,
    pub actor_name: String,
    pub target_name: String,
    pub action: CombatAction,
    pub damage: u32,
    pub healed: u32,
    pub crit: bool,
    pub dodged: bool,
    pub blocked: bool,
    /// Statuses applied by this action
    pub statuses: Vec<StatusKind>,
}

impl CombatEvent {
    pub fn new(
        actor: Actor,
        actor_name: impl Into<String>,
        target_name: impl Into<String>,
        action: CombatAction,
    ) -> Self {
        Self {
            actor,
            actor_name: actor_name.into(),
            target_name: target_name.into(),
            action,
            damage: 0,
            healed: 0,
            crit: false,
            dodged: false,
            blocked: false,
            statuses: Vec::new(),
        }
    }
}

fn status_list(statuses: &[StatusKind]) -> String {
    statuses
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Appends the shared damage/heal/status tail to a message.
fn describe_effects(message: &mut String, event: &CombatEvent) {
    if event.dodged {
        message.push_str(&format!(", but {} dodges", event.target_name));
    } else if event.damage > 0 {
        message.push_str(&format!(
            " on {} for {} damage",
            event.target_name, event.damage
        ));
    }
    if event.healed > 0 {
        message.push_str(&format!(", restoring {} health", event.healed));
    }
    if !event.statuses.is_empty() {
        message.push_str(&format!(" ({})", status_list(&event.statuses)));
    }
    if event.crit && !event.dodged {
        message.push_str(" CRITICAL!");
    }
    if event.blocked && !event.dodged {
        message.push_str(" [blocked]");
    }
}

pub fn format_event(event: &CombatEvent) -> String {
    match &event.action {
        CombatAction::BasicAttack => {
            if event.dodged {
                return format!("{} dodges {}'s attack", event.target_name, event.actor_name);
            }
            let mut message = format!(
                "{} hits {} for {} damage",
                event.actor_name, event.target_name, event.damage
            );
            if event.healed > 0 {
                message.push_str(&format!(", restoring {} health", event.healed));
            }
            if !event.statuses.is_empty() {
                message.push_str(&format!(" ({})", status_list(&event.statuses)));
            }
            if event.crit {
                message.push_str(" CRITICAL!");
            }
            if event.blocked {
                message.push_str(" [blocked]");
            }
            message
        }
        CombatAction::Power { name, .. } | CombatAction::Ability { name, .. } => {
            let mut message = format!("{} uses {}", event.actor_name, name);
            describe_effects(&mut message, event);
            message
        }
        CombatAction::ItemProc { item } => {
            let mut message = format!("{}'s {} triggers", event.actor_name, item);
            describe_effects(&mut message, event);
            message
        }
        CombatAction::Reflect => format!(
            "{} takes {} reflected damage",
            event.target_name, event.damage
        ),
        CombatAction::StatusTick => {
            let mut parts = Vec::new();
            if event.damage > 0 {
                parts.push(format!("suffers {} from lingering effects", event.damage));
            }
            if event.healed > 0 {
                parts.push(format!("regenerates {} health", event.healed));
            }
            format!("{} {}", event.actor_name, parts.join(" and "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatLogEntry {
    pub message: String,
    pub is_crit: bool,
    pub is_player_action: bool,
}

/// Bounded history of formatted combat lines, oldest first.
#[derive(Debug, Clone)]
pub struct CombatLog {
    entries: VecDeque<CombatLogEntry>,
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(COMBAT_LOG_CAPACITY),
        }
    }

    pub fn push(&mut self, message: String, is_crit: bool, is_player_action: bool) {
        if self.entries.len() >= COMBAT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(CombatLogEntry {
            message,
            is_crit,
            is_player_action,
        });
    }

    pub fn record(&mut self, event: &CombatEvent) {
        self.push(
            format_event(event),
            event.crit,
            event.actor == Actor::Player,
        );
    }

    pub fn entries(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ability_event() -> CombatEvent {
        let mut event = CombatEvent::new(
            Actor::Enemy,
            "Cave Spider",
            "Hero",
            CombatAction::Ability {
                id: "venom_spit".to_string(),
                name: "Venom Spit".to_string(),
            },
        );
        event.damage = 7;
        event.statuses.push(StatusKind::Poison);
        event
    }

    #[test]
    fn test_ability_uses_display_name_only() {
        let message = format_event(&ability_event());
        assert_eq!(message, "Cave Spider uses Venom Spit on Hero for 7 damage (Poison)");
        assert!(!message.contains("venom_spit"));
    }

    #[test]
    fn test_basic_attack_lines() {
        let mut event = CombatEvent::new(Actor::Player, "Hero", "Goblin", CombatAction::BasicAttack);
        event.damage = 12;
        event.crit = true;
        assert_eq!(format_event(&event), "Hero hits Goblin for 12 damage CRITICAL!");

        event.dodged = true;
        event.damage = 0;
        assert_eq!(format_event(&event), "Goblin dodges Hero's attack");
    }

    #[test]
    fn test_dodged_power_line() {
        let mut event = CombatEvent::new(
            Actor::Player,
            "Hero",
            "Goblin",
            CombatAction::Power {
                id: "holy_strike".to_string(),
                name: "Holy Strike".to_string(),
            },
        );
        event.dodged = true;
        assert_eq!(format_event(&event), "Hero uses Holy Strike, but Goblin dodges");
    }

    #[test]
    fn test_status_tick_line() {
        let mut event = CombatEvent::new(Actor::Player, "Hero", "Hero", CombatAction::StatusTick);
        event.damage = 4;
        event.healed = 3;
        assert_eq!(
            format_event(&event),
            "Hero suffers 4 from lingering effects and regenerates 3 health"
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = CombatLog::new();
        for i in 0..(COMBAT_LOG_CAPACITY + 5) {
            log.push(format!("line {i}"), false, true);
        }
        assert_eq!(log.len(), COMBAT_LOG_CAPACITY);
        assert_eq!(log.messages()[0], "line 5");
    }

    #[test]
    fn test_record_marks_player_actions() {
        let mut log = CombatLog::new();
        log.record(&ability_event());
        let entry = log.entries().next().unwrap();
        assert!(!entry.is_player_action);
        assert!(!entry.is_crit);
    }
}
