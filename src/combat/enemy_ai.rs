//! Enemy turn selection.
//!
//! At the start of each enemy turn every ability cooldown drops by one.
//! Abilities are then tried in priority order: a ready ability that is worth
//! using rolls its trigger chance, and the first success is used and put on
//! cooldown. If nothing triggers the enemy makes a basic attack.

use crate::catalog::enemies::AbilityKind;
use crate::combat::status::StatusKind;
use crate::combat::types::Enemy;
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    BasicAttack,
    /// Index into `Enemy::abilities`
    Ability(usize),
}

pub fn tick_ability_cooldowns(enemy: &mut Enemy) {
    for ability in &mut enemy.abilities {
        ability.cooldown_remaining = ability.cooldown_remaining.saturating_sub(1);
    }
}

/// Self-targeted abilities are skipped when they would do nothing.
fn worth_using(enemy: &Enemy, kind: AbilityKind) -> bool {
    match kind {
        AbilityKind::Heal => enemy.health() < enemy.max_health,
        AbilityKind::Shield => enemy.statuses.get(StatusKind::Shield).is_none(),
        AbilityKind::Enrage => enemy
            .statuses
            .effects()
            .iter()
            .all(|e| !matches!(e.kind, StatusKind::Buff(_))),
        AbilityKind::MultiHit | AbilityKind::Poison | AbilityKind::Stun => true,
    }
}

pub fn select_action<R: RandomSource + ?Sized>(enemy: &mut Enemy, rng: &mut R) -> EnemyAction {
    for index in 0..enemy.abilities.len() {
        let ability = enemy.abilities[index];
        if !ability.is_ready() || !worth_using(enemy, ability.def.kind) {
            continue;
        }
        if rng.chance(ability.def.trigger_percent) {
            enemy.abilities[index].cooldown_remaining = ability.def.cooldown_turns;
            return EnemyAction::Ability(index);
        }
    }
    EnemyAction::BasicAttack
}
