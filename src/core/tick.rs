//! The per-tick orchestration.
//!
//! [`advance_tick`] processes one simulation tick of an [`EncounterState`]
//! and returns a [`TickResult`] describing what happened, so the rendering
//! collaborator can animate and log without the engine knowing about it.
//!
//! Within a combat tick the hero always resolves before the enemy. Status
//! effects tick at their owner's own turn boundary, not globally.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::enemies::{AbilityKind, MULTI_HIT_DAMAGE_PERCENT};
use crate::catalog::Catalog;
use crate::character::equipment::ItemProc;
use crate::character::resource::ResourceEvent;
use crate::character::stats::StatKind;
use crate::combat::enemy_ai::{select_action, tick_ability_cooldowns, EnemyAction};
use crate::combat::log::{CombatAction, CombatEvent};
use crate::combat::powers::percent_of;
use crate::combat::resolver::{resolve_strike, StrikeOutcome};
use crate::combat::scheduler::TimerStep;
use crate::combat::status::{ApplyOutcome, StatusApplication, StatusKind};
use crate::combat::types::{Actor, Enemy};
use crate::core::encounter::EncounterState;
use crate::core::phase::BattlePhase;
use crate::core::progression::ChoiceKind;
use crate::core::rng::RandomSource;

/// A single event produced by a tick or an action.
///
/// The rendering collaborator maps these to animations and UI state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TickEvent {
    // ── Combat ──────────────────────────────────────────────────
    /// An attack, power, ability, proc or status tick resolved.
    Combat(CombatEvent),

    /// A stunned actor lost its turn.
    TurnSkipped { actor: Actor },

    /// A status effect ran out.
    StatusExpired { actor: Actor, kind: StatusKind },

    /// A player power or the stance switch came off cooldown.
    CooldownReady { id: String },

    // ── Encounter flow ──────────────────────────────────────────
    PhaseChanged { from: BattlePhase, to: BattlePhase },

    EnemySpawned { name: String, is_boss: bool },

    /// Rewards have already been credited.
    EnemyDefeated { name: String, xp: u64, gold: u64 },

    PlayerDefeated,

    FloorCompleted { floor: u32 },

    // ── Progression ─────────────────────────────────────────────
    LeveledUp { level: u32 },

    /// Combat is frozen until the choice is resolved.
    ChoiceOffered { kind: ChoiceKind },
}

/// Everything that happened during one tick, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickResult {
    pub events: Vec<TickEvent>,
}

impl TickResult {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn combat_events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter_map(|e| match e {
            TickEvent::Combat(event) => Some(event),
            _ => None,
        })
    }

    fn push(&mut self, event: TickEvent) {
        self.events.push(event);
    }
}

/// Advances the encounter by one tick.
///
/// Nothing moves while paused or while a choice is pending. Dying phases
/// wait for an acknowledgment; defeat and floor-complete wait for an action.
pub fn advance_tick<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
) -> TickResult {
    let mut result = TickResult::default();
    if state.paused || state.progression.has_pending() {
        return result;
    }
    state.tick_count += 1;
    let elapsed = state.combat_speed.multiplier();

    match state.phase() {
        BattlePhase::Entering => {
            if state.phase.tick_entering(elapsed) {
                change_phase(state, BattlePhase::Combat, &mut result);
            }
        }
        BattlePhase::Combat => combat_tick(state, catalog, rng, elapsed, &mut result),
        BattlePhase::Transitioning => advance_room(state, catalog, rng, &mut result),
        BattlePhase::EnemyDying
        | BattlePhase::PlayerDying
        | BattlePhase::Defeat
        | BattlePhase::FloorComplete => {}
    }

    result
}

pub(crate) fn change_phase(
    state: &mut EncounterState,
    next: BattlePhase,
    result: &mut TickResult,
) -> bool {
    match state.phase.transition(next) {
        Ok(from) => {
            info!(%from, to = %next, floor = state.floor, room = state.room, "phase changed");
            result.push(TickEvent::PhaseChanged { from, to: next });
            true
        }
        Err(err) => {
            warn!(%err, "phase transition refused");
            false
        }
    }
}

/// Spawns the enemy for the current room. The last room of a floor draws
/// from the boss pool.
pub(crate) fn spawn_enemy<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    let boss_room = state.is_boss_room();
    let pool = catalog.spawn_pool(state.floor, boss_room);
    if pool.is_empty() {
        warn!(floor = state.floor, boss_room, "no enemy can spawn");
        state.enemy = None;
        return;
    }
    let template = *pool[rng.pick_index(pool.len()).min(pool.len() - 1)];
    let enemy = Enemy::from_template(&template, state.floor, catalog.abilities_for(&template));
    debug!(enemy = %enemy.name, floor = state.floor, room = state.room, "enemy spawned");
    result.push(TickEvent::EnemySpawned {
        name: enemy.name.clone(),
        is_boss: enemy.is_boss,
    });
    state.enemy = Some(enemy);
}

fn advance_room<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    if state.room >= state.rooms_per_floor {
        if change_phase(state, BattlePhase::FloorComplete, result) {
            info!(floor = state.floor, "floor complete");
            result.push(TickEvent::FloorCompleted { floor: state.floor });
        }
        return;
    }
    state.room += 1;
    if change_phase(state, BattlePhase::Entering, result) {
        spawn_enemy(state, catalog, rng, result);
    }
}

fn record(state: &mut EncounterState, event: CombatEvent, result: &mut TickResult) {
    state.log.record(&event);
    result.push(TickEvent::Combat(event));
}

fn combat_tick<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    elapsed: u32,
    result: &mut TickResult,
) {
    // ── 1. Passive resource drip and cooldowns ──────────────────
    if let Some(resource) = state.player.resource.as_mut() {
        for _ in 0..elapsed {
            resource.on_event(ResourceEvent::CombatTick);
        }
    }
    for id in state.cooldowns.tick(elapsed) {
        result.push(TickEvent::CooldownReady { id });
    }

    // ── 2. Hero ─────────────────────────────────────────────────
    hero_step(state, catalog, rng, result);
    resolve_deaths(state, catalog, rng, result);
    if !state.phase.is(BattlePhase::Combat) {
        return;
    }

    // ── 3. Enemy ────────────────────────────────────────────────
    enemy_step(state, catalog, rng, result);
    resolve_deaths(state, catalog, rng, result);
}

fn hero_step<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    let speed = state.player.effective_stats(catalog).speed;
    let stunned = state.player.statuses.is_stunned();
    match state.player.timer.advance(speed, state.combat_speed, stunned) {
        TimerStep::Waiting => {}
        TimerStep::SkippedTurn => {
            player_turn_boundary(state, catalog, result);
            debug!("player turn skipped");
            result.push(TickEvent::TurnSkipped {
                actor: Actor::Player,
            });
        }
        TimerStep::Attack => {
            player_turn_boundary(state, catalog, result);
            if state.player.is_alive() {
                player_attack(state, catalog, rng, result);
            }
        }
    }
}

fn player_turn_boundary(state: &mut EncounterState, catalog: &Catalog, result: &mut TickResult) {
    let regen = state.player.stance_bonus(catalog).regen_per_turn;
    let tick = state.player.statuses.tick_turn();
    let damage = state.player.take_damage(tick.damage, state.invincible);
    let healed = if state.player.is_alive() {
        state.player.heal(tick.healing.saturating_add(regen))
    } else {
        0
    };

    if damage > 0 || healed > 0 {
        let name = state.player.name.clone();
        let mut event = CombatEvent::new(Actor::Player, name.clone(), name, CombatAction::StatusTick);
        event.damage = damage;
        event.healed = healed;
        record(state, event, result);
    }
    for kind in tick.expired {
        result.push(TickEvent::StatusExpired {
            actor: Actor::Player,
            kind,
        });
    }
}

fn player_attack<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    let Some(enemy) = state.enemy.as_mut() else {
        return;
    };
    let player = &mut state.player;
    let player_stats = player.effective_stats(catalog);
    let stance = player.stance_bonus(catalog);
    let stance_name = player
        .stance
        .as_ref()
        .and_then(|s| catalog.stance(s.active))
        .map_or("", |s| s.name);

    let strike = resolve_strike(
        &player_stats,
        &enemy.effective_stats(),
        enemy.statuses.shield_percent(),
        100,
        rng,
    );

    let mut event = CombatEvent::new(
        Actor::Player,
        player.name.clone(),
        enemy.name.clone(),
        CombatAction::BasicAttack,
    );
    event.dodged = strike.dodged;
    event.crit = strike.crit;
    event.blocked = strike.blocked;

    let mut procs = Vec::new();
    if strike.landed() {
        let dealt = enemy.take_damage(strike.damage);
        event.damage = dealt;
        if let Some(resource) = player.resource.as_mut() {
            resource.on_event(ResourceEvent::HitDealt { crit: strike.crit });
        }
        if stance.lifesteal_percent > 0 {
            event.healed = player.heal(percent_of(dealt, stance.lifesteal_percent));
        }
        if let Some(application) = stance.on_hit {
            if enemy.is_alive() && enemy.statuses.apply(application, stance_name) != ApplyOutcome::Ignored {
                event.statuses.push(application.kind);
            }
        }

        let triggers: Vec<_> = player
            .equipment
            .triggers()
            .map(|(item, trigger)| (item.to_string(), trigger))
            .collect();
        for (item, trigger) in triggers {
            if !enemy.is_alive() || !rng.chance(trigger.chance_percent) {
                continue;
            }
            let mut proc_event = CombatEvent::new(
                Actor::Player,
                player.name.clone(),
                enemy.name.clone(),
                CombatAction::ItemProc { item: item.clone() },
            );
            match trigger.proc {
                ItemProc::ApplyStatus(application) => {
                    if enemy.statuses.apply(application, &item) != ApplyOutcome::Ignored {
                        proc_event.statuses.push(application.kind);
                    }
                }
                ItemProc::Heal(amount) => proc_event.healed = player.heal(amount),
                ItemProc::BonusDamage(amount) => proc_event.damage = enemy.take_damage(amount),
            }
            if proc_event.damage > 0 || proc_event.healed > 0 || !proc_event.statuses.is_empty() {
                procs.push(proc_event);
            }
        }
    }

    debug!(damage = event.damage, crit = event.crit, dodged = event.dodged, "player attack");
    record(state, event, result);
    for proc_event in procs {
        record(state, proc_event, result);
    }
}

fn enemy_step<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    let Some(enemy) = state.enemy.as_mut() else {
        return;
    };
    let speed = enemy.effective_stats().speed;
    let stunned = enemy.statuses.is_stunned();
    match enemy.timer.advance(speed, state.combat_speed, stunned) {
        TimerStep::Waiting => return,
        TimerStep::SkippedTurn => {
            enemy_turn_boundary(state, result);
            debug!("enemy turn skipped");
            result.push(TickEvent::TurnSkipped { actor: Actor::Enemy });
            return;
        }
        TimerStep::Attack => enemy_turn_boundary(state, result),
    }

    let Some(enemy) = state.enemy.as_mut() else {
        return;
    };
    if !enemy.is_alive() {
        return;
    }
    tick_ability_cooldowns(enemy);
    match select_action(enemy, rng) {
        EnemyAction::BasicAttack => {
            enemy_strike(state, catalog, rng, 100, CombatAction::BasicAttack, None, result);
        }
        EnemyAction::Ability(index) => enemy_ability(state, catalog, rng, index, result),
    }
}

fn enemy_turn_boundary(state: &mut EncounterState, result: &mut TickResult) {
    let Some(enemy) = state.enemy.as_mut() else {
        return;
    };
    let tick = enemy.statuses.tick_turn();
    let damage = enemy.take_damage(tick.damage);
    let healed = if enemy.is_alive() {
        enemy.heal(tick.healing)
    } else {
        0
    };

    if damage > 0 || healed > 0 {
        let name = enemy.name.clone();
        let mut event = CombatEvent::new(Actor::Enemy, name.clone(), name, CombatAction::StatusTick);
        event.damage = damage;
        event.healed = healed;
        record(state, event, result);
    }
    for kind in tick.expired {
        result.push(TickEvent::StatusExpired {
            actor: Actor::Enemy,
            kind,
        });
    }
}

fn enemy_ability<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    index: usize,
    result: &mut TickResult,
) {
    let Some(enemy) = state.enemy.as_mut() else {
        return;
    };
    let Some(ability) = enemy.abilities.get(index).map(|a| a.def) else {
        return;
    };
    let action = CombatAction::Ability {
        id: ability.id.to_string(),
        name: ability.name.to_string(),
    };
    debug!(enemy = %enemy.name, ability = ability.id, "enemy ability");

    match ability.kind {
        AbilityKind::MultiHit => {
            for _ in 0..ability.magnitude.max(1) {
                let enemy_alive = state.enemy.as_ref().is_some_and(|e| e.is_alive());
                if !enemy_alive || !state.player.is_alive() {
                    break;
                }
                enemy_strike(
                    state,
                    catalog,
                    rng,
                    MULTI_HIT_DAMAGE_PERCENT,
                    action.clone(),
                    None,
                    result,
                );
            }
        }
        AbilityKind::Poison => {
            let poison = StatusApplication::new(StatusKind::Poison, ability.magnitude, ability.turns);
            enemy_strike(state, catalog, rng, 100, action, Some(poison), result);
        }
        AbilityKind::Stun => {
            let stun = StatusApplication::new(StatusKind::Stun, ability.magnitude, ability.turns);
            enemy_strike(state, catalog, rng, 100, action, Some(stun), result);
        }
        AbilityKind::Heal | AbilityKind::Enrage | AbilityKind::Shield => {
            let mut event = CombatEvent::new(Actor::Enemy, enemy.name.clone(), enemy.name.clone(), action);
            let self_status = match ability.kind {
                AbilityKind::Heal => {
                    event.healed = enemy.heal(percent_of(enemy.max_health, ability.magnitude));
                    None
                }
                AbilityKind::Enrage => Some(StatusApplication::new(
                    StatusKind::Buff(StatKind::Power),
                    ability.magnitude,
                    ability.turns,
                )),
                _ => Some(StatusApplication::new(
                    StatusKind::Shield,
                    ability.magnitude,
                    ability.turns,
                )),
            };
            if let Some(application) = self_status {
                if enemy.statuses.apply(application, ability.name) != ApplyOutcome::Ignored {
                    event.statuses.push(application.kind);
                }
            }
            record(state, event, result);
        }
    }
}

/// One enemy strike against the player, with the player's stance shield,
/// reflection and resource generation applied.
fn enemy_strike<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    multiplier_percent: u32,
    action: CombatAction,
    on_hit: Option<StatusApplication>,
    result: &mut TickResult,
) -> StrikeOutcome {
    let Some(enemy) = state.enemy.as_mut().filter(|e| e.is_alive()) else {
        return StrikeOutcome::default();
    };
    let player = &mut state.player;
    let stance = player.stance_bonus(catalog);
    let shield = player
        .statuses
        .shield_percent()
        .saturating_add(stance.shield_percent);

    let strike = resolve_strike(
        &enemy.effective_stats(),
        &player.effective_stats(catalog),
        shield,
        multiplier_percent,
        rng,
    );

    let mut event = CombatEvent::new(Actor::Enemy, enemy.name.clone(), player.name.clone(), action);
    event.dodged = strike.dodged;
    event.crit = strike.crit;
    event.blocked = strike.blocked;

    let mut reflected = None;
    if strike.dodged {
        if let Some(resource) = player.resource.as_mut() {
            resource.on_event(ResourceEvent::Dodged);
        }
    } else {
        let dealt = player.take_damage(strike.damage, state.invincible);
        event.damage = dealt;
        if let Some(resource) = player.resource.as_mut() {
            resource.on_event(ResourceEvent::HitTaken);
        }
        if let Some(application) = on_hit {
            if player.is_alive() && player.statuses.apply(application, &enemy.name) != ApplyOutcome::Ignored {
                event.statuses.push(application.kind);
            }
        }
        let reflect = percent_of(dealt, stance.reflect_percent);
        if reflect > 0 && enemy.is_alive() {
            let mut reflect_event = CombatEvent::new(
                Actor::Player,
                player.name.clone(),
                enemy.name.clone(),
                CombatAction::Reflect,
            );
            reflect_event.damage = enemy.take_damage(reflect);
            reflected = Some(reflect_event);
        }
    }

    debug!(damage = event.damage, dodged = event.dodged, "enemy strike");
    record(state, event, result);
    if let Some(reflect_event) = reflected {
        record(state, reflect_event, result);
    }
    strike
}

/// Moves a dead actor into its dying phase. The enemy is checked first, so
/// a simultaneous death counts as a win and the player is left on 1 health.
/// Rewards and level-ups are credited as soon as the enemy dies.
pub(crate) fn resolve_deaths<R: RandomSource + ?Sized>(
    state: &mut EncounterState,
    catalog: &Catalog,
    rng: &mut R,
    result: &mut TickResult,
) {
    if !state.phase.is(BattlePhase::Combat) {
        return;
    }

    if let Some(enemy) = state.enemy.as_mut() {
        if !enemy.is_alive() && !enemy.is_dying {
            enemy.is_dying = true;
            let name = enemy.name.clone();
            let xp = (enemy.xp_reward as f64 * state.xp_multiplier).round() as u64;
            let gold = enemy.gold_reward;
            if !change_phase(state, BattlePhase::EnemyDying, result) {
                return;
            }

            if !state.player.is_alive() {
                debug!("mutual kill, player kept at 1 health");
                state.player.heal(1);
            }
            state.enemies_defeated += 1;
            state.player.gold = state.player.gold.saturating_add(gold);
            result.push(TickEvent::EnemyDefeated { name, xp, gold });

            let levels = state.player.add_xp(xp);
            for &level in &levels {
                info!(level, "level up");
                result.push(TickEvent::LeveledUp { level });
            }
            state.progression.queue_levels(&levels);
            if let Some(kind) = state.progression.advance(&state.player, catalog, rng) {
                info!(%kind, "choice offered");
                result.push(TickEvent::ChoiceOffered { kind });
            }
            return;
        }
    }

    if !state.player.is_alive() && change_phase(state, BattlePhase::PlayerDying, result) {
        result.push(TickEvent::PlayerDefeated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::paths::{PathId, StanceId};
    use crate::character::player::{CharacterClass, StanceState};
    use crate::combat::scheduler::CombatSpeed;
    use crate::core::config::RunConfig;
    use crate::core::constants::ENTERING_DURATION_TICKS;
    use crate::core::rng::ScriptedRolls;

    fn rat_state() -> EncounterState {
        let mut state = EncounterState::new(&RunConfig::for_class(CharacterClass::Warrior));
        let catalog = Catalog::builtin();
        let template = catalog.enemies.iter().find(|e| e.id == "sewer_rat").copied().unwrap();
        state.enemy = Some(Enemy::from_template(&template, 1, Vec::new()));
        state
    }

    fn enter_combat(state: &mut EncounterState, catalog: &Catalog, rng: &mut ScriptedRolls) {
        for _ in 0..ENTERING_DURATION_TICKS {
            advance_tick(state, catalog, rng);
        }
        assert_eq!(state.phase(), BattlePhase::Combat);
    }

    #[test]
    fn test_entering_counts_down_then_combat() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        for _ in 0..ENTERING_DURATION_TICKS - 1 {
            assert!(advance_tick(&mut state, &catalog, &mut rng).is_empty());
        }
        let result = advance_tick(&mut state, &catalog, &mut rng);
        assert_eq!(
            result.events,
            vec![TickEvent::PhaseChanged {
                from: BattlePhase::Entering,
                to: BattlePhase::Combat,
            }]
        );
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        state.paused = true;
        for _ in 0..50 {
            assert!(advance_tick(&mut state, &catalog, &mut rng).is_empty());
        }
        assert_eq!(state.tick_count, 0);
        assert_eq!(state.phase(), BattlePhase::Entering);
    }

    #[test]
    fn test_hero_resolves_before_enemy_on_same_tick() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        enter_combat(&mut state, &catalog, &mut rng);
        // Equal speed so both timers fire on the same tick.
        state.player.base.speed = 11;

        let mut first = None;
        for _ in 0..40 {
            let result = advance_tick(&mut state, &catalog, &mut rng);
            let actors: Vec<_> = result.combat_events().map(|e| e.actor).collect();
            if !actors.is_empty() {
                first = Some(actors);
                break;
            }
        }
        assert_eq!(first, Some(vec![Actor::Player, Actor::Enemy]));
    }

    #[test]
    fn test_combat_speed_triples_attack_rate() {
        let catalog = Catalog::builtin();
        let mut rng = ScriptedRolls::never();

        let mut count_attacks = |speed: CombatSpeed| {
            let mut state = rat_state();
            state.invincible = true;
            state.enemy.as_mut().unwrap().max_health = 100_000;
            state.enemy.as_mut().unwrap().heal(100_000);
            enter_combat(&mut state, &catalog, &mut rng);
            state.combat_speed = speed;
            let mut attacks = 0;
            for _ in 0..120 {
                let result = advance_tick(&mut state, &catalog, &mut rng);
                attacks += result
                    .combat_events()
                    .filter(|e| e.actor == Actor::Player && e.action == CombatAction::BasicAttack)
                    .count();
            }
            attacks
        };

        let normal = count_attacks(CombatSpeed::X1);
        let fast = count_attacks(CombatSpeed::X3);
        assert!(normal > 0);
        assert_eq!(fast, normal * 3);
    }

    #[test]
    fn test_enemy_death_awards_and_waits_for_ack() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        enter_combat(&mut state, &catalog, &mut rng);
        state.player.base.power = 500;

        let mut defeated = None;
        for _ in 0..40 {
            let result = advance_tick(&mut state, &catalog, &mut rng);
            if let Some(event) = result.events.iter().find_map(|e| match e {
                TickEvent::EnemyDefeated { xp, gold, .. } => Some((*xp, *gold)),
                _ => None,
            }) {
                defeated = Some(event);
                break;
            }
        }
        assert_eq!(defeated, Some((25, 5)));
        assert_eq!(state.phase(), BattlePhase::EnemyDying);
        assert_eq!(state.player.gold, 5);
        assert!(state.enemy.as_ref().unwrap().is_dying);

        for _ in 0..100 {
            assert!(advance_tick(&mut state, &catalog, &mut rng).is_empty());
        }
        assert_eq!(state.phase(), BattlePhase::EnemyDying);
    }

    #[test]
    fn test_player_death_moves_to_player_dying() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        enter_combat(&mut state, &catalog, &mut rng);
        state.player.base.power = 1;
        state.player.take_damage(state.player.health() - 1, false);

        let mut died = false;
        for _ in 0..100 {
            let result = advance_tick(&mut state, &catalog, &mut rng);
            if result.events.contains(&TickEvent::PlayerDefeated) {
                died = true;
                break;
            }
        }
        assert!(died);
        assert_eq!(state.phase(), BattlePhase::PlayerDying);
        assert_eq!(state.player.health(), 0);
    }

    /// Guardian in Retribution with no armor against a goblin on 1 health.
    /// One landed Flurry hit deals 5 and reflects 1.
    fn retribution_vs_dying_goblin(catalog: &Catalog, rng: &mut ScriptedRolls) -> EncounterState {
        let mut state = EncounterState::new(&RunConfig::for_class(CharacterClass::Warrior));
        let template = catalog
            .enemies
            .iter()
            .find(|e| e.id == "goblin_skirmisher")
            .copied()
            .unwrap();
        let mut goblin = Enemy::from_template(&template, 1, catalog.abilities_for(&template));
        goblin.take_damage(goblin.max_health - 1);
        state.enemy = Some(goblin);
        state.player.path = Some(PathId::Guardian);
        state.player.stance = Some(StanceState {
            active: StanceId::Retribution,
            unlocked: Vec::new(),
        });
        state.player.base.armor = 0;
        enter_combat(&mut state, catalog, rng);
        state
    }

    fn flurry(state: &mut EncounterState, catalog: &Catalog, rng: &mut ScriptedRolls) -> TickResult {
        let mut result = TickResult::default();
        let index = state
            .enemy
            .as_ref()
            .and_then(|e| e.abilities.iter().position(|a| a.def.id == "flurry"))
            .unwrap();
        enemy_ability(state, catalog, rng, index, &mut result);
        resolve_deaths(state, catalog, rng, &mut result);
        result
    }

    #[test]
    fn test_multi_hit_stops_when_reflect_kills_enemy() {
        let catalog = Catalog::builtin();
        let mut rng = ScriptedRolls::never();
        let mut state = retribution_vs_dying_goblin(&catalog, &mut rng);
        let health = state.player.health();

        let result = flurry(&mut state, &catalog, &mut rng);
        let strikes: Vec<_> = result
            .combat_events()
            .filter(|e| e.actor == Actor::Enemy)
            .map(|e| e.damage)
            .collect();
        let reflects = result
            .combat_events()
            .filter(|e| e.action == CombatAction::Reflect)
            .count();
        assert_eq!(strikes, vec![5]);
        assert_eq!(reflects, 1);
        assert_eq!(state.player.health(), health - 5);
        assert_eq!(state.phase(), BattlePhase::EnemyDying);
    }

    #[test]
    fn test_dead_enemy_does_not_strike() {
        let catalog = Catalog::builtin();
        let mut rng = ScriptedRolls::never();
        let mut state = rat_state();
        enter_combat(&mut state, &catalog, &mut rng);
        let enemy = state.enemy.as_mut().unwrap();
        let max = enemy.max_health;
        enemy.take_damage(max);
        let health = state.player.health();

        let mut result = TickResult::default();
        let outcome = enemy_strike(
            &mut state,
            &catalog,
            &mut rng,
            100,
            CombatAction::BasicAttack,
            None,
            &mut result,
        );
        assert_eq!(outcome, StrikeOutcome::default());
        assert!(result.is_empty());
        assert_eq!(state.player.health(), health);
    }

    #[test]
    fn test_mutual_kill_counts_as_win_and_player_survives() {
        let catalog = Catalog::builtin();
        let mut rng = ScriptedRolls::never();
        let mut state = retribution_vs_dying_goblin(&catalog, &mut rng);
        state.xp_multiplier = 0.0;
        let health = state.player.health();
        state.player.take_damage(health - 5, false);

        let result = flurry(&mut state, &catalog, &mut rng);
        assert_eq!(state.phase(), BattlePhase::EnemyDying);
        assert!(!result.events.contains(&TickEvent::PlayerDefeated));
        assert_eq!(state.player.health(), 1);

        change_phase(&mut state, BattlePhase::Transitioning, &mut TickResult::default());
        state.enemy = None;
        advance_tick(&mut state, &catalog, &mut rng);
        assert_eq!(state.phase(), BattlePhase::Entering);
        assert_eq!(state.room, 2);
        assert!(state.player.is_alive());
    }

    #[test]
    fn test_stun_skips_turn_and_expires() {
        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        enter_combat(&mut state, &catalog, &mut rng);
        state
            .player
            .statuses
            .apply(StatusApplication::new(StatusKind::Stun, 0, 1), "Crushing Blow");

        let mut skipped = false;
        for _ in 0..40 {
            let result = advance_tick(&mut state, &catalog, &mut rng);
            if result.events.contains(&TickEvent::TurnSkipped {
                actor: Actor::Player,
            }) {
                skipped = true;
                assert!(result.events.contains(&TickEvent::StatusExpired {
                    actor: Actor::Player,
                    kind: StatusKind::Stun,
                }));
                break;
            }
        }
        assert!(skipped);
        assert!(!state.player.statuses.is_stunned());
    }

    #[test]
    fn test_arcane_charges_drip_every_combat_tick() {
        use crate::character::resource::{PathResource, ResourceType};

        let catalog = Catalog::builtin();
        let mut state = rat_state();
        let mut rng = ScriptedRolls::never();
        state.player.resource = Some(PathResource::new(ResourceType::ArcaneCharges));
        enter_combat(&mut state, &catalog, &mut rng);
        assert_eq!(state.player.resource.as_ref().unwrap().current(), 0);

        state.invincible = true;
        state.combat_speed = CombatSpeed::X2;
        for _ in 0..5 {
            advance_tick(&mut state, &catalog, &mut rng);
        }
        assert_eq!(state.player.resource.as_ref().unwrap().current(), 10);
    }
}
