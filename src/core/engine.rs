//! The combat engine: owns the encounter state and exposes every action
//! entry point.
//!
//! Actions return `ActionResult`. A rejected action leaves the state exactly
//! as it was; rejections are expected timing races (a click landing just as
//! a power goes on cooldown), so they are logged at debug level only.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::catalog::paths::{PathCategory, PathId, StanceId};
use crate::catalog::Catalog;
use crate::character::equipment::{EquipmentSlot, Item};
use crate::character::player::{Player, StanceState};
use crate::character::resource::PathResource;
use crate::combat::cooldown::seconds_to_ticks;
use crate::combat::log::{CombatAction, CombatEvent, CombatLog};
use crate::combat::powers::{tier_cooldown_ticks, CastContext, PowerOutcome};
use crate::combat::scheduler::CombatSpeed;
use crate::combat::types::{Actor, Enemy};
use crate::core::config::RunConfig;
use crate::core::constants::{STANCE_SWITCH_COOLDOWN_ID, STANCE_SWITCH_COOLDOWN_SECONDS};
use crate::core::encounter::EncounterState;
use crate::core::error::{ActionError, ActionResult, ConfigError};
use crate::core::phase::BattlePhase;
use crate::core::progression::{ChoiceKind, PendingChoice};
use crate::core::rng::RandomSource;
use crate::core::snapshot::EncounterSnapshot;
use crate::core::tick::{advance_tick, change_phase, resolve_deaths, spawn_enemy, TickEvent, TickResult};

pub struct CombatEngine<R: RandomSource = ChaCha8Rng> {
    state: EncounterState,
    catalog: Catalog,
    rng: R,
}

impl CombatEngine<ChaCha8Rng> {
    /// Starts a run with the built-in catalog. Seeded from `config.seed`
    /// when present, from entropy otherwise.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_catalog(config, Catalog::builtin(), rng)
    }
}

impl<R: RandomSource> CombatEngine<R> {
    pub fn with_rng(config: RunConfig, rng: R) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Catalog::builtin(), rng)
    }

    /// Validates the content and config, then spawns the first enemy.
    /// Unknown ids are fatal here and never surface during play.
    pub fn with_catalog(config: RunConfig, catalog: Catalog, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        catalog.validate()?;

        let mut engine = Self {
            state: EncounterState::new(&config),
            catalog,
            rng,
        };
        spawn_enemy(
            &mut engine.state,
            &engine.catalog,
            &mut engine.rng,
            &mut TickResult::default(),
        );
        info!(
            class = engine.state.player.class.name(),
            floor = engine.state.floor,
            "run started"
        );
        Ok(engine)
    }

    /// Resumes from an existing state (tests and tools).
    pub fn from_state(state: EncounterState, catalog: Catalog, rng: R) -> Result<Self, ConfigError> {
        catalog.validate()?;
        Ok(Self {
            state,
            catalog,
            rng,
        })
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.state.enemy.as_ref()
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn log(&self) -> &CombatLog {
        &self.state.log
    }

    pub fn pending_choice(&self) -> Option<&PendingChoice> {
        self.state.progression.pending()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn combat_speed(&self) -> CombatSpeed {
        self.state.combat_speed
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot::capture(&self.state, &self.catalog)
    }

    // ── Simulation ──────────────────────────────────────────────

    /// Advances one tick. Not re-entrant.
    pub fn tick(&mut self) -> TickResult {
        advance_tick(&mut self.state, &self.catalog, &mut self.rng)
    }

    fn ensure_can_act(&self) -> ActionResult<()> {
        if let Some(pending) = self.state.progression.pending() {
            return Err(ActionError::ChoicePending(pending.kind));
        }
        if self.state.paused {
            return Err(ActionError::Paused);
        }
        Ok(())
    }

    // ── Powers ──────────────────────────────────────────────────

    /// Casts a learned power. Cost and cooldown are paid before the effect
    /// resolves, so a dodged cast is still charged.
    pub fn use_power(&mut self, id: &str) -> ActionResult<TickResult> {
        self.check_power(id).inspect_err(|err| {
            debug!(power = id, %err, "power rejected");
        })?;

        let tier = self.state.player.power_tier(id).unwrap_or(0);
        let def = *self
            .catalog
            .power(id)
            .ok_or_else(|| ActionError::PowerNotLearned(id.to_string()))?;

        let state = &mut self.state;
        let Some(enemy) = state.enemy.as_mut() else {
            return Err(ActionError::NotInCombat {
                phase: state.phase.phase(),
            });
        };

        if let Some(resource) = state.player.resource.as_mut() {
            resource.try_spend(def.cost);
        }
        state.cooldowns.start(
            def.id,
            tier_cooldown_ticks(seconds_to_ticks(def.cooldown_seconds), tier),
        );

        let player_stats = state.player.effective_stats(&self.catalog);
        let enemy_stats = enemy.effective_stats();
        let mut event = CombatEvent::new(
            Actor::Player,
            state.player.name.clone(),
            enemy.name.clone(),
            CombatAction::Power {
                id: def.id.to_string(),
                name: def.name.to_string(),
            },
        );
        let outcome: PowerOutcome = CastContext {
            player: &mut state.player,
            player_stats,
            enemy,
            enemy_stats,
            rng: &mut self.rng,
            tier,
            source: def.name,
        }
        .resolve(&def.effect);

        event.damage = outcome.damage;
        event.healed = outcome.healed;
        event.crit = outcome.crit;
        event.dodged = outcome.dodged;
        event.blocked = outcome.blocked;
        event.statuses = outcome.statuses.iter().map(|(_, kind)| *kind).collect();
        debug!(power = def.id, tier, damage = event.damage, dodged = event.dodged, "power used");

        let mut result = TickResult::default();
        self.state.log.record(&event);
        result.events.push(TickEvent::Combat(event));
        resolve_deaths(&mut self.state, &self.catalog, &mut self.rng, &mut result);
        Ok(result)
    }

    /// Every guard of `use_power`, in the order they are reported.
    fn check_power(&self, id: &str) -> ActionResult<()> {
        self.ensure_can_act()?;
        let phase = self.state.phase();
        if phase != BattlePhase::Combat {
            return Err(ActionError::NotInCombat { phase });
        }
        let player = &self.state.player;
        if !player.knows_power(id) {
            return Err(ActionError::PowerNotLearned(id.to_string()));
        }
        let def = self
            .catalog
            .power(id)
            .ok_or_else(|| ActionError::PowerNotLearned(id.to_string()))?;
        if player.statuses.is_stunned() {
            return Err(ActionError::Stunned);
        }
        if !self.state.cooldowns.is_ready(id) {
            return Err(ActionError::OnCooldown {
                power: id.to_string(),
                remaining_seconds: self.state.cooldowns.remaining_seconds(id),
            });
        }
        let available = player.resource.as_ref().map_or(0, |r| r.current());
        if available < def.cost {
            return Err(ActionError::InsufficientResource {
                needed: def.cost,
                available,
            });
        }
        Ok(())
    }

    // ── Progression choices ─────────────────────────────────────

    /// Picks the level-2 path. Active paths get their resource and are
    /// immediately offered a first power; passive paths start in their
    /// first stance.
    pub fn select_path(&mut self, key: &str) -> ActionResult<Option<ChoiceKind>> {
        self.state.progression.check(ChoiceKind::PathSelection, key)?;
        let path = PathId::from_key(key)
            .and_then(|id| self.catalog.path(id))
            .copied()
            .ok_or_else(|| ActionError::InvalidOption(key.to_string()))?;
        let taken = self.state.progression.take(ChoiceKind::PathSelection, key)?;

        let player = &mut self.state.player;
        player.path = Some(path.id);
        info!(path = path.name, "path selected");
        match path.category {
            PathCategory::Active(kind) => {
                player.resource = Some(PathResource::new(kind));
                self.state.progression.offer(
                    ChoiceKind::PowerChoice,
                    taken.level,
                    &self.state.player,
                    &self.catalog,
                    &mut self.rng,
                );
            }
            PathCategory::Passive([first, _]) => {
                player.stance = Some(StanceState {
                    active: first,
                    unlocked: Vec::new(),
                });
            }
        }
        Ok(self.advance_progression())
    }

    pub fn select_power(&mut self, id: &str) -> ActionResult<Option<ChoiceKind>> {
        self.state.progression.take(ChoiceKind::PowerChoice, id)?;
        self.state.player.learn_power(id);
        info!(power = id, "power learned");
        Ok(self.advance_progression())
    }

    pub fn confirm_upgrade(&mut self, id: &str) -> ActionResult<Option<ChoiceKind>> {
        self.state.progression.take(ChoiceKind::PowerUpgrade, id)?;
        if let Some(tier) = self.state.player.upgrade_power(id) {
            info!(power = id, tier, "power upgraded");
        }
        Ok(self.advance_progression())
    }

    pub fn select_stance_enhancement(&mut self, id: &str) -> ActionResult<Option<ChoiceKind>> {
        self.state.progression.check(ChoiceKind::StanceEnhancement, id)?;
        if self.state.player.stance.is_none() {
            return Err(ActionError::NoStance);
        }
        self.state.progression.take(ChoiceKind::StanceEnhancement, id)?;
        if let Some(stance) = self.state.player.stance.as_mut() {
            stance.unlocked.push(id.to_string());
        }
        info!(enhancement = id, "stance enhancement unlocked");
        Ok(self.advance_progression())
    }

    /// Offers the next queued level's choice, if any. Returns its kind.
    fn advance_progression(&mut self) -> Option<ChoiceKind> {
        if let Some(pending) = self.state.progression.pending() {
            return Some(pending.kind);
        }
        let kind = self
            .state
            .progression
            .advance(&self.state.player, &self.catalog, &mut self.rng);
        if let Some(kind) = kind {
            info!(%kind, "choice offered");
        }
        kind
    }

    // ── Stances ─────────────────────────────────────────────────

    /// Flips to the other stance of the passive path.
    pub fn switch_stance(&mut self) -> ActionResult<StanceId> {
        self.ensure_can_act()?;
        let stance = self.state.player.stance.as_ref().ok_or(ActionError::NoStance)?;
        let stances = self
            .state
            .player
            .path
            .and_then(|id| self.catalog.path(id))
            .and_then(|p| p.stances())
            .ok_or(ActionError::NoStance)?;
        if !self.state.cooldowns.is_ready(STANCE_SWITCH_COOLDOWN_ID) {
            return Err(ActionError::StanceOnCooldown {
                remaining_seconds: self.state.cooldowns.remaining_seconds(STANCE_SWITCH_COOLDOWN_ID),
            });
        }

        let next = if stance.active == stances[0] {
            stances[1]
        } else {
            stances[0]
        };
        if let Some(stance) = self.state.player.stance.as_mut() {
            stance.active = next;
        }
        self.state.cooldowns.start(
            STANCE_SWITCH_COOLDOWN_ID,
            seconds_to_ticks(STANCE_SWITCH_COOLDOWN_SECONDS),
        );
        debug!(stance = ?next, "stance switched");
        Ok(next)
    }

    // ── Controls ────────────────────────────────────────────────

    /// Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.paused = !self.state.paused;
        debug!(paused = self.state.paused, "pause toggled");
        self.state.paused
    }

    pub fn set_combat_speed(&mut self, multiplier: u8) -> ActionResult<CombatSpeed> {
        let speed = CombatSpeed::try_from(multiplier)?;
        self.state.combat_speed = speed;
        Ok(speed)
    }

    // ── Animation acknowledgments ───────────────────────────────

    /// The enemy death animation finished: the enemy is removed.
    pub fn ack_enemy_death_animation(&mut self) -> ActionResult<BattlePhase> {
        self.acknowledge(BattlePhase::EnemyDying, BattlePhase::Transitioning)?;
        self.state.enemy = None;
        Ok(BattlePhase::Transitioning)
    }

    pub fn ack_player_death_animation(&mut self) -> ActionResult<BattlePhase> {
        self.acknowledge(BattlePhase::PlayerDying, BattlePhase::Defeat)?;
        Ok(BattlePhase::Defeat)
    }

    fn acknowledge(&mut self, expected: BattlePhase, next: BattlePhase) -> ActionResult<()> {
        if let Err(err) = self.state.phase.require(expected) {
            warn!(%err, "acknowledgment ignored");
            return Err(err);
        }
        change_phase(&mut self.state, next, &mut TickResult::default());
        Ok(())
    }

    // ── Run flow ────────────────────────────────────────────────

    /// Re-enters the same floor and room after a defeat with a fresh
    /// encounter. Level, powers and gold are kept.
    pub fn retry(&mut self) -> ActionResult<TickResult> {
        self.state.phase.require(BattlePhase::Defeat)?;
        info!(floor = self.state.floor, room = self.state.room, "retrying");
        Ok(self.restart_encounter())
    }

    /// Moves on to the first room of the next floor.
    pub fn continue_floor(&mut self) -> ActionResult<TickResult> {
        self.state.phase.require(BattlePhase::FloorComplete)?;
        self.state.floor += 1;
        self.state.room = 1;
        info!(floor = self.state.floor, "continuing to next floor");
        Ok(self.restart_encounter())
    }

    fn restart_encounter(&mut self) -> TickResult {
        let mut result = TickResult::default();
        self.state.reset_encounter();
        change_phase(&mut self.state, BattlePhase::Entering, &mut result);
        spawn_enemy(&mut self.state, &self.catalog, &mut self.rng, &mut result);
        result
    }

    // ── Shop boundary ───────────────────────────────────────────

    /// Equips an item and returns the one it replaced. Health is clamped
    /// to the new maximum.
    pub fn equip_item(&mut self, item: Item) -> Option<Item> {
        let previous = self.state.player.equipment.equip(item);
        self.state.player.clamp_health();
        previous
    }

    pub fn unequip_item(&mut self, slot: EquipmentSlot) -> Option<Item> {
        let removed = self.state.player.equipment.unequip(slot);
        self.state.player.clamp_health();
        removed
    }

    pub fn gold(&self) -> u64 {
        self.state.player.gold
    }

    pub fn set_gold(&mut self, gold: u64) {
        self.state.player.gold = gold;
    }
}
