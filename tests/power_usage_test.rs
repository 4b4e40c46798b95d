//! Integration test: casting powers through the engine
//!
//! Drives a Paladin from path selection through a real fight: Zeal is
//! earned from landed and taken hits, a cast charges exactly its cost,
//! and the cooldown shown to the renderer counts down in whole seconds.

use roguewave::catalog::Catalog;
use roguewave::character::player::CharacterClass;
use roguewave::character::resource::ResourceType;
use roguewave::combat::types::Enemy;
use roguewave::core::config::RunConfig;
use roguewave::core::constants::ENTERING_DURATION_TICKS;
use roguewave::core::encounter::EncounterState;
use roguewave::core::error::ActionError;
use roguewave::core::phase::BattlePhase;
use roguewave::core::progression::ChoiceKind;
use roguewave::core::rng::{RandomSource, ScriptedRolls};
use roguewave::CombatEngine;

/// A level-2 Paladin facing a sewer rat that cannot die during the test.
fn paladin_vs_sturdy_rat(rolls: ScriptedRolls) -> CombatEngine<ScriptedRolls> {
    let catalog = Catalog::builtin();
    let mut rng = rolls;
    let mut state = EncounterState::new(&RunConfig::for_class(CharacterClass::Paladin));

    let template = catalog
        .enemies
        .iter()
        .find(|e| e.id == "sewer_rat")
        .copied()
        .unwrap();
    let mut rat = Enemy::from_template(&template, 1, Vec::new());
    rat.max_health = 50_000;
    rat.heal(50_000);
    state.enemy = Some(rat);

    state.progression.queue_levels(&[2]);
    state.progression.advance(&state.player, &catalog, &mut rng);

    let mut engine = CombatEngine::from_state(state, catalog, rng).unwrap();
    assert_eq!(engine.select_path("crusader"), Ok(Some(ChoiceKind::PowerChoice)));
    assert!(engine.pending_choice().unwrap().option("holy_strike").is_some());
    assert_eq!(engine.select_power("holy_strike"), Ok(None));
    engine
}

fn zeal<R: RandomSource>(engine: &CombatEngine<R>) -> u32 {
    engine
        .snapshot()
        .resource_bar(ResourceType::Zeal)
        .map_or(0, |bar| bar.current)
}

fn enter_combat<R: RandomSource>(engine: &mut CombatEngine<R>) {
    for _ in 0..ENTERING_DURATION_TICKS {
        engine.tick();
    }
    assert_eq!(engine.phase(), BattlePhase::Combat);
}

#[test]
fn test_cast_after_accruing_zeal_charges_exact_cost() {
    let mut engine = paladin_vs_sturdy_rat(ScriptedRolls::never());
    assert_eq!(zeal(&engine), 0);
    assert!(matches!(
        engine.use_power("holy_strike"),
        Err(ActionError::NotInCombat { .. })
    ));
    enter_combat(&mut engine);

    assert_eq!(
        engine.use_power("holy_strike"),
        Err(ActionError::InsufficientResource {
            needed: 15,
            available: 0
        })
    );

    // Zeal comes from landed and taken hits only
    for _ in 0..500 {
        if zeal(&engine) >= 15 {
            break;
        }
        engine.tick();
    }
    let before = zeal(&engine);
    assert!(before >= 15);

    let result = engine.use_power("holy_strike").unwrap();
    assert_eq!(result.combat_events().count(), 1);
    assert_eq!(zeal(&engine), before - 15);
    assert_eq!(engine.snapshot().power_cooldown("holy_strike"), Some(3));
}

#[test]
fn test_cooldown_display_reaches_zero_then_power_is_usable() {
    let mut engine = paladin_vs_sturdy_rat(ScriptedRolls::never());
    enter_combat(&mut engine);
    for _ in 0..500 {
        if zeal(&engine) >= 30 {
            break;
        }
        engine.tick();
    }
    engine.use_power("holy_strike").unwrap();

    let mut shown = Vec::new();
    for _ in 0..30 {
        shown.push(engine.snapshot().power_cooldown("holy_strike").unwrap());
        engine.tick();
    }
    assert!(shown.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(shown[0], 3);
    assert_eq!(engine.snapshot().power_cooldown("holy_strike"), Some(0));

    assert!(engine.use_power("holy_strike").is_ok());
}

#[test]
fn test_pause_blocks_casting() {
    let mut engine = paladin_vs_sturdy_rat(ScriptedRolls::never());
    enter_combat(&mut engine);
    engine.toggle_pause();

    let before = engine.state().tick_count;
    assert!(engine.tick().is_empty());
    assert_eq!(engine.state().tick_count, before);
    assert_eq!(engine.use_power("holy_strike"), Err(ActionError::Paused));
}
