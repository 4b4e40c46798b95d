//! Roguewave Headless Combat Simulator
//!
//! Drives the combat engine without any renderer, using an auto-pilot in
//! place of the player: the first ready power is cast, every choice takes
//! its first option and death animations are acknowledged immediately.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --ticks N       Ticks to simulate (default: 36000 = 1 hour game time)
//!   --seed N        RNG seed (default: 42)
//!   --class NAME    warrior, mage, rogue or paladin (default: warrior)
//!   --config FILE   JSON run configuration
//!   --speed N       Combat speed multiplier 1-3 (default: 1)
//!   --runs N        Number of runs with incrementing seeds (default: 1)
//!   --verbose       Print every combat log line
//!   --json          Print the final snapshot as JSON
//!   --quiet         Only final summary line
//!
//! Set `RUST_LOG=roguewave=debug` for engine tracing on stderr.

use roguewave::character::player::CharacterClass;
use roguewave::core::config::RunConfig;
use roguewave::core::constants::TICKS_PER_SECOND;
use roguewave::core::engine::CombatEngine;
use roguewave::core::phase::BattlePhase;
use roguewave::core::progression::ChoiceKind;
use roguewave::core::tick::{TickEvent, TickResult};
use roguewave::combat::log::format_event;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    ticks: u64,
    seed: u64,
    class: CharacterClass,
    config_path: Option<String>,
    speed: u8,
    runs: u32,
    verbose: bool,
    json: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 36_000,
            seed: 42,
            class: CharacterClass::Warrior,
            config_path: None,
            speed: 1,
            runs: 1,
            verbose: false,
            json: false,
            quiet: false,
        }
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{message}");
    print_usage();
    std::process::exit(1);
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i)
        .map(String::as_str)
        .unwrap_or_else(|| usage_error(&format!("{flag} requires a value")))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    value(args, i, flag)
        .parse()
        .unwrap_or_else(|_| usage_error(&format!("{flag} requires a number")))
}

fn parse_class(name: &str) -> CharacterClass {
    CharacterClass::ALL
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
        .unwrap_or_else(|| usage_error(&format!("Unknown class: {name}")))
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                config.ticks = number(&args, i, "--ticks");
            }
            "--seed" => {
                i += 1;
                config.seed = number(&args, i, "--seed");
            }
            "--class" => {
                i += 1;
                config.class = parse_class(value(&args, i, "--class"));
            }
            "--config" => {
                i += 1;
                config.config_path = Some(value(&args, i, "--config").to_string());
            }
            "--speed" => {
                i += 1;
                config.speed = number(&args, i, "--speed");
            }
            "--runs" => {
                i += 1;
                config.runs = number(&args, i, "--runs");
            }
            "--verbose" => config.verbose = true,
            "--json" => config.json = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => usage_error(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Roguewave Headless Combat Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --ticks N       Ticks to simulate (default: 36000 = 1 hour)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --class NAME    warrior, mage, rogue or paladin (default: warrior)\n\
         \x20 --config FILE   JSON run configuration\n\
         \x20 --speed N       Combat speed multiplier 1-3 (default: 1)\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 1)\n\
         \x20 --verbose       Print every combat log line\n\
         \x20 --json          Print the final snapshot as JSON\n\
         \x20 --quiet         Only final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

fn load_run_config(config: &SimConfig, seed: u64) -> RunConfig {
    let base = match &config.config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .unwrap_or_else(|err| usage_error(&format!("Cannot read {path}: {err}")));
            RunConfig::from_json_str(&json)
                .unwrap_or_else(|err| usage_error(&format!("Invalid config {path}: {err}")))
        }
        None => RunConfig::for_class(config.class),
    };
    RunConfig {
        player_name: "Simulator".to_string(),
        ..base
    }
    .with_seed(seed)
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimStats {
    total_ticks: u64,
    kills: u64,
    boss_kills: u64,
    deaths: u64,
    crits: u64,
    powers_cast: u64,
    xp_gained: u64,
    gold_gained: u64,
    floors_cleared: u32,
    choices_made: u32,
    level_at_tick: Vec<(u32, u64)>,
    final_level: u32,
    final_floor: u32,
    final_room: u32,
    final_path: Option<String>,
}

impl SimStats {
    fn process(&mut self, tick: u64, result: &TickResult) {
        for event in &result.events {
            match event {
                TickEvent::Combat(event) => {
                    if event.crit {
                        self.crits += 1;
                    }
                }
                TickEvent::EnemyDefeated { xp, gold, .. } => {
                    self.kills += 1;
                    self.xp_gained += xp;
                    self.gold_gained += gold;
                }
                TickEvent::PlayerDefeated => self.deaths += 1,
                TickEvent::FloorCompleted { .. } => self.floors_cleared += 1,
                TickEvent::LeveledUp { level } => self.level_at_tick.push((*level, tick)),
                _ => {}
            }
        }
    }
}

// ── Auto-pilot ───────────────────────────────────────────────────────

/// Resolves a pending choice with its first option. Returns false when
/// nothing was pending.
fn resolve_choice(engine: &mut CombatEngine) -> bool {
    let Some(pending) = engine.pending_choice() else {
        return false;
    };
    let kind = pending.kind;
    let Some(option) = pending.options.first().map(|o| o.id.clone()) else {
        return false;
    };
    let outcome = match kind {
        ChoiceKind::PathSelection => engine.select_path(&option),
        ChoiceKind::PowerChoice => engine.select_power(&option),
        ChoiceKind::PowerUpgrade => engine.confirm_upgrade(&option),
        ChoiceKind::StanceEnhancement => engine.select_stance_enhancement(&option),
    };
    outcome.is_ok()
}

fn cast_first_ready_power(engine: &mut CombatEngine) -> Option<TickResult> {
    let ids: Vec<String> = engine.player().powers().iter().map(|p| p.id.clone()).collect();
    ids.iter().find_map(|id| engine.use_power(id).ok())
}

// ── Core Simulation Loop ─────────────────────────────────────────────

fn run_simulation(config: &SimConfig, seed: u64) -> (SimStats, CombatEngine) {
    let run_config = load_run_config(config, seed);
    let mut engine = CombatEngine::new(run_config)
        .unwrap_or_else(|err| usage_error(&format!("Cannot start run: {err}")));
    if let Err(err) = engine.set_combat_speed(config.speed) {
        usage_error(&err.to_string());
    }

    let mut stats = SimStats::default();
    for tick in 0..config.ticks {
        while resolve_choice(&mut engine) {
            stats.choices_made += 1;
        }

        match engine.phase() {
            BattlePhase::EnemyDying => {
                let _ = engine.ack_enemy_death_animation();
            }
            BattlePhase::PlayerDying => {
                let _ = engine.ack_player_death_animation();
            }
            BattlePhase::Defeat => {
                if let Ok(result) = engine.retry() {
                    stats.process(tick, &result);
                }
            }
            BattlePhase::FloorComplete => {
                if let Ok(result) = engine.continue_floor() {
                    stats.process(tick, &result);
                }
            }
            BattlePhase::Combat => {
                if let Some(result) = cast_first_ready_power(&mut engine) {
                    stats.powers_cast += 1;
                    if engine.enemy().is_some_and(|e| e.is_dying && e.is_boss) {
                        stats.boss_kills += 1;
                    }
                    stats.process(tick, &result);
                    print_events(config, tick, &result);
                }
            }
            BattlePhase::Entering | BattlePhase::Transitioning => {}
        }

        let boss_alive = engine.enemy().is_some_and(|e| e.is_boss && !e.is_dying);
        let result = engine.tick();
        if boss_alive && engine.enemy().is_some_and(|e| e.is_boss && e.is_dying) {
            stats.boss_kills += 1;
        }
        stats.process(tick, &result);
        print_events(config, tick, &result);
        stats.total_ticks = tick + 1;
    }

    let player = engine.player();
    stats.final_level = player.level;
    stats.final_floor = engine.state().floor;
    stats.final_room = engine.state().room;
    stats.final_path = player
        .path
        .and_then(|id| engine.catalog().path(id))
        .map(|p| p.name.to_string());
    (stats, engine)
}

// ── Verbose Output ───────────────────────────────────────────────────

fn print_events(config: &SimConfig, tick: u64, result: &TickResult) {
    if !config.verbose {
        return;
    }
    for event in &result.events {
        let label = match event {
            TickEvent::Combat(event) => format_event(event),
            TickEvent::PhaseChanged { from, to } => format!("{from} -> {to}"),
            TickEvent::EnemySpawned { name, is_boss } => {
                let boss = if *is_boss { " [BOSS]" } else { "" };
                format!("{name} appears{boss}")
            }
            TickEvent::EnemyDefeated { name, xp, gold } => {
                format!("Killed {name} (+{xp} XP, +{gold} gold)")
            }
            TickEvent::PlayerDefeated => "DIED".to_string(),
            TickEvent::LeveledUp { level } => format!("Level up! -> {level}"),
            TickEvent::ChoiceOffered { kind } => format!("Choice: {kind}"),
            TickEvent::FloorCompleted { floor } => format!("Floor {floor} complete"),
            _ => continue,
        };
        println!("[t={tick:>6}] {label}");
    }
}

// ── Report Output ────────────────────────────────────────────────────

fn ticks_to_time(ticks: u64) -> String {
    let total_secs = ticks / TICKS_PER_SECOND as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

fn print_summary(stats: &SimStats, seed: u64, config: &SimConfig) {
    if config.quiet {
        println!(
            "seed={seed} ticks={} level={} floor={}-{} kills={} deaths={} path={}",
            stats.total_ticks,
            stats.final_level,
            stats.final_floor,
            stats.final_room,
            stats.kills,
            stats.deaths,
            stats.final_path.as_deref().unwrap_or("none"),
        );
        return;
    }

    println!("============================================================");
    println!("  Roguewave Simulation Report  (seed={seed})");
    println!("============================================================");
    println!();
    println!(
        "Duration: {} ticks ({})",
        stats.total_ticks,
        ticks_to_time(stats.total_ticks)
    );
    println!();

    println!("--- Final State ---");
    println!(
        "Level: {}  |  Floor: {}  Room: {}  |  Path: {}",
        stats.final_level,
        stats.final_floor,
        stats.final_room,
        stats.final_path.as_deref().unwrap_or("none"),
    );
    println!(
        "Floors cleared: {}  |  Choices made: {}",
        stats.floors_cleared, stats.choices_made
    );
    println!();

    println!("--- Combat ---");
    println!(
        "Kills: {}  |  Boss kills: {}  |  Deaths: {}",
        stats.kills, stats.boss_kills, stats.deaths
    );
    println!(
        "Crits: {}  |  Powers cast: {}",
        stats.crits, stats.powers_cast
    );
    println!(
        "Total XP: {}  |  Gold: {}",
        stats.xp_gained, stats.gold_gained
    );
    println!();

    if !stats.level_at_tick.is_empty() {
        println!("--- Level Milestones ---");
        for (level, tick) in &stats.level_at_tick {
            println!("  Level {level:>3} at {}", ticks_to_time(*tick));
        }
        println!();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = parse_args();
    for run in 0..config.runs.max(1) {
        let seed = config.seed + run as u64;
        let (stats, engine) = run_simulation(&config, seed);
        print_summary(&stats, seed, &config);
        if config.json {
            match engine.snapshot().to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("Cannot serialize snapshot: {err}"),
            }
        }
    }
}
