//! arena-sim: headless arena driver.
//!
//! Usage:
//!   arena-sim run --ticks 500 --seed 7 --throttle 0.8 --steer 0.2
//!   arena-sim run --config arena.json
//!
//! Logs go to stderr (filter with RUST_LOG), the final snapshot is printed
//! to stdout as JSON.

use std::path::PathBuf;
use std::process;

use skidfire_core::commands::PlayerCommand;
use skidfire_core::config::ArenaConfig;
use skidfire_core::events::SimEvent;
use skidfire_core::state::ArenaSnapshot;
use skidfire_core::types::DriverInput;
use skidfire_sim::ArenaEngine;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "arena-sim: SKIDFIRE headless arena runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run the arena and print the final snapshot as JSON\n\
         \n\
           --ticks <N>        Ticks to run (default: 500)\n\
           --seed <S>         RNG seed (default: from config)\n\
           --throttle <T>     Constant throttle in [-1, 1] (default: 0)\n\
           --steer <S>        Constant steering in [-1, 1] (default: 0)\n\
           --config <path>    Arena config JSON (default: built-in arena)\n\
         \n\
         Examples:\n\
         \n\
           arena-sim run --ticks 1000 --throttle 1 --steer 0.3\n\
           RUST_LOG=debug arena-sim run --seed 7\n"
    );
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Error: invalid value for {flag}: {raw}");
            process::exit(1);
        }),
        None => default,
    }
}

fn load_config(args: &[String]) -> ArenaConfig {
    let Some(path) = flag_value(args, "--config").map(PathBuf::from) else {
        return ArenaConfig::default();
    };
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {e}", path.display());
        process::exit(1);
    })
}

fn cmd_run(args: &[String]) {
    let mut config = load_config(args);
    config.seed = parse_flag(args, "--seed", config.seed);
    let ticks: u64 = parse_flag(args, "--ticks", 500);
    let input = DriverInput::new(
        parse_flag(args, "--steer", 0.0),
        parse_flag(args, "--throttle", 0.0),
        false,
    );

    let mut engine = ArenaEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    engine.queue_command(PlayerCommand::StartArena);

    let Some(summary) = run_arena(&mut engine, ticks, input) else {
        eprintln!("Nothing to report: --ticks is 0");
        return;
    };
    let RunSummary {
        snapshot,
        shots,
        hits,
    } = summary;

    tracing::info!(
        ticks = snapshot.time.tick,
        shots,
        hits,
        battery = snapshot.vehicle.battery_level,
        "arena run complete"
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing snapshot: {e}");
            process::exit(1);
        }
    }
}

struct RunSummary {
    snapshot: ArenaSnapshot,
    shots: usize,
    hits: usize,
}

/// Tick `ticks` times with a constant input, tallying combat events from
/// every tick. `None` when no tick ran.
fn run_arena(engine: &mut ArenaEngine, ticks: u64, input: DriverInput) -> Option<RunSummary> {
    let mut shots = 0;
    let mut hits = 0;
    let mut last = None;
    for _ in 0..ticks {
        let snapshot = engine.tick(input);
        let (fired, hit) = count_combat_events(&snapshot.events);
        shots += fired;
        hits += hit;
        last = Some(snapshot);
    }
    last.map(|snapshot| RunSummary {
        snapshot,
        shots,
        hits,
    })
}

/// Shots fired and projectile hits among one tick's events.
fn count_combat_events(events: &[SimEvent]) -> (usize, usize) {
    events.iter().fold((0, 0), |(shots, hits), event| match event {
        SimEvent::ShotFired { .. } => (shots + 1, hits),
        SimEvent::ProjectileHit { .. } => (shots, hits + 1),
        _ => (shots, hits),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::DVec3;
    use skidfire_core::enums::Faction;

    #[test]
    fn test_count_combat_events() {
        let events = vec![
            SimEvent::ShotFired {
                faction: Faction::Player,
                origin: DVec3::ZERO,
                velocity: DVec3::Z,
            },
            SimEvent::DriftStarted,
            SimEvent::ProjectileHit {
                faction: Faction::Enemy,
                enemy_id: None,
                position: DVec3::ZERO,
            },
            SimEvent::ShotFired {
                faction: Faction::Enemy,
                origin: DVec3::ZERO,
                velocity: DVec3::X,
            },
        ];
        assert_eq!(count_combat_events(&events), (2, 1));
        assert_eq!(count_combat_events(&[]), (0, 0));
    }

    fn close_quarters_engine() -> ArenaEngine {
        let config = ArenaConfig {
            enemy_spawns: vec![DVec3::new(0.0, 0.0, 8.0)],
            obstacles: Vec::new(),
            ..ArenaConfig::default()
        };
        let mut engine = ArenaEngine::new(config).expect("valid config");
        engine.queue_command(PlayerCommand::StartArena);
        engine
    }

    #[test]
    fn test_zero_ticks_runs_nothing() {
        let mut engine = close_quarters_engine();
        assert!(run_arena(&mut engine, 0, DriverInput::idle()).is_none());
        // StartArena is still queued: no tick was taken.
        assert_eq!(engine.time().tick, 0);
    }

    #[test]
    fn test_run_counts_final_tick_events() {
        let mut reference = close_quarters_engine();
        let mut expected = (0, 0);
        for _ in 0..40 {
            let (fired, hit) = count_combat_events(&reference.tick(DriverInput::idle()).events);
            expected = (expected.0 + fired, expected.1 + hit);
        }
        // The first tick fires the player turret at point-blank range.
        assert!(expected.0 > 0);

        let mut engine = close_quarters_engine();
        let summary = run_arena(&mut engine, 40, DriverInput::idle()).expect("ticks ran");
        assert_eq!((summary.shots, summary.hits), expected);
        assert_eq!(summary.snapshot.time.tick, 40);

        let one = run_arena(&mut close_quarters_engine(), 1, DriverInput::idle())
            .expect("one tick ran");
        assert_eq!(one.shots, count_combat_events(&one.snapshot.events).0);
    }
}
