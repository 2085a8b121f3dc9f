//! Batting cage entry point
//!
//! Runs a headless session with the demo batter and prints the final
//! scoreboard as JSON.
//!
//! Usage: `batting-cage [seed] [seconds] [--difficulty <name>] [--settings <path>]`

use std::path::Path;

use batting_cage::consts::SIM_DT;
use batting_cage::sim::{FixedClock, SimEvent, SimState, TickInput, tick};
use batting_cage::{Difficulty, Settings};

/// Simulated display refresh for the headless loop
const FRAME_DT: f32 = 1.0 / 60.0;

const DEFAULT_SEED: u64 = 0x00ba_5eba_11;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: batting-cage [seed] [seconds] [options]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --difficulty <name>  rookie, pro or allstar (default: from settings)");
        eprintln!("  --settings <path>    Settings JSON file (default: built-in tunables)");
        return;
    }

    let positional = positional_args(&args);
    let seed = positional
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let seconds = positional
        .get(1)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(60.0);

    let mut settings = match find_arg(&args, "--settings") {
        Some(path) => Settings::load_or_default(Path::new(&path)),
        None => Settings::default(),
    };
    // An explicit difficulty overrides the one stored in the settings file
    if let Some(name) = find_arg(&args, "--difficulty") {
        match Difficulty::from_str(&name) {
            Some(difficulty) => settings.apply_difficulty(difficulty),
            None => log::warn!(
                "Unknown difficulty '{name}', keeping {}",
                settings.difficulty.as_str()
            ),
        }
    }

    let mut state = SimState::new(seed, settings);
    log::info!(
        "Batting cage starting: seed {}, {seconds:.0} s, {}",
        state.seed,
        state.settings.difficulty.as_str()
    );
    let mut clock = FixedClock::new();
    let mut input = TickInput {
        auto_bat: true,
        ..Default::default()
    };

    let frames = (seconds / FRAME_DT).ceil() as usize;
    for _ in 0..frames {
        for _ in 0..clock.advance(FRAME_DT) {
            tick(&mut state, &input, SIM_DT);
            // Clear one-shot inputs after processing
            input.swing = false;
            input.reset = false;
        }
        for event in state.drain_events() {
            match event {
                SimEvent::PitchLaunched { kind, speed } => {
                    log::debug!("{} {:.1} m/s", kind.as_str(), speed);
                }
                SimEvent::Result(result) => match result.exit_velocity {
                    Some(mph) => log::info!("{:?} ({mph:.1} mph)", result.label),
                    None => log::info!("{:?}", result.label),
                },
            }
        }
    }

    log::info!("Simulated {} ticks", clock.ticks);
    match serde_json::to_string_pretty(&state.stats) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize stats: {e}"),
    }
}

fn find_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

/// Arguments that are neither a flag nor a flag's value
fn positional_args(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg);
        }
    }
    out
}
