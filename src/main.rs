//! Asteroid Field headless driver
//!
//! Runs the simulation with a scripted autopilot standing in for the
//! keyboard, one tick per frame, and reports how the run went.
//!
//! Usage: asteroid-field [--seed N] [--frames N] [--dt SECONDS] [--tuning FILE] [--json]

use std::path::PathBuf;
use std::process::ExitCode;

use asteroid_field::consts::SIM_DT;
use asteroid_field::renderer::DisplayList;
use asteroid_field::sim::{GameEvent, GameState, Snapshot, TickInput, tick};
use asteroid_field::{Tuning, normalize_angle};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "asteroid-field")]
#[command(about = "Run the asteroid field simulation headless under a scripted autopilot")]
struct Options {
    /// Seed for the simulation RNG
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 60 * 60)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = SIM_DT, value_parser = parse_dt)]
    dt: f32,
    /// JSON tuning file; missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the final snapshot as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

fn parse_dt(value: &str) -> Result<f32, String> {
    let dt: f32 = value.parse().map_err(|e| format!("{e}"))?;
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err("must be a positive number of seconds".to_string())
    }
}

/// Keyboard stand-in: turn toward the nearest rock and shoot when lined up
struct Autopilot {
    fire_held: bool,
}

impl Autopilot {
    fn new() -> Self {
        Self { fire_held: false }
    }

    fn input(&mut self, state: &GameState, frame: u32) -> TickInput {
        let mut input = TickInput::default();
        let ship = &state.ship;
        if !ship.is_alive() {
            self.fire_held = false;
            return input;
        }

        let nearest = state.asteroids.iter().min_by(|a, b| {
            a.pos
                .distance(ship.pos)
                .partial_cmp(&b.pos.distance(ship.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(target) = nearest {
            let to_target = target.pos - ship.pos;
            // Nose is a quarter turn ahead of the rotation
            let wanted = to_target.y.atan2(to_target.x) - std::f32::consts::FRAC_PI_2;
            let error = normalize_angle(wanted - ship.rot);

            if error > 0.05 {
                input.rotate_right = true;
            } else if error < -0.05 {
                input.rotate_left = true;
            }

            // Fire is an edge: release between shots
            let aligned = error.abs() < 0.2;
            let want_fire = aligned && frame % 8 == 0;
            input.fire = want_fire && !self.fire_held;
            self.fire_held = want_fire;

            input.thrust = to_target.length() > 250.0 && frame % 3 == 0;
        }

        input
    }
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut state = GameState::with_tuning(tuning, options.seed)?;
    log::info!(
        "Starting run: seed {}, {} frames at {:.4}s",
        options.seed,
        options.frames,
        options.dt
    );

    let mut autopilot = Autopilot::new();
    let mut rocks_destroyed = 0u32;
    let mut aliens_destroyed = 0u32;
    let mut deaths = 0u32;
    let mut games = 1u32;
    let mut best_score = 0u64;

    for frame in 0..options.frames {
        let input = autopilot.input(&state, frame);
        tick(&mut state, &input, options.dt);
        best_score = best_score.max(state.score);

        for event in &state.events {
            match event {
                GameEvent::AsteroidDestroyed { .. } => rocks_destroyed += 1,
                GameEvent::AlienDestroyed { .. } => aliens_destroyed += 1,
                GameEvent::ShipDestroyed { pos } => {
                    deaths += 1;
                    log::debug!("Frame {frame}: ship lost at {pos:?}");
                }
                GameEvent::GameReset => games += 1,
                _ => {}
            }
        }
    }

    let snapshot = Snapshot::capture(&state);
    let display = DisplayList::from_snapshot(&snapshot);
    log::info!(
        "Finished at t={:.1}s: score {}, best {}, lives {}, games {}",
        state.now,
        state.score,
        best_score,
        state.lives,
        games
    );
    log::info!(
        "Destroyed {} asteroids and {} aliens, lost {} ships",
        rocks_destroyed,
        aliens_destroyed,
        deaths
    );
    log::info!(
        "Last frame: {} strokes, {} dots",
        display.lines.len(),
        display.dots.len()
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "score {} (best {}), lives {}, games {}, asteroids destroyed {}, aliens destroyed {}",
            state.score, best_score, state.lives, games, rocks_destroyed, aliens_destroyed
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = Options::parse();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
