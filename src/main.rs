//! Pose Catch entry point
//!
//! Headless runner: plays one seeded session against a scripted classifier
//! and logs every notification. Webcam capture and rendering live elsewhere.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pose_catch::Tuning;
use pose_catch::sim::{Engine, GameEvent, GameState, Zone};

#[derive(Parser, Debug)]
#[command(about = "Play a headless Pose Catch session with a scripted player", version)]
struct Args {
    /// RNG seed for spawns and the scripted player
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Give up after this much simulated time
    #[arg(long, default_value_t = 180)]
    max_secs: u64,
    /// Simulated frame length
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Interval between classifier labels
    #[arg(long, default_value_t = 250)]
    pose_ms: u64,
    /// Chance a classifier label is noise
    #[arg(long, default_value_t = 0.1)]
    noise: f64,
}

/// Stand-in for the pose classifier: heads for the oldest fruit, away from bombs
fn scripted_label(state: &GameState, rng: &mut Pcg32, noise: f64) -> &'static str {
    if rng.random::<f64>() < noise {
        return "UNCERTAIN";
    }
    let target = state
        .items
        .iter()
        .find(|item| item.kind.is_fruit())
        .map(|item| item.zone)
        .unwrap_or(Zone::Center);
    target.as_str()
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    let tuning = Tuning::from_json(&json)
        .with_context(|| format!("loading tuning from {}", path.display()))?;
    Ok(tuning)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ItemCreated { item, .. } => {
            let (emoji, lane) = (item.kind.emoji(), item.zone.as_str());
            log::debug!("{emoji} #{} falls in {lane}", item.id);
        }
        GameEvent::BasketMoved { zone } => log::debug!("basket -> {}", zone.as_str()),
        GameEvent::ScoreChanged {
            score,
            level,
            miss_count,
            max_misses,
            combo,
        } => {
            let status = format!("level {level} | misses {miss_count}/{max_misses}");
            log::info!("score {score} | {status} | combo {combo}");
        }
        GameEvent::ItemRemoved { .. } => {}
        GameEvent::GameEnded { reason, .. } => log::info!("game ended: {reason}"),
    }
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
    let args = Args::parse();
    let tuning = load_tuning(args.tuning.as_ref())?;
    log::info!("Pose Catch (headless) starting with seed {}", args.seed);

    let mut engine = Engine::new(args.seed, tuning)?;
    engine.subscribe(Box::new(log_event));

    let mut player = Pcg32::seed_from_u64(args.seed.wrapping_add(1));
    let frame_ms = args.frame_ms.max(1);
    let max_ms = args.max_secs * 1000;

    engine.start(0);
    let mut now = 0;
    let mut next_pose = 0;
    while engine.is_active() && now < max_ms {
        now += frame_ms;
        if now >= next_pose {
            let label = scripted_label(engine.state(), &mut player, args.noise);
            engine.on_pose_detected(label);
            next_pose = now + args.pose_ms;
        }
        engine.frame(now);
    }

    match engine.last_summary() {
        Some(summary) => println!(
            "Game over ({}) after {:.1}s: score {}, level {}, {} fruits caught",
            summary.reason,
            summary.duration_ms as f64 / 1000.0,
            summary.score,
            summary.level,
            summary.fruits_caught
        ),
        None => {
            let score = engine.state().score;
            engine.stop();
            println!("Stopped after {}s with score {score}", args.max_secs);
        }
    }
    Ok(())
}
