//! Polyclimb headless runner
//!
//! Plays a run with the demo autopilot at a fixed frame rate and logs what
//! happens. `RUST_LOG=debug` shows platform streaming too.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use polyclimb::sim::{Signal, SignalKind, autopilot};
use polyclimb::{Game, Tuning};

/// An endless vertical climber, played by the autopilot.
#[derive(Debug, Parser)]
#[command(name = "polyclimb", version, about)]
struct Args {
    /// Tuning file (JSON). Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Run seed. Random if not set.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to play before stopping
    #[arg(long, default_value = "60", value_name = "SECS")]
    seconds: f32,

    /// Presentation frame rate
    #[arg(long, default_value = "60", value_name = "HZ")]
    fps: f32,

    /// Print the default tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("loading tuning file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.dump_tuning {
        println!("{}", Tuning::default().to_json()?);
        return Ok(());
    }
    anyhow::ensure!(args.fps > 0.0, "fps must be positive, got {}", args.fps);

    let tuning = load_tuning(args.tuning.as_ref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut game = Game::new(tuning, seed)?;
    log::info!("Polyclimb (headless) starting, seed {}", seed);

    for kind in [
        SignalKind::PlayerLeveledUp,
        SignalKind::PlayerDied,
        SignalKind::SwapTriggered,
        SignalKind::Swapped,
        SignalKind::GameEnded,
    ] {
        game.state.hub.subscribe(kind, |signal: &Signal| {
            log::info!("signal: {:?}", signal);
        });
    }

    let frame_dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).max(0.0) as u64;
    let mut cues = 0u64;
    for _ in 0..frames {
        let input = autopilot(&game.state);
        game.set_input(&input);
        game.update(frame_dt);
        cues += game.audio.drain().len() as u64;
        if game.is_game_over() {
            break;
        }
    }

    let view = game.hud_view();
    println!("seed:   {}", seed);
    println!("score:  {}", view.final_score.as_deref().unwrap_or(&view.score));
    println!("sides:  {}", game.state.player.level());
    println!("lives:  {}", view.lives);
    println!("cues:   {}", cues);
    println!(
        "status: {}",
        if game.is_game_over() { "game over" } else { "still climbing" }
    );
    Ok(())
}
