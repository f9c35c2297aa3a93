//! Headless driver: plays simulated trials and exports the log.
//!
//! Stands in for the browser host. It fires the settle signals an animation
//! runtime would, picks a random shell for the participant, then writes the
//! CSV export.

use chrono::{Duration, Utc};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shell_game::config::MOVE_LIMIT_PRESETS;
use shell_game::core::BoardGeometry;
use shell_game::{GameSession, LayoutId, SessionError};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Play simulated shell game trials and export the results
#[derive(Parser, Debug)]
#[command(name = "shell-game")]
#[command(about = "Simulate shell game trials and export the trial log", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of trials to play
    #[arg(short, long, default_value = "5")]
    trials: u32,

    /// Shuffles per trial
    #[arg(short, long, default_value = "3")]
    moves: u32,

    /// Transition speed in milliseconds
    #[arg(short, long, default_value = "200")]
    speed: u32,

    /// Participant name recorded with every trial
    #[arg(short, long, default_value = "")]
    participant: String,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Export format
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,

    /// Directory to write the CSV into; prints to stdout when omitted.
    /// JSON always goes to stdout.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !MOVE_LIMIT_PRESETS.contains(&cli.moves) {
        warn!(moves = cli.moves, "move limit is not one of the standard presets");
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut picker = StdRng::seed_from_u64(cli.seed.unwrap_or_else(rand::random).wrapping_add(1));

    let mut session = GameSession::with_rng(BoardGeometry::default(), rng);
    session.set_difficulty(cli.moves)?;
    session.set_speed(cli.speed)?;
    session.set_participant_name(cli.participant.clone())?;

    for trial in 1..=cli.trials {
        let started = Utc::now();
        let start = session.start_trial_at(started)?;
        play_animations(&mut session, start);

        let pick = picker.gen_range(0..session.machine().geometry().shell_count);
        let think_time = Duration::milliseconds(picker.gen_range(400..3000));
        let record = session.select_shell_at(pick, started + think_time)?;
        info!(trial, correct = record.is_correct, "trial finished");
    }

    if session.logger().is_empty() {
        warn!("no trials were played");
        eprintln!("No trial data recorded; nothing to export.");
        return Ok(());
    }

    match (cli.format, &cli.output_dir) {
        (Format::Csv, Some(dir)) => {
            let path = session.write_csv(dir, Utc::now().date_naive())?;
            println!("{}", path.display());
        }
        (Format::Csv, None) => println!("{}", session.export()?),
        (Format::Json, _) => println!("{}", session.logger().export_json()?),
    }
    Ok(())
}

/// Report every animation as finished, in the order a browser would.
fn play_animations(session: &mut GameSession, start: LayoutId) {
    let shells = session.machine().geometry().shell_count;
    let mut layout = session.on_ball_reveal_settled(start);

    while let Some(current) = layout {
        layout = (0..shells)
            .filter_map(|shell| session.on_shell_animation_settled(current, shell))
            .last();
    }
}
