#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tower Defence headlessly.
//!
//! # Commands
//!
//! - `tower-defence play` - run a game with a scripted builder and a text renderer
//! - `tower-defence scores` - print the leaderboard
//! - `tower-defence path` - generate one path on an empty grid and print it

mod autobuild;
mod scene;
mod terminal;

use std::{
    collections::HashSet,
    fs,
    io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_defence_core::{Event, GameConfig, GameMode, ScoreStore, TICKS_PER_SECOND};
use tower_defence_leaderboard::FileLeaderboard;
use tower_defence_rendering::{cues_from_events, AssetManifest, AudioSink, RenderingBackend};
use tower_defence_simulation::{PlayerAction, Session};
use tower_defence_system_pathing::PathGenerator;
use tower_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::terminal::{leaderboard_lines, path_map, CueTally, TerminalRenderer};

/// Tower Defence - headless runner
#[derive(Parser)]
#[command(name = "tower-defence")]
#[command(about = "Plays Tower Defence in the terminal")]
#[command(version)]
struct Cli {
    /// Game configuration file (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Leaderboard file, one score per line
    #[arg(long, global = true, default_value = "scores.txt")]
    scores: PathBuf,

    /// Seed for path generation and wave rosters; random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a game with a scripted builder
    Play(PlayArgs),

    /// Print the leaderboard
    Scores,

    /// Generate one path on an empty grid and print it
    Path,
}

#[derive(Args)]
struct PlayArgs {
    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = 60 * 60 * 30)]
    max_ticks: u64,

    /// Draw the board every N ticks; 0 draws only the final screen
    #[arg(long, default_value_t = 600)]
    render_every: u64,

    /// Sleep between ticks to run at game speed
    #[arg(long)]
    realtime: bool,

    /// Sprite manifest (TOML); placeholders are drawn when omitted
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());

    match cli.command {
        Commands::Play(args) => play(config, &cli.scores, seed, &args),
        Commands::Scores => print_scores(&cli.scores),
        Commands::Path => print_path(&config, seed),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))
}

fn play(config: GameConfig, scores: &Path, seed: u64, args: &PlayArgs) -> Result<()> {
    let assets = match &args.assets {
        Some(path) => AssetManifest::from_path(path)?,
        None => AssetManifest::default(),
    };
    let mut renderer = TerminalRenderer::new(io::stdout(), assets);
    let mut audio = CueTally::default();

    let mut session = Session::new(config, FileLeaderboard::new(scores), seed)
        .context("failed to start session")?;
    info!(seed, "starting headless game");
    session.handle(PlayerAction::StartGame);
    react(&mut session, &mut audio);

    let tick_period = Duration::from_secs_f64(1.0 / f64::from(TICKS_PER_SECOND));
    let mut ticks = 0;
    while session.mode() == GameMode::Game && ticks < args.max_ticks {
        session.tick();
        ticks += 1;
        react(&mut session, &mut audio);

        if args.render_every > 0 && ticks % args.render_every == 0 {
            renderer.present(&scene::capture(&session))?;
        }
        if args.realtime {
            thread::sleep(tick_period);
        }
    }

    renderer.present(&scene::capture(&session))?;
    let economy = query::economy(session.world());
    match session.final_score() {
        Some(score) if session.mode() == GameMode::GameOver => {
            println!("defeated on wave {} with score {score}", economy.wave);
        }
        Some(score) => println!("all {} waves cleared with score {score}", economy.total_waves),
        None => println!("stopped after {ticks} ticks on wave {}", economy.wave),
    }
    println!("shots: {}", audio.summary());
    println!("seed: {seed}");
    Ok(())
}

/// Plays the cues of the last step and lets the scripted builder spend coins at wave start.
fn react<S: ScoreStore>(session: &mut Session<S>, audio: &mut impl AudioSink) {
    for cue in cues_from_events(session.events()) {
        audio.play(cue);
    }

    let wave = session.events().iter().find_map(|event| match event {
        Event::WaveStarted { wave, .. } => Some(*wave),
        _ => None,
    });
    if let Some(wave) = wave {
        if let Some(kind) = autobuild::build_for_wave(session) {
            info!(wave, tower = kind.name(), "auto-builder placed a tower");
        }
    }
}

fn print_scores(path: &Path) -> Result<()> {
    let scores = FileLeaderboard::new(path)
        .load()
        .with_context(|| format!("failed to load leaderboard at {}", path.display()))?;
    print!("{}", leaderboard_lines(&scores));
    Ok(())
}

fn print_path(config: &GameConfig, seed: u64) -> Result<()> {
    config.validate().context("invalid configuration")?;
    let grid = config.grid.tile_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let path = PathGenerator::new(config.pathing)
        .generate(&grid, &HashSet::new(), &mut rng)
        .context("path generation exhausted its retry budget")?;

    let waypoints: Vec<String> = path
        .waypoints()
        .iter()
        .map(|tile| format!("({}, {})", tile.column(), tile.row()))
        .collect();
    println!("seed {seed}: {} tiles via {}", path.tiles().len(), waypoints.join(" "));
    print!("{}", path_map(&grid, path.tiles()));
    Ok(())
}
