//! Rubik's Cube Viewer
//!
//! Shows the state of a Rubik's cube held by a puzzle backend: a flat net of
//! the six faces and an interactive 3D model of its pieces. Face turns are
//! sent to the backend, and the intermediate snapshots it returns are played
//! back before the new state is committed.

mod visualization;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cubeview::cube::{sticker_tally, CubeMove, StickerColor};
use cubeview::net::format_net;
use cubeview::{AppConfig, BackendClient, Dispatcher, Request};

/// Visual client for a Rubik's cube backend.
#[derive(Parser)]
#[command(name = "cubeview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the puzzle backend.
    #[arg(long, global = true)]
    server: Option<String>,
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Milliseconds each animation frame stays on screen.
    #[arg(long, global = true)]
    frame_interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive 3D viewer.
    View,
    /// Fetch the current state and print the face net.
    Show,
    /// Apply one move and print the resulting face net.
    Apply {
        /// One of U, UPrime, U2, D, ..., B2.
        #[arg(value_name = "MOVE")]
        cube_move: CubeMove,
    },
    /// List the available moves and their key bindings.
    Moves,
}

fn main() -> cubeview::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::View) {
        Command::View => visualization::display(&config),
        Command::Show => run_show(&config),
        Command::Apply { cube_move } => run_apply(&config, cube_move),
        Command::Moves => {
            run_moves();
            Ok(())
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Reads the configuration file, if any, then applies command line overrides.
fn load_config(cli: &Cli) -> cubeview::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(interval) = cli.frame_interval_ms {
        config.animation.frame_interval_ms = interval;
    }
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn dispatcher(config: &AppConfig) -> cubeview::Result<Dispatcher> {
    Dispatcher::new(BackendClient::new(&config.server)?)
}

/// Fetches the current state and prints it.
fn run_show(config: &AppConfig) -> cubeview::Result<()> {
    let response = dispatcher(config)?.block_on(Request::Fetch)?;
    if response.faces.is_empty() {
        println!("Backend has no faces to show");
    } else {
        print!("{}", format_net(&response.faces));
    }

    let tally = sticker_tally(&response.pieces);
    println!("{} pieces", response.pieces.len());
    for color in StickerColor::ALL {
        println!("  {:?}: {}", color, tally.get(&color).copied().unwrap_or(0));
    }
    Ok(())
}

/// Applies a single move and prints the outcome.
fn run_apply(config: &AppConfig, cube_move: CubeMove) -> cubeview::Result<()> {
    let response = dispatcher(config)?.block_on(Request::Move(cube_move))?;
    println!("{}: {} animation frames", cube_move, response.animation.len());
    print!("{}", format_net(&response.faces));
    Ok(())
}

/// Prints the move toolbar with its key bindings.
fn run_moves() {
    for row in CubeMove::ALL.chunks(3) {
        let line: Vec<String> = row
            .iter()
            .map(|&cube_move| {
                let name = cube_move.to_string();
                format!("{name:<7} {:<8}", visualization::binding(cube_move))
            })
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}
