//! ttt - Tic-tac-toe over a reconcile controller
//!
//! Usage:
//!   ttt new [--id ID] [--move SLOT]   - Create a game
//!   ttt move <ID> <SLOT>              - Request a move
//!   ttt show <ID>                     - Print a game
//!   ttt list                          - List all games
//!   ttt reconcile <ID>                - Reconcile a game until it settles
//!   ttt play [--id ID]                - Play interactively
//!
//! Every command that changes a game runs the controller until the game
//! is quiet again, so the computer's reply is already stored on return.

mod commands;
mod context;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    ListCommand, MoveCommand, NewCommand, PlayCommand, ReconcileCommand, ShowCommand,
};
use context::AppContext;

#[derive(Parser)]
#[command(name = "ttt")]
#[command(about = "Tic-tac-toe as a declarative resource")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Controller config file (JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Game store file, overrides the config
    #[arg(short, long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a game
    New(NewCommand),
    /// Request a move in a game
    Move(MoveCommand),
    /// Print a game
    Show(ShowCommand),
    /// List all games
    List(ListCommand),
    /// Reconcile a game until it settles
    Reconcile(ReconcileCommand),
    /// Play a game interactively
    Play(PlayCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries boards and JSON only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::load(cli.config.as_deref(), cli.store, cli.json)?;

    match cli.command {
        Commands::New(cmd) => cmd.run(&mut ctx).await,
        Commands::Move(cmd) => cmd.run(&mut ctx).await,
        Commands::Show(cmd) => cmd.run(&ctx),
        Commands::List(cmd) => cmd.run(&ctx),
        Commands::Reconcile(cmd) => cmd.run(&ctx).await,
        Commands::Play(cmd) => cmd.run(&mut ctx).await,
    }
}
