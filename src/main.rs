mod commands;
mod config;
mod file_io;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Command;
use config::Config;

/// Map annotation slides with per-slide undo history
#[derive(Parser, Debug)]
#[command(name = "mapslides")]
#[command(version, about, long_about = None)]
struct Args {
    /// Deck file to operate on
    #[arg(long, value_name = "PATH")]
    deck: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/mapslides/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let deck_path = config.deck_path(args.deck);

    let mut registry = file_io::load_deck(&deck_path, config.defaults)?;
    let status = commands::run(&mut registry, &args.command)?;

    if !args.command.is_read_only() {
        file_io::save_deck(&registry, &deck_path)?;
    }
    println!("{status}");
    Ok(())
}
