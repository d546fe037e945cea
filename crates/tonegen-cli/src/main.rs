//! tonegen - interactive tone generator.

mod commands;
mod display;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tonegen")]
#[command(author, version, about = "Interactive tone generator", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config file if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive tone session
    Play(commands::play::PlayArgs),

    /// Show the note name and cents for a frequency
    Note(commands::note::NoteArgs),

    /// Draw the static preview of a waveform
    Preview(commands::preview::PreviewArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// Show or create the configuration file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Play(args) => commands::play::run(args, config),
        Commands::Note(args) => commands::note::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Config(args) => commands::config::run(args, config),
    }
}
