mod commands;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use model::DEFAULT_SMOOTHING_WINDOW;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Climb detection and route marks", long_about = None)]
struct Cli {
    /// Log detector internals
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect climbs on a CSV profile and merge them with its metadata
    Detect(commands::DetectArgs),
    /// List the marks stored in a profile's metadata
    Marks(commands::ProfileArgs),
    /// Show the sample closest to a km position
    Nearest {
        profile: PathBuf,
        km: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Detect(args) => commands::detect(&args, &mut out),
        Command::Marks(args) => commands::marks(&args, &mut out),
        Command::Nearest { profile, km } => {
            commands::nearest(&profile, km, DEFAULT_SMOOTHING_WINDOW, &mut out)
        }
    }
}
