//! Quarry CLI - inspect the artifact repositories a build would resolve against

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(author = "Quarry Contributors")]
#[command(version)]
#[command(about = "Provision Maven, Ivy and flat directory artifact repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every repository declared in a repositories file
    Resolve {
        /// Repositories file (defaults to ~/.config/quarry/repositories.yaml)
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where the local Maven repository lives
    Local {
        /// Repositories file (defaults to ~/.config/quarry/repositories.yaml)
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
    },
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Resolve { file, json } => commands::resolve::run(file.as_deref(), json),
        Commands::Local { file } => commands::local::run(file.as_deref()),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
