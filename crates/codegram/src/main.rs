//! codegram CLI - turn source code into diagrams.
//!
//! Provides commands for:
//! - `generate`: Generate and render one diagram from a file or stdin
//! - `session`: Interactive session with a code buffer and display region

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, SessionArgs};
use error::CliError;
use output::Output;

/// codegram - code to diagram.
#[derive(Parser)]
#[command(name = "codegram", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a diagram from source code.
    Generate(GenerateArgs),
    /// Start an interactive session.
    Session(SessionArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Generate(args) => args.common.verbose,
            Self::Session(args) => args.common.verbose,
        }
    }

    async fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Generate(args) => args.execute().await,
            Self::Session(args) => args.execute().await,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr; stdout carries rendered documents
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Session state is single-threaded, so everything runs on one thread
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::from)
        .and_then(|rt| rt.block_on(cli.command.execute()));

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
