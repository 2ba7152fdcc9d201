//! Store Ratings CLI - Seed data and validation tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the demo dataset as JSON
//! sr-cli seed
//!
//! # Write the demo dataset to a file
//! sr-cli seed --output seed.json
//!
//! # Check that a dataset loads
//! sr-cli verify-seed seed.json
//!
//! # Run one validation rule
//! sr-cli check signup-password 'Passw0rd!'
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

use commands::check::Rule;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Store Ratings CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo dataset as JSON
    Seed {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a seed file loads into the Data Store
    VerifySeed {
        /// Seed file to check
        file: PathBuf,
    },
    /// Run one validation rule against a value
    Check {
        /// Rule to apply
        #[arg(value_enum)]
        rule: Rule,

        /// Value to check
        value: String,

        /// Confirmation value for `password-confirmation`
        #[arg(long)]
        confirm: Option<String>,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `seed` output stays clean JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { output } => commands::seed::export_demo(output.as_deref())?,
        Commands::VerifySeed { file } => commands::seed::verify(&file)?,
        Commands::Check {
            rule,
            value,
            confirm,
        } => {
            commands::check::run(rule, &value, confirm.as_deref())?;
            tracing::info!(?rule, "Value passes");
        }
    }
    Ok(())
}
