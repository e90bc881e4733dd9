//! Harmattan CLI - Database migrations and asset processing.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! hmt-cli migrate
//!
//! # Produce the transparent loading-screen logo
//! hmt-cli logo
//! hmt-cli logo --input public/logo.png --output public/loading-logo.png
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `logo` - Strip the near-black background from the store logo

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hmt-cli")]
#[command(author, version, about = "Harmattan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Rewrite near-black logo pixels as transparent for the loading screen
    Logo {
        /// Source bitmap
        #[arg(long, default_value = "public/logo.png")]
        input: PathBuf,

        /// Destination bitmap
        #[arg(long, default_value = "public/loading-logo.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Logo { input, output } => commands::logo::run(&input, &output)?,
    }
    Ok(())
}
