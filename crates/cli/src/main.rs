//! Dropcast CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dropcast-cli migrate
//!
//! # Seed a demo store with one drop (local development)
//! dropcast-cli seed --slug lunargear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with a demo store and drop

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dropcast-cli")]
#[command(author, version, about = "Dropcast CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a demo store and drop
    Seed {
        /// Store name
        #[arg(short, long, default_value = "Lunar Gear")]
        name: String,

        /// Store slug (used in bot commands and deep links)
        #[arg(short, long, default_value = "lunargear")]
        slug: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { name, slug } => commands::seed::demo_store(&name, &slug).await?,
    }
    Ok(())
}
