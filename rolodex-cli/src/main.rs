//! Rolodex CLI - user records in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{create, setup, show, update};

/// Rolodex - manage remote user records from the terminal
#[derive(Parser)]
#[command(name = "rolo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the user-record API endpoint
    Setup {
        /// API base URL, e.g. https://api.example.com
        base_url: String,
        /// API key sent as x-api-key (optional)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Create a new user record
    Create {
        /// Full name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Role (optional)
        #[arg(long)]
        role: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user record
    Show {
        /// Record identifier
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an existing user record
    Update {
        /// Record identifier
        id: String,
        /// New full name (defaults to the current value)
        #[arg(long)]
        name: Option<String>,
        /// New email address (defaults to the current value)
        #[arg(long)]
        email: Option<String>,
        /// New role (defaults to the current value)
        #[arg(long)]
        role: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Setup { base_url, api_key } => setup::run(&base_url, api_key),
        Commands::Create {
            name,
            email,
            role,
            json,
        } => create::run(name, email, role, json).await,
        Commands::Show { id, json } => show::run(&id, json).await,
        Commands::Update {
            id,
            name,
            email,
            role,
            json,
        } => update::run(&id, name, email, role, json).await,
    }
}
