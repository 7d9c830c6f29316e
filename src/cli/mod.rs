pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "staff")]
#[command(about = "Staff CLI - Administrative commands for the Staff API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print a bcrypt digest for a password")]
    HashPassword(commands::password::HashPasswordArgs),

    #[command(about = "Create a user in the configured database")]
    CreateUser(commands::user::CreateUserArgs),

    #[command(about = "Sign an access token with the configured secret")]
    IssueToken(commands::token::IssueTokenArgs),

    #[command(about = "Decode and check an access token")]
    VerifyToken(commands::token::VerifyTokenArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::HashPassword(args) => commands::password::handle(&config, args, output_format),
        Commands::CreateUser(args) => commands::user::handle(&config, args, output_format).await,
        Commands::IssueToken(args) => commands::token::handle_issue(&config, args, output_format),
        Commands::VerifyToken(args) => commands::token::handle_verify(&config, args, output_format),
    }
}
