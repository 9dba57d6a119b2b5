pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Product catalog API - categories and products behind JWT authentication")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply database migrations and exit")]
    Migrate,

    #[command(about = "Issue a bearer token with the configured signing key")]
    Token {
        #[arg(help = "Subject (username) to embed in the token")]
        username: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

    // Fail before binding anything if the signing key or other settings are unusable
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting catalog API in {:?} mode", config.environment);

    match cli.command {
        None => commands::serve::handle(config, commands::serve::ServeArgs::default()).await,
        Some(Commands::Serve(args)) => commands::serve::handle(config, args).await,
        Some(Commands::Migrate) => commands::migrate::handle(config).await,
        Some(Commands::Token { username }) => commands::token::handle(config, &username, output_format),
    }
}
