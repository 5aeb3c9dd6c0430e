pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, SecurityConfig};

#[derive(Parser)]
#[command(name = "tools-manufacturer-api")]
#[command(about = "REST backend for the tools manufacturer storefront")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides PORT")]
        port: Option<u16>,

        #[arg(long, help = "Use an in-process store instead of MongoDB; data is lost on exit")]
        in_memory: bool,
    },

    #[command(about = "Print a signed credential for an email (needs only ACCESS_TOKEN_SECRET)")]
    Token {
        #[arg(long, help = "Email to embed in the identity claim")]
        email: String,
    },
}

/// Dispatch a command, loading only the configuration it needs.
///
/// Configuration failures surface as `ConfigError` inside the returned error.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None, in_memory: false }) {
        Commands::Serve { port, in_memory } => {
            let config = AppConfig::from_env()?;
            commands::serve::handle(config, port, in_memory).await
        }
        Commands::Token { email } => {
            let security = SecurityConfig::from_env()?;
            commands::token::handle(&security, &email)
        }
    }
}
