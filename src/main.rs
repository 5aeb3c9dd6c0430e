use clap::Parser;
use tools_manufacturer_api::cli::Cli;
use tools_manufacturer_api::config::{ConfigError, Environment};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so local runs pick up ACCESS_TOKEN_SECRET, DB_USER, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Environment::from_env().default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = tools_manufacturer_api::cli::run(cli).await {
        // Missing secrets are fatal before anything else starts
        if let Some(config_error) = e.downcast_ref::<ConfigError>() {
            eprintln!("Configuration error: {config_error}");
            std::process::exit(2);
        }

        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
