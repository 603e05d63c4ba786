use anyhow::Context;
use clap::{Parser, Subcommand};
use user_api_starter::infrastructure::logging;
use user_api_starter::{server, AppConfig};

/// User API - session-authenticated user directory service
#[derive(Parser)]
#[command(name = "user-api")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let config = AppConfig::load().context("Failed to load configuration")?;
            logging::init_logging(&config.logging);

            server::run(config).await
        }
    }
}
