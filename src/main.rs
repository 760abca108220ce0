use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use weatherdesk::api::AppState;
use weatherdesk::{
    OpenWeatherClient, RecordStore, WeatherDeskConfig, WeatherLookupService, telemetry, web,
};

#[derive(Parser)]
#[command(name = "weatherdesk", version)]
#[command(about = "Weather lookup and record-keeping service")]
struct Cli {
    /// Path to a TOML config file (default: ./weatherdesk.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve one location and print the snapshot as JSON
    Lookup {
        /// Coordinates ("lat,lon"), postal code, or place name
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let mut config = WeatherDeskConfig::load_from_path(cli.config)?;
    let telemetry = telemetry::init(&config.logging)?;

    let client = OpenWeatherClient::new(&config.provider)?;
    let lookup = WeatherLookupService::new(Arc::new(client));

    let outcome = match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let store = RecordStore::open(config.storage_path()).with_context(|| {
                format!("Failed to open record store at {}", config.storage.path)
            })?;
            web::run(AppState::new(lookup, store), &config.server).await
        }
        Command::Lookup { query } => lookup_once(&lookup, &query).await,
    };

    telemetry.shutdown();
    outcome
}

async fn lookup_once(lookup: &WeatherLookupService, query: &str) -> Result<()> {
    let snapshot = lookup
        .resolve_weather(query)
        .await
        .with_context(|| format!("Lookup failed for '{query}'"))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
