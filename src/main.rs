mod elements;
mod predict;
mod store;
mod telemetry;
mod tracker;
mod web;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::elements::{ElementStore, ElementsError};
use crate::predict::{GeodeticPoint, GroundTrack, Propagator};
use crate::store::{ElementTable, RecordStore};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "iss-watch")]
#[command(about = "ISS live tracking and orbit prediction service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracking loop and the web API
    Serve {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Fetch a fresh element set from the publication source and persist it
    RefreshTle {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
    /// Print a predicted ground track as JSON
    Predict {
        #[arg(long, default_value = "config.yaml")]
        config: String,
        #[arg(long)]
        horizon_seconds: Option<i64>,
        #[arg(long)]
        step_seconds: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::RefreshTle { config } => refresh_tle(&config).await,
        Commands::Predict {
            config,
            horizon_seconds,
            step_seconds,
        } => predict(&config, horizon_seconds, step_seconds).await,
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config {}: {}", path, e);
            None
        }
    }
}

fn element_store(config: &Config) -> Result<ElementStore, ElementsError> {
    let record_store = Arc::new(RecordStore::new(&config.store.url, &config.store.api_key)?);
    ElementStore::new(
        Box::new(ElementTable::new(
            record_store,
            config.store.elements_table.clone(),
        )),
        config.elements.source_url.clone(),
    )
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn refresh_tle(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let store = match element_store(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match store.refresh().await {
        Ok(set) => {
            println!("Refreshed element set '{}' (epoch {})", set.name, set.epoch);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Refresh failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn predict(path: &str, horizon_seconds: Option<i64>, step_seconds: Option<i64>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let store = match element_store(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let set = match store.current().await {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let propagator = match Propagator::from_element_set(&set) {
        Ok(propagator) => propagator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let horizon = horizon_seconds.unwrap_or(config.predict.horizon_seconds);
    let step = step_seconds.unwrap_or(config.predict.step_seconds);

    let track = match GroundTrack::new(&propagator, Utc::now(), horizon, step) {
        Ok(track) => track,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let points: Vec<GeodeticPoint> = track.collect();
    match serde_json::to_string_pretty(&points) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
