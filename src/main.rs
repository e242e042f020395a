//! Data REST API service.
//!
//! Usage:
//!   data-service --port 5000
//!
//! Every option can also come from the environment (`PORT`, `DEBUG`, ...).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use data_service::api::{self, AppState};
use data_service::{telemetry, Config, DataRepository, InMemoryStore, Payload};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    telemetry::setup_tracing(config.debug);

    info!("Data service starting...");
    let repo = DataRepository::new(InMemoryStore::new());

    if let Some(path) = &config.seed {
        let loaded = repo
            .load(read_seed(path)?)
            .with_context(|| format!("Failed to load seed data from {:?}", path))?;
        info!("Loaded {} Data from {:?}", loaded.len(), path);
    }

    let state = AppState::new(repo, config.store_timeout());
    api::serve(state, &config.listen_addr())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

fn read_seed(path: &Path) -> Result<Vec<Payload>> {
    let text = fs::read_to_string(path).context("Failed to read seed file")?;
    let values: Vec<Value> = serde_json::from_str(&text).context("Seed file must be a JSON array")?;
    values
        .into_iter()
        .map(|value| Payload::json(value).context("Seed entries must be JSON objects"))
        .collect()
}
