//! Server configuration and shared application state.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bettercal_core::Datasets;

use crate::usage::UsageStore;

/// Environment-driven configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the csv lookup resources.
    pub resources_dir: PathBuf,
    /// Path of the sqlite usage database.
    pub database: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(8080),
            resources_dir: env::var("BETTERCAL_RESOURCES")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resources")),
            database: env::var("BETTERCAL_DB").unwrap_or_else(|_| "bettercal.db".to_string()),
        }
    }
}

/// Shared application state. Datasets are read-only after startup, so
/// handlers share them without locking.
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<Datasets>,
    pub usage: UsageStore,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let datasets = Datasets::load(&config.resources_dir).with_context(|| {
            format!(
                "loading lookup datasets from {}",
                config.resources_dir.display()
            )
        })?;
        let usage = UsageStore::open(&config.database).await?;

        Ok(Self {
            datasets: Arc::new(datasets),
            usage,
        })
    }
}
