//! objstream Lab - writes and reads demo object graphs.
//!
//! Plays the caller role for objstream-engine: registers the demo types (or a
//! registry document from `OBJSTREAM_SCHEMA`), serializes each exercise to a
//! blob under `OBJSTREAM_DATA_DIR`, reads it back and logs both versions.

mod catalog;
mod config;
mod error;
mod lab;
mod store;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::lab::Lab;
use crate::store::BlobStore;
use objstream_engine::{Engine, SchemaRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn load_registry(config: &Config) -> Result<SchemaRegistry> {
    match &config.schema_path {
        Some(path) => {
            tracing::info!("Loading schema registry from {}", path.display());
            let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
            Ok(SchemaRegistry::from_json(&json)?)
        }
        None => Ok(catalog::demo_registry()?),
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "objstream_lab=info,objstream_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = load_registry(&config)?;
    tracing::info!("Registered {} types", registry.len());
    tracing::debug!(schema = %registry.to_json()?, "schema registry");

    let store = BlobStore::open(&config.data_dir)?;
    tracing::info!("Writing blobs to {}", store.dir().display());

    let lab = Lab::new(Engine::with_registry(registry), store);
    if let Err(e) = lab.run_all() {
        tracing::error!("Lab run failed: {}", e);
        return Err(e.into());
    }

    tracing::info!("All exercises completed");
    Ok(())
}
