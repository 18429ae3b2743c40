//! # iopaneld — panel controller daemon
//!
//! Composition root that loads the configuration, builds the hub, and runs
//! the configured entities until shutdown.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Construct the hub over the bus transport
//! - Build one adapter per configured entity, sharing the hub
//! - Forward state-change signals to the log
//! - Handle graceful shutdown (SIGINT), returning every hub lease
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod registry;

use std::sync::Arc;

use iopanel_entities::notify::StateBus;
use iopanel_hub::bus::StubBus;
use iopanel_hub::hub::Hub;

use crate::config::Config;
use crate::registry::AnyEntity;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let hub = Hub::new(Arc::new(StubBus));
    let state_bus = StateBus::new(256);

    // A host integration would re-read the entity here; the daemon just
    // makes the signal visible.
    let mut changes = state_bus.subscribe();
    let change_logger = tokio::spawn(async move {
        while let Ok(change) = changes.recv().await {
            tracing::debug!(unique_id = %change.unique_id, "state changed");
        }
    });

    let mut entities = Vec::new();
    for entry in &config.entities {
        match AnyEntity::setup(&hub, entry, Arc::clone(&state_bus) as _) {
            Ok(entity) => {
                tracing::info!(
                    platform = entry.platform.as_str(),
                    unique_id = entity.unique_id(),
                    name = entry.name.as_deref().unwrap_or_default(),
                    "entity ready"
                );
                entities.push(entity);
            }
            Err(err) => {
                tracing::error!(
                    platform = entry.platform.as_str(),
                    error = %err,
                    "entity setup failed"
                );
                for entity in entities {
                    entity.shutdown().await;
                }
                change_logger.abort();
                return Err(err.into());
            }
        }
    }
    tracing::info!(count = entities.len(), "iopaneld running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    for entity in entities {
        entity.shutdown().await;
    }
    change_logger.abort();

    Ok(())
}
