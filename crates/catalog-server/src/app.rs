//! Startup: open the store, prepare the schema and data, build the app.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use catalog_commerce::seed::seed_catalog;
use catalog_db::{SqliteDb, Store};
use catalog_observability::Logger;

use crate::config::ServerConfig;
use crate::router::build_router;
use crate::state::AppState;

/// Open the configured database and create the catalog tables.
pub async fn open_store(config: &ServerConfig, logger: &Logger) -> Result<Store> {
    let db_file = config.db_file.trim();
    if config.fresh_start && !db_file.is_empty() {
        remove_database(Path::new(db_file))?;
    }

    let db = SqliteDb::connect(db_file)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", db_file))?;
    let store = Store::new(Arc::new(db), logger.with_field("component", "store"));
    store
        .migrate(&catalog_commerce::TABLES)
        .await
        .context("Failed to migrate database")?;
    Ok(store)
}

fn remove_database(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove database file {}", path.display())),
    }
}

/// Everything up to a router ready to serve.
pub async fn build_app(config: &ServerConfig, logger: &Logger) -> Result<Router> {
    let store = open_store(config, logger).await?;
    let state = AppState::new(store, logger.clone());

    if config.seed {
        seed_catalog(&state.categories, &state.products, &state.discounts, logger)
            .await
            .context("Failed to insert initial data")?;
    }

    Ok(build_router(state, config.request_timeout()))
}
