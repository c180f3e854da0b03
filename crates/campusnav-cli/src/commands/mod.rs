// Module exports for CLI subcommands
//
// Each module handles one subcommand; main.rs only parses arguments and
// dispatches to these handlers.

pub mod history;
pub mod init;
pub mod nearby;
pub mod recommend;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};

use campusnav_lib::{CampusStore, LocationId, WeightConfig};

/// Open an existing campus database.
pub fn open_store(db_path: &Path) -> Result<CampusStore> {
    CampusStore::open(db_path)
        .with_context(|| format!("failed to open campus database {}", db_path.display()))
}

/// Weight multipliers from the database with environment overrides applied.
pub fn load_weights(store: &CampusStore) -> Result<WeightConfig> {
    let stored = store
        .weight_config()
        .context("failed to read weight configuration")?;
    stored
        .with_env_overrides()
        .context("invalid weight override in environment")
}

/// Resolve a location given by name or numeric id.
pub fn resolve(store: &CampusStore, input: &str) -> Result<LocationId> {
    store
        .resolve_location(input)
        .with_context(|| format!("could not resolve location '{input}'"))
}
