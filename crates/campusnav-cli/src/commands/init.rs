//! Init command handler: create an empty campus database.

use std::path::Path;

use anyhow::{Context, Result};

use campusnav_lib::CampusStore;

pub fn handle_init_command(db_path: &Path) -> Result<()> {
    CampusStore::create(db_path)
        .with_context(|| format!("failed to initialise {}", db_path.display()))?;
    println!("Campus database ready at {}", db_path.display());
    Ok(())
}
