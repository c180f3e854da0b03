//! History command handler: list or clear a user's navigation history.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use campusnav_lib::{ActorId, HistoryReader, LocationProvider};

use super::open_store;
use crate::output::OutputFormat;

pub fn handle_history_command(
    db_path: &Path,
    actor: ActorId,
    clear: bool,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;

    if clear {
        let removed = store
            .clear_history(actor)
            .with_context(|| format!("failed to clear history for user {actor}"))?;
        println!("Removed {removed} history entries for user {actor}");
        return Ok(());
    }

    let entries = store
        .history_for_actor(actor)
        .with_context(|| format!("failed to read history for user {actor}"))?;

    let mut names = HashMap::new();
    for id in entries.iter().flat_map(|entry| [entry.source, entry.target]) {
        if names.contains_key(&id) {
            continue;
        }
        if let Some(location) = store.find_location(id)? {
            names.insert(id, location.name);
        }
    }

    print!("{}", format.render_history(&entries, &names)?);
    Ok(())
}
