//! Nearby command handler: locations one walkway away within a radius.

use std::path::Path;

use anyhow::{Context, Result};

use campusnav_lib::{GraphBuildOptions, Navigator};

use super::{open_store, resolve};
use crate::output::OutputFormat;

pub fn handle_nearby_command(
    db_path: &Path,
    from: &str,
    radius: f64,
    one_way: bool,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;
    let origin = resolve(&store, from)?;
    let navigator = Navigator::new(&store, &store, &store)
        .with_graph_options(GraphBuildOptions { symmetric: !one_way });

    let nearby = navigator
        .nearby_locations(origin, radius)
        .context("failed to list nearby locations")?;
    print!("{}", format.render_locations(&nearby)?);
    Ok(())
}
