//! Recommend command handler: repeat the criterion a user chose last time.

use std::path::Path;

use anyhow::{bail, Result};

use campusnav_lib::{ActorId, Navigator};

use super::{load_weights, open_store, resolve};
use crate::output::OutputFormat;

pub fn handle_recommend_command(
    db_path: &Path,
    actor: ActorId,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;
    let source = resolve(&store, from)?;
    let target = resolve(&store, to)?;
    let navigator = Navigator::new(&store, &store, &store).with_weights(load_weights(&store)?);

    let Some(result) = navigator.recommend(&store, actor, source, target)? else {
        println!("No previous route from {from} to {to} for user {actor}.");
        return Ok(());
    };

    print!("{}", format.render_route(&result)?);
    if let Some(failure) = &result.error {
        bail!("route failed [{}]: {}", failure.kind, failure.message);
    }
    Ok(())
}
