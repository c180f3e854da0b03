//! Route command handler for computing walking routes between locations.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::debug;

use campusnav_lib::{ActorId, Criterion, GraphBuildOptions, NavigationRequest, Navigator};

use super::{load_weights, open_store, resolve};
use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting location name or id.
    pub from: String,
    /// Destination location name or id.
    pub to: String,
    pub criterion: Criterion,
    /// Record the route in this user's history.
    pub actor: Option<ActorId>,
    /// Treat every path record as one-way.
    pub one_way: bool,
}

impl RouteCommandArgs {
    pub fn graph_options(&self) -> GraphBuildOptions {
        GraphBuildOptions {
            symmetric: !self.one_way,
        }
    }
}

/// Handle the route subcommand.
///
/// The rendered result is printed even when routing fails, so JSON consumers
/// always receive the error kind; the command still exits non-zero.
pub fn handle_route_command(
    db_path: &Path,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(db_path)?;
    let weights = load_weights(&store)?;
    let source = resolve(&store, &args.from)?;
    let target = resolve(&store, &args.to)?;
    debug!(source, target, ?weights, one_way = args.one_way, "resolved route request");

    let navigator = Navigator::new(&store, &store, &store)
        .with_weights(weights)
        .with_graph_options(args.graph_options());

    let mut request = NavigationRequest::new(source, target).with_criterion(args.criterion);
    if let Some(actor) = args.actor {
        request = request.with_actor(actor);
    }

    let result = navigator.navigate(&request);
    print!("{}", format.render_route(&result)?);

    if let Some(failure) = &result.error {
        bail!("route failed [{}]: {}", failure.kind, failure.message);
    }
    Ok(())
}
