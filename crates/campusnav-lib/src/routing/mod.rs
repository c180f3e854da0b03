//! Navigation orchestration for campus walking routes.
//!
//! This module provides:
//! - [`NavigationRequest`] - Endpoints, criterion and optional actor
//! - [`Navigator`] - Entry point driving graph build, search, reconstruction
//!   and aggregation
//! - [`provider`] - Collaborator traits for edge, location and history data
//!
//! # Failure model
//!
//! [`Navigator::navigate`] never returns an `Err`: every failure is folded
//! into a [`RouteResult`] with `success == false` and a [`RouteErrorKind`].
//! Callers that prefer `?` can use [`Navigator::compute`] directly.
//!
//! # Example
//!
//! ```ignore
//! use campusnav_lib::{CampusStore, Criterion, NavigationRequest, Navigator};
//!
//! let store = CampusStore::open("campus.db")?;
//! let navigator = Navigator::new(&store, &store, &store).with_weights(store.weight_config()?);
//! let request = NavigationRequest::new(1, 3).with_criterion(Criterion::Scenic);
//! let result = navigator.navigate(&request);
//! println!("{} m in {} min", result.total_distance, result.total_time);
//! ```
//!
//! [`RouteErrorKind`]: crate::RouteErrorKind

pub mod provider;

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{build_graph, EdgeIndex, Graph, GraphBuildOptions};
use crate::model::{ActorId, Criterion, Edge, Location, LocationId};
use crate::output::{HistoryStatus, RouteResult};
use crate::path::{find_route_dijkstra, reconstruct_path};
use crate::weight::WeightConfig;

use provider::{EdgeProvider, HistoryReader, HistoryRecorder, LocationProvider};

/// High-level navigation request.
///
/// Endpoints are optional so that callers forwarding unvalidated input get an
/// `INVALID_INPUT` result rather than having to pre-check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationRequest {
    pub source: Option<LocationId>,
    pub target: Option<LocationId>,
    /// Defaults to [`Criterion::Shortest`] when absent.
    pub criterion: Option<Criterion>,
    /// When present, a successful route is written to the history recorder.
    pub actor: Option<ActorId>,
}

impl NavigationRequest {
    /// Convenience constructor for a shortest-path request without an actor.
    pub fn new(source: LocationId, target: LocationId) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
            criterion: None,
            actor: None,
        }
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = Some(criterion);
        self
    }

    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }
}

/// Route engine bound to its data collaborators.
///
/// The navigator holds no mutable state: each call fetches a fresh snapshot
/// and builds its own graph, so one instance can serve concurrent callers.
pub struct Navigator<'a> {
    edges: &'a dyn EdgeProvider,
    locations: &'a dyn LocationProvider,
    history: &'a dyn HistoryRecorder,
    weights: WeightConfig,
    options: GraphBuildOptions,
}

impl<'a> Navigator<'a> {
    /// Create a navigator with default weights and symmetric graph building.
    pub fn new(
        edges: &'a dyn EdgeProvider,
        locations: &'a dyn LocationProvider,
        history: &'a dyn HistoryRecorder,
    ) -> Self {
        Self {
            edges,
            locations,
            history,
            weights: WeightConfig::default(),
            options: GraphBuildOptions::default(),
        }
    }

    pub fn with_weights(mut self, weights: WeightConfig) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_graph_options(mut self, options: GraphBuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute a route and, on success with an actor, record it.
    ///
    /// Validation order: both endpoints present (`INVALID_INPUT`), endpoints
    /// distinct (`SAME_ENDPOINT`); a missing criterion becomes `SHORTEST`.
    /// History recording is best-effort and reported through
    /// [`RouteResult::history`].
    pub fn navigate(&self, request: &NavigationRequest) -> RouteResult {
        let criterion = request.criterion.unwrap_or_default();

        let outcome = validate_endpoints(request).and_then(|(source, target)| {
            info!(source, target, %criterion, "computing route");
            self.compute(source, target, criterion)
        });

        match outcome {
            Ok(mut result) => {
                info!(
                    distance = result.total_distance,
                    minutes = result.total_time,
                    hops = result.hop_count(),
                    "route computed"
                );
                if let Some(actor) = request.actor {
                    result.history = self.record_history(actor, &result);
                }
                result
            }
            Err(err) => {
                warn!(
                    source = ?request.source,
                    target = ?request.target,
                    kind = %err.kind(),
                    error = %err,
                    "route computation failed"
                );
                RouteResult::failure(criterion, &err)
            }
        }
    }

    /// Run the full pipeline without touching history.
    pub fn compute(
        &self,
        source: LocationId,
        target: LocationId,
        criterion: Criterion,
    ) -> Result<RouteResult> {
        if source == target {
            return Err(Error::SameEndpoint { id: source });
        }
        let graph = self.build_graph(criterion)?;
        self.route_on(&graph, source, target)
    }

    /// Fetch the current snapshot and build the graph for `criterion`.
    ///
    /// Exposed so that embedding services can cache the graph between calls
    /// and feed it back through [`Navigator::route_on`].
    pub fn build_graph(&self, criterion: Criterion) -> Result<Graph> {
        let edges = self.edges.list_active_edges()?;
        let accessibility = self.accessibility_snapshot(&edges)?;
        debug!(
            edges = edges.len(),
            blocked = accessibility.values().filter(|open| !**open).count(),
            "fetched network snapshot"
        );

        Ok(build_graph(
            &edges,
            criterion,
            &self.weights,
            &self.options,
            |id| accessibility.get(&id).copied().unwrap_or(true),
        ))
    }

    /// Search, reconstruct and aggregate on a prepared graph.
    pub fn route_on(
        &self,
        graph: &Graph,
        source: LocationId,
        target: LocationId,
    ) -> Result<RouteResult> {
        let search = find_route_dijkstra(graph, source, target)?;
        let index = EdgeIndex::from_graph(graph);
        let path = reconstruct_path(&search, source, target, self.locations, &index)?;
        RouteResult::from_path(graph.criterion(), path.locations, path.edges)
    }

    /// Recompute a route the actor has taken before, using the criterion of
    /// their most recent matching history entry.
    ///
    /// Returns `Ok(None)` when the actor has never navigated between these
    /// endpoints. Routing failures come back as a failed [`RouteResult`];
    /// only history read errors are returned as `Err`. Nothing is recorded.
    pub fn recommend(
        &self,
        reader: &dyn HistoryReader,
        actor: ActorId,
        source: LocationId,
        target: LocationId,
    ) -> Result<Option<RouteResult>> {
        if source == target {
            return Err(Error::SameEndpoint { id: source });
        }

        let history = reader.history_for_actor(actor)?;
        let Some(previous) = history
            .iter()
            .find(|entry| entry.source == source && entry.target == target)
        else {
            debug!(actor, source, target, "no matching history entry");
            return Ok(None);
        };

        let criterion = previous.criterion;
        debug!(actor, source, target, %criterion, "reusing criterion from history");
        let result = self
            .compute(source, target, criterion)
            .unwrap_or_else(|err| RouteResult::failure(criterion, &err));
        Ok(Some(result))
    }

    /// Locations one walkable record away from `location` within `radius`
    /// meters, closest first.
    ///
    /// Only outgoing records count for one-way graphs; symmetric graphs also
    /// consider records pointing at `location`.
    pub fn nearby_locations(&self, location: LocationId, radius: f64) -> Result<Vec<Location>> {
        if !(radius > 0.0) {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<(f64, LocationId)> = self
            .edges
            .list_active_edges()?
            .iter()
            .filter(|edge| !edge.is_self_loop() && edge.distance <= radius)
            .filter_map(|edge| self.neighbour_across(edge, location))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut seen = HashSet::new();
        let mut nearby = Vec::new();
        for (_, id) in candidates {
            if !seen.insert(id) {
                continue;
            }
            match self.locations.find_location(id)? {
                Some(found) => nearby.push(found),
                None => debug!(id, "skipping nearby location without a record"),
            }
        }
        Ok(nearby)
    }

    // =========================================================================
    // Helper Functions
    // =========================================================================

    fn neighbour_across(&self, edge: &Edge, location: LocationId) -> Option<(f64, LocationId)> {
        if edge.source == location {
            Some((edge.distance, edge.target))
        } else if self.options.symmetric && edge.target == location {
            Some((edge.distance, edge.source))
        } else {
            None
        }
    }

    /// Query accessibility once per location referenced by `edges`.
    fn accessibility_snapshot(&self, edges: &[Edge]) -> Result<HashMap<LocationId, bool>> {
        let mut snapshot = HashMap::new();
        for edge in edges {
            for id in [edge.source, edge.target] {
                if !snapshot.contains_key(&id) {
                    snapshot.insert(id, self.locations.is_accessible(id)?);
                }
            }
        }
        Ok(snapshot)
    }

    fn record_history(&self, actor: ActorId, result: &RouteResult) -> HistoryStatus {
        let Some(entry) = result.history_entry(actor, Utc::now()) else {
            return HistoryStatus::NotRequested;
        };

        match entry.validate().and_then(|()| self.history.record(&entry)) {
            Ok(()) => {
                debug!(actor, "navigation history recorded");
                HistoryStatus::Recorded
            }
            Err(err) => {
                warn!(actor, error = %err, "failed to record navigation history");
                HistoryStatus::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Check that both endpoints are present and distinct.
fn validate_endpoints(request: &NavigationRequest) -> Result<(LocationId, LocationId)> {
    let (Some(source), Some(target)) = (request.source, request.target) else {
        return Err(Error::invalid_input(
            "start and destination must both be provided",
        ));
    };
    if source == target {
        return Err(Error::SameEndpoint { id: source });
    }
    Ok((source, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteErrorKind;
    use crate::test_helpers::line_network;
    use provider::InMemoryHistory;

    #[test]
    fn missing_endpoint_is_invalid_input() {
        let network = line_network();
        let history = InMemoryHistory::new();
        let navigator = Navigator::new(&network, &network, &history);

        let request = NavigationRequest {
            source: Some(1),
            ..NavigationRequest::default()
        };
        let result = navigator.navigate(&request);
        assert_eq!(result.error_kind(), Some(RouteErrorKind::InvalidInput));
    }

    #[test]
    fn missing_criterion_defaults_to_shortest() {
        let network = line_network();
        let history = InMemoryHistory::new();
        let navigator = Navigator::new(&network, &network, &history);

        let result = navigator.navigate(&NavigationRequest::new(1, 3));
        assert!(result.success);
        assert_eq!(result.criterion, Criterion::Shortest);
    }

    #[test]
    fn actor_less_request_leaves_history_untouched() {
        let network = line_network();
        let history = InMemoryHistory::new();
        let navigator = Navigator::new(&network, &network, &history);

        let result = navigator.navigate(&NavigationRequest::new(1, 3));
        assert_eq!(result.history, HistoryStatus::NotRequested);
        assert!(history.entries().is_empty());
    }

    #[test]
    fn nearby_ignores_non_positive_radius() {
        let network = line_network();
        let history = InMemoryHistory::new();
        let navigator = Navigator::new(&network, &network, &history);
        assert!(navigator.nearby_locations(2, 0.0).unwrap().is_empty());
        assert_eq!(navigator.nearby_locations(2, 3.0).unwrap().len(), 2);
    }
}
