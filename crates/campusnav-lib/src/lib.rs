//! Campus navigation library entry points.
//!
//! This crate computes walking routes between campus locations. It weights
//! persisted path records according to a routing criterion, builds an
//! adjacency graph, runs Dijkstra, and aggregates the result into a
//! [`RouteResult`]. Data access goes through the collaborator traits in
//! [`routing::provider`]; [`CampusStore`] is the SQLite-backed implementation
//! shipped with the crate. Higher-level consumers (CLI, services) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod graph;
pub mod model;
pub mod output;
pub mod path;
pub mod routing;
pub mod store;
pub mod weight;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{Error, Result, RouteErrorKind};
pub use graph::{build_graph, EdgeIndex, Graph, GraphBuildOptions, GraphEdge};
pub use model::{
    ActorId, Criterion, Edge, EdgeId, HistoryEntry, Location, LocationId, LocationKind, Point,
};
pub use output::{HistoryStatus, RenderMode, RouteFailure, RouteResult};
pub use path::{find_route_dijkstra, reconstruct_path, ReconstructedPath, SearchOutcome};
pub use routing::provider::{
    EdgeProvider, HistoryReader, HistoryRecorder, InMemoryHistory, InMemoryNetwork,
    LocationProvider,
};
pub use routing::{NavigationRequest, Navigator};
pub use store::{default_database_path, CampusStore};
pub use weight::{edge_weight, WeightConfig};
