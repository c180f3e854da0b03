use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Criterion, Edge, LocationId};
use crate::weight::{edge_weight, WeightConfig};

/// Options controlling how path records become graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBuildOptions {
    /// Insert every retained record in both directions with the same weight.
    ///
    /// Defaults to `true`: campus walkways are usually stored once and walked
    /// both ways. Networks that model one-way passages (exit-only gates,
    /// turnstiles) must set this to `false` and store each direction they
    /// allow as its own record.
    pub symmetric: bool,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self { symmetric: true }
    }
}

/// Weighted adjacency entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub target: LocationId,
    pub weight: f64,
    /// Record this entry was derived from, in its stored orientation.
    pub edge: Edge,
}

impl GraphEdge {
    /// The source record oriented so that it ends at [`GraphEdge::target`].
    pub fn oriented_edge(&self) -> Edge {
        if self.edge.target == self.target {
            self.edge
        } else {
            self.edge.reversed()
        }
    }
}

/// Graph structure used by the shortest-path solver.
///
/// The adjacency map is shared, so clones are cheap and a built graph can be
/// cached and read concurrently. Only locations touched by at least one
/// retained record appear as keys.
#[derive(Debug, Clone)]
pub struct Graph {
    criterion: Criterion,
    adjacency: Arc<HashMap<LocationId, Vec<GraphEdge>>>,
    discarded: usize,
}

impl Graph {
    /// Criterion whose weighting produced this graph.
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Return the outgoing entries for a given location identifier.
    pub fn neighbours(&self, location: LocationId) -> &[GraphEdge] {
        self.adjacency
            .get(&location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any retained record touches `location`.
    pub fn contains(&self, location: LocationId) -> bool {
        self.adjacency.contains_key(&location)
    }

    /// Number of locations present in the graph.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of records rejected while building.
    pub fn discarded_edges(&self) -> usize {
        self.discarded
    }
}

/// Build the routing graph for `criterion` from the raw record set.
///
/// Records that are inactive, self-looping, have a non-positive distance or
/// time, or touch a location `is_passable` rejects are dropped. A record whose
/// weight cannot be computed is dropped with a warning; the rest of the graph
/// is still built.
pub fn build_graph<F>(
    edges: &[Edge],
    criterion: Criterion,
    config: &WeightConfig,
    options: &GraphBuildOptions,
    is_passable: F,
) -> Graph
where
    F: Fn(LocationId) -> bool,
{
    let mut adjacency: HashMap<LocationId, Vec<GraphEdge>> = HashMap::new();
    let mut discarded = 0usize;

    for edge in edges {
        if let Some(reason) = rejection_reason(edge, &is_passable) {
            debug!(edge = edge.id, reason, "skipping path record");
            discarded += 1;
            continue;
        }

        let weight = match edge_weight(edge, criterion, config) {
            Ok(weight) => weight,
            Err(err) => {
                warn!(
                    edge = edge.id,
                    %criterion,
                    error = %err,
                    "dropping edge with invalid weight"
                );
                discarded += 1;
                continue;
            }
        };

        adjacency.entry(edge.source).or_default().push(GraphEdge {
            target: edge.target,
            weight,
            edge: *edge,
        });

        let reverse = adjacency.entry(edge.target).or_default();
        if options.symmetric {
            reverse.push(GraphEdge {
                target: edge.source,
                weight,
                edge: *edge,
            });
        }
    }

    for entries in adjacency.values_mut() {
        entries.sort_by(|a, b| {
            compare_weight(a.weight, b.weight).then_with(|| a.target.cmp(&b.target))
        });
    }

    debug!(
        %criterion,
        symmetric = options.symmetric,
        locations = adjacency.len(),
        discarded,
        "built routing graph"
    );

    Graph {
        criterion,
        adjacency: Arc::new(adjacency),
        discarded,
    }
}

fn rejection_reason<F>(edge: &Edge, is_passable: &F) -> Option<&'static str>
where
    F: Fn(LocationId) -> bool,
{
    if !edge.is_active {
        return Some("inactive");
    }
    if edge.is_self_loop() {
        return Some("self-loop");
    }
    if !(edge.distance > 0.0) {
        return Some("non-positive distance");
    }
    if edge.time_cost <= 0 {
        return Some("non-positive time cost");
    }
    if !is_passable(edge.source) || !is_passable(edge.target) {
        return Some("endpoint not passable");
    }
    None
}

/// Lookup of the edge used to travel between two adjacent locations.
///
/// Built from a [`Graph`], so it reflects exactly the retained (and, for
/// symmetric graphs, mirrored) records. When parallel records join the same
/// ordered pair, the cheapest one wins, matching what the solver relaxed.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    edges: HashMap<(LocationId, LocationId), (f64, Edge)>,
}

impl EdgeIndex {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut edges: HashMap<(LocationId, LocationId), (f64, Edge)> = HashMap::new();
        for from in graph.locations() {
            for entry in graph.neighbours(from) {
                let candidate = (entry.weight, entry.oriented_edge());
                edges
                    .entry((from, entry.target))
                    .and_modify(|current| {
                        let cheaper = compare_weight(candidate.0, current.0)
                            .then_with(|| candidate.1.id.cmp(&current.1.id))
                            == Ordering::Less;
                        if cheaper {
                            *current = candidate;
                        }
                    })
                    .or_insert(candidate);
            }
        }
        Self { edges }
    }

    /// Edge travelled from `from` to `to`, oriented in travel direction.
    pub fn get(&self, from: LocationId, to: LocationId) -> Option<&Edge> {
        self.edges.get(&(from, to)).map(|(_, edge)| edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn compare_weight(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Greater)
}
