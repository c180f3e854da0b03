use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{EdgeIndex, Graph};
use crate::model::{Edge, Location, LocationId};
use crate::routing::provider::LocationProvider;

/// Result of a completed shortest-path search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Summed weight of the optimal path under the graph's criterion.
    pub cost: f64,
    /// Predecessor of every location relaxed during the search.
    pub predecessors: HashMap<LocationId, LocationId>,
    /// Number of locations finalized before the goal was reached.
    pub settled: usize,
}

/// Run Dijkstra's algorithm from `start` until `goal` is finalized.
///
/// Fails with [`Error::RouteNotFound`] when either endpoint is absent from the
/// graph or the frontier empties first. Frontier ties are broken by location
/// id, so identical input always yields the identical path.
pub fn find_route_dijkstra(
    graph: &Graph,
    start: LocationId,
    goal: LocationId,
) -> Result<SearchOutcome> {
    if start == goal {
        return Err(Error::SameEndpoint { id: start });
    }
    if !graph.contains(start) || !graph.contains(goal) {
        debug!(start, goal, "endpoint has no usable edges");
        return Err(Error::RouteNotFound { start, goal });
    }

    let mut distances: HashMap<LocationId, f64> = HashMap::new();
    let mut predecessors: HashMap<LocationId, LocationId> = HashMap::new();
    let mut finalized: HashSet<LocationId> = HashSet::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let best = distances.get(&entry.node).copied().unwrap_or(f64::INFINITY);
        // Stale entry superseded by a cheaper push.
        if entry.cost.0 > best || !finalized.insert(entry.node) {
            continue;
        }

        if entry.node == goal {
            debug!(start, goal, cost = best, settled = finalized.len(), "goal finalized");
            return Ok(SearchOutcome {
                cost: best,
                predecessors,
                settled: finalized.len(),
            });
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if finalized.contains(&next) {
                continue;
            }

            let next_cost = best + edge.weight;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                predecessors.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    debug!(start, goal, settled = finalized.len(), "frontier exhausted");
    Err(Error::RouteNotFound { start, goal })
}

/// Ordered locations and traversed edges of a reconstructed route.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedPath {
    pub locations: Vec<Location>,
    pub edges: Vec<Edge>,
}

/// Walk predecessor links back from `goal`, resolve every location and check
/// that each consecutive pair is joined by an indexed edge.
pub fn reconstruct_path<L>(
    search: &SearchOutcome,
    start: LocationId,
    goal: LocationId,
    locations: &L,
    index: &EdgeIndex,
) -> Result<ReconstructedPath>
where
    L: LocationProvider + ?Sized,
{
    let mut path = Vec::new();
    let mut current = goal;
    // A predecessor chain can never be longer than the map itself.
    let max_len = search.predecessors.len() + 1;

    loop {
        let location = locations
            .find_location(current)?
            .ok_or(Error::LocationMissing { id: current })?;
        path.push(location);

        if current == start {
            break;
        }
        if path.len() > max_len {
            warn!(start, goal, "predecessor chain loops");
            return Err(Error::PathDiscontinuity {
                from: start,
                to: current,
            });
        }

        current = match search.predecessors.get(&current) {
            Some(&previous) => previous,
            None => {
                warn!(start, goal, at = current, "predecessor chain ends before start");
                return Err(Error::PathDiscontinuity {
                    from: start,
                    to: current,
                });
            }
        };
    }
    path.reverse();

    let mut edges = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        let (from, to) = (pair[0].id, pair[1].id);
        match index.get(from, to) {
            Some(edge) => edges.push(*edge),
            None => {
                warn!(from, to, "no edge joins consecutive path locations");
                return Err(Error::PathDiscontinuity { from, to });
            }
        }
    }

    Ok(ReconstructedPath {
        locations: path,
        edges,
    })
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: LocationId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: LocationId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
