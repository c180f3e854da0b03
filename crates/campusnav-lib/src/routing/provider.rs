//! Collaborator interfaces consumed by the [`super::Navigator`].
//!
//! The navigator never reaches for global state: it is handed one
//! implementation of each trait. [`crate::CampusStore`] implements all of them
//! on top of SQLite; [`InMemoryNetwork`] and [`InMemoryHistory`] serve tests
//! and callers that already hold the network in memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::model::{ActorId, Edge, HistoryEntry, Location, LocationId};

/// Source of the path records the graph is built from.
pub trait EdgeProvider: Send + Sync {
    /// Every record the data owner currently considers usable.
    fn list_active_edges(&self) -> Result<Vec<Edge>>;
}

/// Authoritative lookup of location records.
pub trait LocationProvider: Send + Sync {
    fn find_location(&self, id: LocationId) -> Result<Option<Location>>;

    /// Whether pedestrians may pass through `id`.
    ///
    /// Unknown locations report `true`; a dangling reference is detected when
    /// the route is reconstructed.
    fn is_accessible(&self, id: LocationId) -> Result<bool>;
}

/// Write side of navigation history.
pub trait HistoryRecorder: Send + Sync {
    fn record(&self, entry: &HistoryEntry) -> Result<()>;
}

/// Read side of navigation history.
pub trait HistoryReader: Send + Sync {
    /// Entries for `actor`, newest first.
    fn history_for_actor(&self, actor: ActorId) -> Result<Vec<HistoryEntry>>;

    /// Delete every entry for `actor`, returning how many were removed.
    fn clear_history(&self, actor: ActorId) -> Result<usize>;
}

/// Location and edge snapshot held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNetwork {
    locations: HashMap<LocationId, Location>,
    edges: Vec<Edge>,
}

impl InMemoryNetwork {
    pub fn new(locations: Vec<Location>, edges: Vec<Edge>) -> Self {
        Self {
            locations: locations
                .into_iter()
                .map(|location| (location.id, location))
                .collect(),
            edges,
        }
    }

    /// All stored records, including inactive ones.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }
}

impl EdgeProvider for InMemoryNetwork {
    fn list_active_edges(&self) -> Result<Vec<Edge>> {
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.is_active)
            .copied()
            .collect())
    }
}

impl LocationProvider for InMemoryNetwork {
    fn find_location(&self, id: LocationId) -> Result<Option<Location>> {
        Ok(self.locations.get(&id).cloned())
    }

    fn is_accessible(&self, id: LocationId) -> Result<bool> {
        Ok(self
            .locations
            .get(&id)
            .map_or(true, |location| location.is_accessible))
    }
}

/// History log kept in memory, newest entry last.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded entry in insertion order.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryRecorder for InMemoryHistory {
    fn record(&self, entry: &HistoryEntry) -> Result<()> {
        entry.validate()?;
        self.lock().push(entry.clone());
        Ok(())
    }
}

impl HistoryReader for InMemoryHistory {
    fn history_for_actor(&self, actor: ActorId) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .lock()
            .iter()
            .filter(|entry| entry.actor == actor)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    fn clear_history(&self, actor: ActorId) -> Result<usize> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.actor != actor);
        Ok(before - entries.len())
    }
}
