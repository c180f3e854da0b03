#![allow(dead_code)]

use std::path::PathBuf;

use campusnav_lib::{
    Edge, EdgeProvider, Error, HistoryEntry, HistoryRecorder, InMemoryNetwork, Location,
    LocationProvider, Point, Result,
};

pub const MAIN_GATE: i64 = 1;
pub const LIBRARY: i64 = 2;
pub const ROSE_GARDEN: i64 = 3;
pub const CAFETERIA: i64 = 4;
pub const OBSERVATORY: i64 = 5;
pub const WORKSHOP: i64 = 6;

fn location(id: i64, name: &str, x: f64, y: f64) -> Location {
    Location::new(id, name, Point::new(x, y))
}

fn edge(id: i64, source: i64, target: i64, distance: f64, time_cost: i32) -> Edge {
    Edge::new(id, source, target, distance, time_cost)
}

pub fn campus_locations() -> Vec<Location> {
    vec![
        location(MAIN_GATE, "Main Gate", 0.0, 0.0),
        Location {
            has_shade: true,
            ..location(LIBRARY, "Library", 100.0, 0.0)
        },
        Location {
            scenic_level: 5,
            ..location(ROSE_GARDEN, "Rose Garden", 0.0, 90.0)
        },
        location(CAFETERIA, "Cafeteria", 100.0, 90.0),
        location(OBSERVATORY, "Observatory", 200.0, 200.0),
        Location {
            is_accessible: false,
            ..location(WORKSHOP, "Workshop", 150.0, 150.0)
        },
    ]
}

/// One record per walkway; the default symmetric build makes them two-way.
///
/// - Main Gate -> Library -> Cafeteria: 200 m, fully shaded
/// - Main Gate -> Rose Garden -> Cafeteria: 180 m, scenic level 5
/// - Main Gate -> Cafeteria: 150 m direct
/// - Cafeteria -> Workshop -> Observatory: only way in, Workshop is closed
pub fn campus_edges() -> Vec<Edge> {
    vec![
        Edge {
            has_shade: true,
            ..edge(1, MAIN_GATE, LIBRARY, 100.0, 2)
        },
        Edge {
            has_shade: true,
            ..edge(2, LIBRARY, CAFETERIA, 100.0, 2)
        },
        Edge {
            scenic_level: 5,
            ..edge(3, MAIN_GATE, ROSE_GARDEN, 90.0, 2)
        },
        Edge {
            scenic_level: 5,
            ..edge(4, ROSE_GARDEN, CAFETERIA, 90.0, 2)
        },
        edge(5, MAIN_GATE, CAFETERIA, 150.0, 3),
        edge(6, CAFETERIA, WORKSHOP, 50.0, 1),
        edge(7, WORKSHOP, OBSERVATORY, 50.0, 1),
        Edge {
            is_active: false,
            ..edge(8, LIBRARY, OBSERVATORY, 10.0, 1)
        },
    ]
}

pub fn campus() -> InMemoryNetwork {
    InMemoryNetwork::new(campus_locations(), campus_edges())
}

pub fn scratch_db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("campus.db")
}

/// Recorder that refuses every entry.
pub struct RejectingRecorder;

impl HistoryRecorder for RejectingRecorder {
    fn record(&self, _entry: &HistoryEntry) -> Result<()> {
        Err(Error::InvalidInput {
            message: "history store is read-only".to_string(),
        })
    }
}

/// Edge provider whose backing store is unreachable.
pub struct UnreachableEdges;

impl EdgeProvider for UnreachableEdges {
    fn list_active_edges(&self) -> Result<Vec<Edge>> {
        Err(Error::DatabaseNotFound {
            path: PathBuf::from("/nonexistent/campus.db"),
        })
    }
}

/// Location provider that knows nothing, used alongside raw edge lists.
pub struct NoLocations;

impl LocationProvider for NoLocations {
    fn find_location(&self, _id: i64) -> Result<Option<Location>> {
        Ok(None)
    }

    fn is_accessible(&self, _id: i64) -> Result<bool> {
        Ok(true)
    }
}
