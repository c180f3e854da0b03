//! SQLite persistence for the campus network, navigation history and
//! weight configuration.
//!
//! [`CampusStore`] implements every collaborator trait in
//! [`crate::routing::provider`], so one store can back a whole
//! [`crate::Navigator`]. Nullable columns are normalised here: a missing
//! scenic level reads as 1, a missing kind as [`LocationKind::Other`], a
//! missing accessibility flag as accessible and a missing distance or time
//! as 0, which the graph builder then discards.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    ActorId, Criterion, Edge, EdgeId, HistoryEntry, Location, LocationId, LocationKind, Point,
    MIN_SCENIC_LEVEL,
};
use crate::routing::provider::{EdgeProvider, HistoryReader, HistoryRecorder, LocationProvider};
use crate::weight::WeightConfig;

/// Default filename for the campus database.
const DATABASE_FILENAME: &str = "campusnav.db";

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS locations (
    id            INTEGER PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    description   TEXT,
    location_type TEXT,
    x             REAL,
    y             REAL,
    has_shade     INTEGER NOT NULL DEFAULT 0,
    scenic_level  INTEGER,
    is_accessible INTEGER DEFAULT 1
);
CREATE TABLE IF NOT EXISTS paths (
    id                INTEGER PRIMARY KEY,
    start_location_id INTEGER NOT NULL,
    end_location_id   INTEGER NOT NULL,
    distance          REAL NOT NULL,
    time_cost         INTEGER NOT NULL,
    has_shade         INTEGER NOT NULL DEFAULT 0,
    scenic_level      INTEGER,
    is_indoor         INTEGER DEFAULT 0,
    is_active         INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_paths_start ON paths (start_location_id);
CREATE TABLE IF NOT EXISTS navigation_history (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL,
    start_location_id INTEGER NOT NULL,
    end_location_id   INTEGER NOT NULL,
    strategy          TEXT NOT NULL,
    total_distance    REAL NOT NULL,
    total_time        INTEGER NOT NULL,
    path_locations    TEXT NOT NULL,
    created_at        TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_user ON navigation_history (user_id);
CREATE TABLE IF NOT EXISTS system_config (
    config_key   TEXT PRIMARY KEY,
    config_value TEXT NOT NULL,
    description  TEXT
);
";

const LOCATION_COLUMNS: &str = "id, name, description, location_type, x, y, has_shade, \
                                scenic_level, is_accessible";

const EDGE_COLUMNS: &str = "id, start_location_id, end_location_id, distance, time_cost, \
                            has_shade, scenic_level, is_indoor, is_active";

/// Resolve the default database location using platform-specific project directories.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("edu", "campusnav", "campusnav")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATABASE_FILENAME))
}

/// Campus data store backed by a single SQLite connection.
#[derive(Debug)]
pub struct CampusStore {
    connection: Mutex<Connection>,
}

impl CampusStore {
    /// Open an existing database file.
    ///
    /// Fails with [`Error::DatabaseNotFound`] rather than silently creating an
    /// empty database; use [`CampusStore::create`] for that.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "opening campus database");
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open or create a database file and ensure the schema exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self::from_connection(Connection::open(path)?);
        store.init_schema()?;
        info!(path = %path.display(), "campus database ready");
        Ok(store)
    }

    /// Fresh in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?);
        store.init_schema()?;
        Ok(store)
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create any missing tables. Safe to call repeatedly.
    pub fn init_schema(&self) -> Result<()> {
        self.connection().execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or replace a location. An id of 0 lets SQLite assign one.
    pub fn insert_location(&self, location: &Location) -> Result<LocationId> {
        let conn = self.connection();
        conn.execute(
            "INSERT OR REPLACE INTO locations (id, name, description, location_type, x, y, \
             has_shade, scenic_level, is_accessible) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                assigned_id(location.id),
                location.name,
                location.description,
                location.kind.as_str(),
                location.position.x,
                location.position.y,
                location.has_shade,
                location.scenic_level,
                location.is_accessible,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert or replace a path record. An id of 0 lets SQLite assign one.
    ///
    /// Endpoints are not checked against the location table; a dangling
    /// reference is reported when a route through it is reconstructed.
    pub fn insert_edge(&self, edge: &Edge) -> Result<EdgeId> {
        let conn = self.connection();
        conn.execute(
            "INSERT OR REPLACE INTO paths (id, start_location_id, end_location_id, distance, \
             time_cost, has_shade, scenic_level, is_indoor, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                assigned_id(edge.id),
                edge.source,
                edge.target,
                edge.distance,
                edge.time_cost,
                edge.has_shade,
                edge.scenic_level,
                edge.is_indoor,
                edge.is_active,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Toggle a path record's active flag. Returns `false` for unknown ids.
    pub fn set_edge_active(&self, id: EdgeId, active: bool) -> Result<bool> {
        let updated = self.connection().execute(
            "UPDATE paths SET is_active = ?2 WHERE id = ?1",
            params![id, active],
        )?;
        Ok(updated > 0)
    }

    /// Every stored location name, alphabetically.
    pub fn location_names(&self) -> Result<Vec<String>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT name FROM locations ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Resolve user input to a location id.
    ///
    /// Numeric input is taken as an id verbatim. Anything else must match a
    /// name case-insensitively; otherwise [`Error::UnknownLocation`] carries up
    /// to three close matches.
    pub fn resolve_location(&self, input: &str) -> Result<LocationId> {
        let trimmed = input.trim();
        if let Ok(id) = trimmed.parse::<LocationId>() {
            return Ok(id);
        }

        let found = self
            .connection()
            .query_row(
                "SELECT id FROM locations WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1",
                [trimmed],
                |row| row.get(0),
            )
            .optional()?;

        match found {
            Some(id) => Ok(id),
            None => Err(Error::UnknownLocation {
                name: trimmed.to_string(),
                suggestions: self.fuzzy_location_matches(trimmed, 3)?,
            }),
        }
    }

    /// Names similar to `query`, best match first.
    pub fn fuzzy_location_matches(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let needle = query.to_lowercase();
        let mut scored: Vec<(f64, String)> = self
            .location_names()?
            .into_iter()
            .map(|name| (strsim::jaro_winkler(&needle, &name.to_lowercase()), name))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(scored.into_iter().take(limit).map(|(_, name)| name).collect())
    }

    /// Weight multipliers from `system_config`, falling back to defaults for
    /// absent keys.
    pub fn weight_config(&self) -> Result<WeightConfig> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT config_key, config_value FROM system_config \
             WHERE config_key LIKE 'path.weight.%'",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config = WeightConfig::default();
        for row in rows {
            let (key, value) = row?;
            config.apply(&key, &value)?;
        }
        Ok(config)
    }

    /// Upsert a configuration value. Weight keys are validated first.
    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        WeightConfig::default().apply(key, value)?;
        self.connection().execute(
            "INSERT INTO system_config (config_key, config_value) VALUES (?1, ?2) \
             ON CONFLICT(config_key) DO UPDATE SET config_value = excluded.config_value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl EdgeProvider for CampusStore {
    fn list_active_edges(&self) -> Result<Vec<Edge>> {
        let conn = self.connection();
        let sql = format!("SELECT {EDGE_COLUMNS} FROM paths WHERE is_active = 1 ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let edges = stmt
            .query_map([], row_to_edge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = edges.len(), "loaded active path records");
        Ok(edges)
    }
}

impl LocationProvider for CampusStore {
    fn find_location(&self, id: LocationId) -> Result<Option<Location>> {
        let conn = self.connection();
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = ?1");
        let location = conn.query_row(&sql, [id], row_to_location).optional()?;
        Ok(location)
    }

    fn is_accessible(&self, id: LocationId) -> Result<bool> {
        let accessible: Option<Option<bool>> = self
            .connection()
            .query_row(
                "SELECT is_accessible FROM locations WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(accessible.flatten().unwrap_or(true))
    }
}

impl HistoryRecorder for CampusStore {
    fn record(&self, entry: &HistoryEntry) -> Result<()> {
        entry.validate()?;
        let locations = serde_json::to_string(&entry.locations)?;
        self.connection().execute(
            "INSERT INTO navigation_history (user_id, start_location_id, end_location_id, \
             strategy, total_distance, total_time, path_locations, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.actor,
                entry.source,
                entry.target,
                entry.criterion.as_str(),
                entry.total_distance,
                entry.total_time,
                locations,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl HistoryReader for CampusStore {
    fn history_for_actor(&self, actor: ActorId) -> Result<Vec<HistoryEntry>> {
        let conn = self.connection();
        let mut stmt = conn.prepare(
            "SELECT user_id, start_location_id, end_location_id, strategy, total_distance, \
             total_time, path_locations, created_at FROM navigation_history \
             WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([actor], row_to_history)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn clear_history(&self, actor: ActorId) -> Result<usize> {
        let removed = self
            .connection()
            .execute("DELETE FROM navigation_history WHERE user_id = ?1", [actor])?;
        info!(actor, removed, "cleared navigation history");
        Ok(removed)
    }
}

fn assigned_id(id: i64) -> Option<i64> {
    (id > 0).then_some(id)
}

fn row_to_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    let kind: Option<String> = row.get(3)?;
    Ok(Location {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        kind: kind.as_deref().map_or(LocationKind::Other, LocationKind::parse_lenient),
        position: Point::new(
            row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
            row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
        ),
        has_shade: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
        scenic_level: row
            .get::<_, Option<i32>>(7)?
            .unwrap_or(MIN_SCENIC_LEVEL),
        is_accessible: row.get::<_, Option<bool>>(8)?.unwrap_or(true),
    })
}

fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<Edge> {
    Ok(Edge {
        id: row.get(0)?,
        source: row.get(1)?,
        target: row.get(2)?,
        distance: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
        time_cost: row.get::<_, Option<i32>>(4)?.unwrap_or_default(),
        has_shade: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        scenic_level: row
            .get::<_, Option<i32>>(6)?
            .unwrap_or(MIN_SCENIC_LEVEL),
        is_indoor: row.get::<_, Option<bool>>(7)?.unwrap_or(false),
        is_active: row.get(8)?,
    })
}

fn row_to_history(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let criterion: String = row.get(3)?;
    let locations: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(HistoryEntry {
        actor: row.get(0)?,
        source: row.get(1)?,
        target: row.get(2)?,
        criterion: criterion
            .parse::<Criterion>()
            .map_err(|err| conversion_failure(3, err))?,
        total_distance: row.get(4)?,
        total_time: row.get(5)?,
        locations: serde_json::from_str(&locations).map_err(|err| conversion_failure(6, err))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|err| conversion_failure(7, err))?
            .with_timezone(&Utc),
    })
}

fn conversion_failure<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
