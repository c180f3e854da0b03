use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for a campus location.
pub type LocationId = i64;

/// Numeric identifier for a stored path record.
pub type EdgeId = i64;

/// Identifier of the user a navigation is attributed to.
pub type ActorId = i64;

/// Lowest scenic level a location or edge can carry.
pub const MIN_SCENIC_LEVEL: i32 = 1;

/// Planar map coordinates for a location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Category of a campus location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    Building,
    Garden,
    Cafeteria,
    Library,
    Sports,
    Gate,
    Dormitory,
    Laboratory,
    Office,
    Parking,
    #[default]
    Other,
}

impl LocationKind {
    pub const ALL: [LocationKind; 11] = [
        LocationKind::Building,
        LocationKind::Garden,
        LocationKind::Cafeteria,
        LocationKind::Library,
        LocationKind::Sports,
        LocationKind::Gate,
        LocationKind::Dormitory,
        LocationKind::Laboratory,
        LocationKind::Office,
        LocationKind::Parking,
        LocationKind::Other,
    ];

    /// Stable storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Building => "BUILDING",
            LocationKind::Garden => "GARDEN",
            LocationKind::Cafeteria => "CAFETERIA",
            LocationKind::Library => "LIBRARY",
            LocationKind::Sports => "SPORTS",
            LocationKind::Gate => "GATE",
            LocationKind::Dormitory => "DORMITORY",
            LocationKind::Laboratory => "LABORATORY",
            LocationKind::Office => "OFFICE",
            LocationKind::Parking => "PARKING",
            LocationKind::Other => "OTHER",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            LocationKind::Building => "Teaching building",
            LocationKind::Garden => "Garden",
            LocationKind::Cafeteria => "Cafeteria",
            LocationKind::Library => "Library",
            LocationKind::Sports => "Sports facility",
            LocationKind::Gate => "Campus gate",
            LocationKind::Dormitory => "Dormitory",
            LocationKind::Laboratory => "Laboratory",
            LocationKind::Office => "Office building",
            LocationKind::Parking => "Parking",
            LocationKind::Other => "Other",
        }
    }

    /// Parse a stored kind name, falling back to [`LocationKind::Other`].
    pub fn parse_lenient(value: &str) -> Self {
        LocationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or(LocationKind::Other)
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a campus location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: LocationKind,
    pub position: Point,
    pub has_shade: bool,
    pub scenic_level: i32,
    pub is_accessible: bool,
}

impl Location {
    /// Accessible, unshaded location of kind `Other` with scenic level 1.
    pub fn new(id: LocationId, name: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            kind: LocationKind::Other,
            position,
            has_shade: false,
            scenic_level: MIN_SCENIC_LEVEL,
            is_accessible: true,
        }
    }
}

/// Directed path record between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: LocationId,
    pub target: LocationId,
    /// Length in meters.
    pub distance: f64,
    /// Walking time in minutes.
    pub time_cost: i32,
    pub has_shade: bool,
    pub scenic_level: i32,
    pub is_indoor: bool,
    pub is_active: bool,
}

impl Edge {
    /// Active outdoor edge without shade, scenic level 1.
    pub fn new(
        id: EdgeId,
        source: LocationId,
        target: LocationId,
        distance: f64,
        time_cost: i32,
    ) -> Self {
        Self {
            id,
            source,
            target,
            distance,
            time_cost,
            has_shade: false,
            scenic_level: MIN_SCENIC_LEVEL,
            is_indoor: false,
            is_active: true,
        }
    }

    /// Same record travelled in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            ..*self
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Scenic level used for averaging and weighting; unset or out-of-range
    /// values read as the minimum.
    pub fn effective_scenic_level(&self) -> i32 {
        self.scenic_level.max(MIN_SCENIC_LEVEL)
    }
}

/// Optimization objective selecting the edge weighting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    /// Minimise walking distance.
    #[default]
    Shortest,
    /// Prefer shaded paths.
    Shaded,
    /// Prefer paths with a high scenic level.
    Scenic,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Criterion::Shortest, Criterion::Shaded, Criterion::Scenic];

    /// Stable storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Shortest => "SHORTEST",
            Criterion::Shaded => "SHADED",
            Criterion::Scenic => "SCENIC",
        }
    }

    /// Display label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Shortest => "Shortest path",
            Criterion::Shaded => "Most shade",
            Criterion::Scenic => "Most scenic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::Shortest => "Prefer the path with the least walking distance",
            Criterion::Shaded => "Prefer paths covered by shade",
            Criterion::Scenic => "Prefer paths with the best scenery",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase().replace('-', "_");
        let parsed = match normalized.as_str() {
            "shortest" => Some(Criterion::Shortest),
            "shaded" | "shade" | "shadiest" => Some(Criterion::Shaded),
            "scenic" | "most_scenic" => Some(Criterion::Scenic),
            _ => Criterion::ALL
                .into_iter()
                .find(|criterion| criterion.label().eq_ignore_ascii_case(trimmed)),
        };
        parsed.ok_or_else(|| Error::invalid_input(format!("unknown criterion '{value}'")))
    }
}

/// Record of one completed navigation, attributable to an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub actor: ActorId,
    pub source: LocationId,
    pub target: LocationId,
    pub criterion: Criterion,
    pub total_distance: f64,
    pub total_time: i32,
    pub locations: Vec<LocationId>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Reject entries that do not describe a usable route.
    pub fn validate(&self) -> Result<()> {
        if self.source == self.target {
            return Err(Error::invalid_input(
                "history entry start and destination must differ",
            ));
        }
        if !(self.total_distance.is_finite() && self.total_distance > 0.0) {
            return Err(Error::invalid_input(
                "history entry total distance must be positive",
            ));
        }
        if self.locations.len() < 2 {
            return Err(Error::invalid_input(
                "history entry must list at least two locations",
            ));
        }
        Ok(())
    }
}
