use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::model::{EdgeId, LocationId};

/// Convenient result alias for the campus navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories reported on a [`crate::RouteResult`].
///
/// Every [`Error`] maps onto exactly one kind through [`Error::kind`], which is
/// what callers should branch on instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteErrorKind {
    InvalidInput,
    SameEndpoint,
    NoRoute,
    LocationMissing,
    PathDiscontinuity,
    WeightPolicyError,
    ProviderError,
}

impl fmt::Display for RouteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteErrorKind::InvalidInput => "INVALID_INPUT",
            RouteErrorKind::SameEndpoint => "SAME_ENDPOINT",
            RouteErrorKind::NoRoute => "NO_ROUTE",
            RouteErrorKind::LocationMissing => "LOCATION_MISSING",
            RouteErrorKind::PathDiscontinuity => "PATH_DISCONTINUITY",
            RouteErrorKind::WeightPolicyError => "WEIGHT_POLICY_ERROR",
            RouteErrorKind::ProviderError => "PROVIDER_ERROR",
        };
        f.write_str(value)
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request field was absent or malformed.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Source and destination were the same location.
    #[error("start and destination must differ (both were {id})")]
    SameEndpoint { id: LocationId },

    /// The destination cannot be reached from the start in the filtered graph.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: LocationId, goal: LocationId },

    /// An edge references a location the location store no longer knows.
    #[error("location {id} referenced by the path network is missing")]
    LocationMissing { id: LocationId },

    /// Consecutive path locations are not joined by any retained edge.
    #[error("path is discontinuous between {from} and {to}")]
    PathDiscontinuity { from: LocationId, to: LocationId },

    /// Summed walking time of a route does not fit the minutes counter.
    #[error("total walking time between {start} and {goal} exceeds {} minutes", i32::MAX)]
    TimeOverflow { start: LocationId, goal: LocationId },

    /// The weight policy produced an unusable value for an edge.
    #[error("edge {edge} produced an invalid weight ({weight})")]
    WeightPolicy { edge: EdgeId, weight: f64 },

    /// Raised when a location name could not be found in the store.
    #[error("unknown location name: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// A configuration value could not be parsed or is out of range.
    #[error("invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the campus database")]
    ProjectDirsUnavailable,

    /// Database file could not be located at the resolved path.
    #[error("campus database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for JSON encoding errors on stored history rows.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category used when this error is reported on a route result.
    pub fn kind(&self) -> RouteErrorKind {
        match self {
            Error::InvalidInput { .. } | Error::UnknownLocation { .. } => {
                RouteErrorKind::InvalidInput
            }
            Error::SameEndpoint { .. } => RouteErrorKind::SameEndpoint,
            Error::RouteNotFound { .. } => RouteErrorKind::NoRoute,
            Error::LocationMissing { .. } => RouteErrorKind::LocationMissing,
            Error::PathDiscontinuity { .. } => RouteErrorKind::PathDiscontinuity,
            Error::WeightPolicy { .. } => RouteErrorKind::WeightPolicyError,
            Error::TimeOverflow { .. }
            | Error::InvalidConfig { .. }
            | Error::ProjectDirsUnavailable
            | Error::DatabaseNotFound { .. }
            | Error::Sqlite(_)
            | Error::Json(_)
            | Error::Io(_) => RouteErrorKind::ProviderError,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
