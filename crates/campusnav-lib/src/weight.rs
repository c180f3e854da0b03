//! Criterion-dependent edge weighting.
//!
//! [`edge_weight`] turns a raw path record into the scalar cost Dijkstra
//! minimises. Under SHADED a shaded edge costs `distance * shade`, so the
//! default multiplier of 1.5 makes shaded edges dearer and only a multiplier
//! below 1 favours them. Under SCENIC an edge's cost falls as its scenic level
//! rises. No criterion excludes an edge from the search.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Criterion, Edge};

/// Environment variable overriding [`WeightConfig::shortest`].
pub const WEIGHT_SHORTEST_ENV: &str = "CAMPUSNAV_WEIGHT_SHORTEST";
/// Environment variable overriding [`WeightConfig::shade`].
pub const WEIGHT_SHADE_ENV: &str = "CAMPUSNAV_WEIGHT_SHADE";
/// Environment variable overriding [`WeightConfig::scenic`].
pub const WEIGHT_SCENIC_ENV: &str = "CAMPUSNAV_WEIGHT_SCENIC";

/// Stored configuration key for [`WeightConfig::shortest`].
pub const WEIGHT_SHORTEST_KEY: &str = "path.weight.shortest";
/// Stored configuration key for [`WeightConfig::shade`].
pub const WEIGHT_SHADE_KEY: &str = "path.weight.shade";
/// Stored configuration key for [`WeightConfig::scenic`].
pub const WEIGHT_SCENIC_KEY: &str = "path.weight.scenic";

/// Multipliers applied by the weight policy, one per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub shortest: f64,
    pub shade: f64,
    pub scenic: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            shortest: 1.0,
            shade: 1.5,
            scenic: 1.3,
        }
    }
}

impl WeightConfig {
    /// Apply a single `key = value` override using the stored key names.
    ///
    /// Unknown keys are ignored so unrelated settings can share the table.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            WEIGHT_SHORTEST_KEY => &mut self.shortest,
            WEIGHT_SHADE_KEY => &mut self.shade,
            WEIGHT_SCENIC_KEY => &mut self.scenic,
            _ => return Ok(()),
        };
        *slot = parse_multiplier(key, value)?;
        Ok(())
    }

    /// Overlay values from the `CAMPUSNAV_WEIGHT_*` environment variables.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        for (var, key) in [
            (WEIGHT_SHORTEST_ENV, WEIGHT_SHORTEST_KEY),
            (WEIGHT_SHADE_ENV, WEIGHT_SHADE_KEY),
            (WEIGHT_SCENIC_ENV, WEIGHT_SCENIC_KEY),
        ] {
            if let Ok(value) = env::var(var) {
                tracing::debug!(%var, %value, "applying weight override from environment");
                self.apply(key, &value)?;
            }
        }
        Ok(self)
    }
}

fn parse_multiplier(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| Error::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Compute the search weight of `edge` under `criterion`.
///
/// Returns [`Error::WeightPolicy`] when the result is negative or not finite,
/// which happens only with a misconfigured multiplier or corrupt distance.
pub fn edge_weight(edge: &Edge, criterion: Criterion, config: &WeightConfig) -> Result<f64> {
    let weight = match criterion {
        Criterion::Shortest => edge.distance * config.shortest,
        Criterion::Shaded => {
            let factor = if edge.has_shade { config.shade } else { 1.0 };
            edge.distance * factor
        }
        Criterion::Scenic => {
            edge.distance / (f64::from(edge.effective_scenic_level()) * config.scenic)
        }
    };

    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(Error::WeightPolicy {
            edge: edge.id,
            weight,
        })
    }
}
