use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result, RouteErrorKind};
use crate::model::{ActorId, Criterion, Edge, HistoryEntry, Location, LocationId};

/// Why a navigation did not produce a route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteFailure {
    pub kind: RouteErrorKind,
    pub message: String,
}

impl From<&Error> for RouteFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of submitting the navigation to the history recorder.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryStatus {
    /// No actor was supplied or the route failed.
    #[default]
    NotRequested,
    Recorded,
    /// The recorder rejected the entry; the route itself is unaffected.
    Failed { message: String },
}

/// Presentation style for turning a [`RouteResult`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    RichText,
}

/// Structured navigation result that callers can render or serialise.
///
/// A successful result always holds at least two locations and exactly one
/// edge per consecutive pair, each oriented from the earlier location to the
/// later one.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RouteFailure>,
    pub criterion: Criterion,
    pub total_distance: f64,
    pub total_time: i32,
    pub locations: Vec<Location>,
    pub edges: Vec<Edge>,
    pub has_shade_coverage: bool,
    pub average_scenic_level: f64,
    pub history: HistoryStatus,
}

impl RouteResult {
    /// Aggregate route statistics from an ordered location list and the edges
    /// joining them.
    pub fn from_path(
        criterion: Criterion,
        locations: Vec<Location>,
        edges: Vec<Edge>,
    ) -> Result<Self> {
        if locations.len() < 2 {
            return Err(Error::invalid_input(
                "a route needs at least two locations",
            ));
        }
        if edges.len() != locations.len() - 1 {
            let last = &locations[locations.len() - 1];
            return Err(Error::PathDiscontinuity {
                from: locations[0].id,
                to: last.id,
            });
        }
        for (pair, edge) in locations.windows(2).zip(&edges) {
            if edge.source != pair[0].id || edge.target != pair[1].id {
                return Err(Error::PathDiscontinuity {
                    from: pair[0].id,
                    to: pair[1].id,
                });
            }
        }

        let total_distance: f64 = edges.iter().map(|edge| edge.distance).sum();
        let total_time = edges
            .iter()
            .try_fold(0i32, |total, edge| total.checked_add(edge.time_cost))
            .ok_or_else(|| Error::TimeOverflow {
                start: locations[0].id,
                goal: locations[locations.len() - 1].id,
            })?;
        let shaded = edges.iter().filter(|edge| edge.has_shade).count();
        let scenic_sum: i64 = edges
            .iter()
            .map(|edge| i64::from(edge.effective_scenic_level()))
            .sum();

        Ok(Self {
            success: true,
            error: None,
            criterion,
            total_distance,
            total_time,
            has_shade_coverage: shaded * 2 > edges.len(),
            average_scenic_level: scenic_sum as f64 / edges.len() as f64,
            locations,
            edges,
            history: HistoryStatus::NotRequested,
        })
    }

    /// Failed result carrying the error's kind and message.
    pub fn failure(criterion: Criterion, err: &Error) -> Self {
        Self {
            success: false,
            error: Some(RouteFailure::from(err)),
            criterion,
            total_distance: 0.0,
            total_time: 0,
            locations: Vec::new(),
            edges: Vec::new(),
            has_shade_coverage: false,
            average_scenic_level: 0.0,
            history: HistoryStatus::NotRequested,
        }
    }

    pub fn error_kind(&self) -> Option<RouteErrorKind> {
        self.error.as_ref().map(|failure| failure.kind)
    }

    /// Number of edges walked.
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    pub fn location_ids(&self) -> Vec<LocationId> {
        self.locations.iter().map(|location| location.id).collect()
    }

    /// History record describing this result, or `None` for failures.
    pub fn history_entry(&self, actor: ActorId, created_at: DateTime<Utc>) -> Option<HistoryEntry> {
        if !self.success {
            return None;
        }
        let first = self.locations.first()?;
        let last = self.locations.last()?;
        Some(HistoryEntry {
            actor,
            source: first.id,
            target: last.id,
            criterion: self.criterion,
            total_distance: self.total_distance,
            total_time: self.total_time,
            locations: self.location_ids(),
            created_at,
        })
    }

    /// Render the result using the requested textual mode.
    pub fn render(&self, mode: RenderMode) -> String {
        if let Some(failure) = &self.error {
            return format!("Route failed [{}]: {}\n", failure.kind, failure.message);
        }
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn endpoints(&self) -> (&str, &str) {
        let start = self.locations.first().map_or("<unknown>", |l| l.name.as_str());
        let goal = self.locations.last().map_or("<unknown>", |l| l.name.as_str());
        (start, goal)
    }

    fn render_plain(&self) -> String {
        let (start, goal) = self.endpoints();
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, criterion: {})",
            start,
            goal,
            self.hop_count(),
            self.criterion.label()
        );
        let _ = writeln!(
            buffer,
            "Distance: {:.1} m, time: {} min, shaded: {}, average scenic level: {:.2}",
            self.total_distance,
            self.total_time,
            if self.has_shade_coverage { "yes" } else { "no" },
            self.average_scenic_level
        );
        for (index, location) in self.locations.iter().enumerate() {
            let _ = write!(buffer, "{:>3}: {} ({})", index, location.name, location.id);
            if let Some(edge) = index.checked_sub(1).and_then(|i| self.edges.get(i)) {
                let _ = write!(buffer, " [+{:.1} m, {} min]", edge.distance, edge.time_cost);
            }
            buffer.push('\n');
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let (start, goal) = self.endpoints();
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({} hops, criterion: `{}`)",
            start,
            goal,
            self.hop_count(),
            self.criterion
        );
        let _ = writeln!(
            buffer,
            "_{:.1} m · {} min · shade {} · scenic {:.2}_",
            self.total_distance,
            self.total_time,
            if self.has_shade_coverage { "✓" } else { "✗" },
            self.average_scenic_level
        );
        for (index, location) in self.locations.iter().enumerate() {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`)",
                index, location.name, location.id
            );
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{EdgeBuilder, LocationBuilder};

    fn chain(shaded: &[bool]) -> (Vec<Location>, Vec<Edge>) {
        let locations = (0..=shaded.len() as i64)
            .map(|id| LocationBuilder::new(id, &format!("L{id}")).build())
            .collect();
        let edges = shaded
            .iter()
            .enumerate()
            .map(|(i, &shade)| {
                let i = i as i64;
                EdgeBuilder::new(i, i + 1).id(i).distance(2.0).time(1).shade(shade).build()
            })
            .collect();
        (locations, edges)
    }

    #[test]
    fn exactly_half_shaded_is_not_coverage() {
        let (locations, edges) = chain(&[true, false, true, false]);
        let result = RouteResult::from_path(Criterion::Shaded, locations, edges).unwrap();
        assert!(!result.has_shade_coverage);
    }

    #[test]
    fn strict_majority_shaded_is_coverage() {
        let (locations, edges) = chain(&[true, true, false]);
        let result = RouteResult::from_path(Criterion::Shaded, locations, edges).unwrap();
        assert!(result.has_shade_coverage);
        assert_eq!(result.total_time, 3);
        assert_eq!(result.total_distance, 6.0);
    }

    #[test]
    fn unset_scenic_levels_average_as_one() {
        let (locations, mut edges) = chain(&[false, false]);
        edges[0].scenic_level = 0;
        edges[1].scenic_level = 4;
        let result = RouteResult::from_path(Criterion::Scenic, locations, edges).unwrap();
        assert_eq!(result.average_scenic_level, 2.5);
    }

    #[test]
    fn overflowing_total_time_is_an_error() {
        let (locations, mut edges) = chain(&[false, false]);
        for edge in &mut edges {
            edge.time_cost = i32::MAX / 2 + 1;
        }
        let err = RouteResult::from_path(Criterion::Shortest, locations, edges).unwrap_err();
        assert!(matches!(err, Error::TimeOverflow { start: 0, goal: 2 }));
        assert_eq!(err.kind(), RouteErrorKind::ProviderError);
    }

    #[test]
    fn misaligned_edges_are_rejected() {
        let (locations, mut edges) = chain(&[false, false]);
        edges.swap(0, 1);
        let err = RouteResult::from_path(Criterion::Shortest, locations, edges).unwrap_err();
        assert!(matches!(err, Error::PathDiscontinuity { .. }));
    }

    #[test]
    fn failure_renders_kind_and_message() {
        let err = Error::RouteNotFound { start: 1, goal: 9 };
        let result = RouteResult::failure(Criterion::Shortest, &err);
        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(RouteErrorKind::NoRoute));
        assert_eq!(
            result.render(RenderMode::PlainText),
            "Route failed [NO_ROUTE]: no route found between 1 and 9\n"
        );
        assert!(result.history_entry(1, Utc::now()).is_none());
    }

    #[test]
    fn plain_render_lists_every_stop() {
        let (locations, edges) = chain(&[true]);
        let result = RouteResult::from_path(Criterion::Shortest, locations, edges).unwrap();
        let text = result.render(RenderMode::PlainText);
        assert!(text.starts_with("Route: L0 -> L1 (1 hops, criterion: Shortest path)"));
        assert!(text.contains("  1: L1 (1) [+2.0 m, 1 min]"));
    }
}
