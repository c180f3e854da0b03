//! Output formatting for command results.
//!
//! Routes reuse the library's [`RouteResult::render`]; location and history
//! listings are formatted here. Every JSON rendering ends with a newline so
//! output can be piped line by line.

use std::collections::HashMap;
use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;

use campusnav_lib::{HistoryEntry, Location, LocationId, RenderMode, RouteResult};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one stop per line.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn render_route(self, result: &RouteResult) -> Result<String> {
        Ok(match self {
            OutputFormat::Text => result.render(RenderMode::PlainText),
            OutputFormat::Rich => result.render(RenderMode::RichText),
            OutputFormat::Json => to_json_line(result)?,
        })
    }

    pub fn render_locations(self, locations: &[Location]) -> Result<String> {
        if self == OutputFormat::Json {
            return to_json_line(&locations);
        }

        let mut buffer = String::new();
        if locations.is_empty() {
            buffer.push_str("No locations found.\n");
            return Ok(buffer);
        }
        for location in locations {
            let shade = if location.has_shade { ", shaded" } else { "" };
            match self {
                OutputFormat::Rich => writeln!(
                    buffer,
                    "* **{}** (`{}`) _{}, scenic {}{}_",
                    location.name,
                    location.id,
                    location.kind.description(),
                    location.scenic_level,
                    shade
                )?,
                _ => writeln!(
                    buffer,
                    "{:>5}  {} [{}, scenic {}{}]",
                    location.id, location.name, location.kind, location.scenic_level, shade
                )?,
            }
        }
        Ok(buffer)
    }

    /// Render history entries, labelling endpoints with `names` where known.
    pub fn render_history(
        self,
        entries: &[HistoryEntry],
        names: &HashMap<LocationId, String>,
    ) -> Result<String> {
        if self == OutputFormat::Json {
            return to_json_line(&entries);
        }

        let mut buffer = String::new();
        if entries.is_empty() {
            buffer.push_str("No navigation history.\n");
            return Ok(buffer);
        }
        let label = |id: LocationId| {
            names
                .get(&id)
                .map_or_else(|| id.to_string(), |name| format!("{name} ({id})"))
        };
        for entry in entries {
            writeln!(
                buffer,
                "{}  {} -> {}  {} | {:.1} m, {} min, {} stops",
                entry.created_at.format("%Y-%m-%d %H:%M"),
                label(entry.source),
                label(entry.target),
                entry.criterion.label(),
                entry.total_distance,
                entry.total_time,
                entry.locations.len()
            )?;
        }
        Ok(buffer)
    }
}

fn to_json_line<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
