//! TUI rendering traits for calview types.
//!
//! Extension traits that add colored terminal rendering to calview-core
//! types using owo_colors.

use calview_core::cluster::{AnchorSource, ClusterSummary, LocationEntry};
use calview_core::geocode::GeocodeOutcome;
use calview_core::occurrence::Occurrence;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for GeocodeOutcome {
    fn render(&self) -> String {
        match self {
            GeocodeOutcome::Located {
                coordinates,
                confidence,
                candidate,
            } => {
                let percent = format!("{:.0}%", confidence * 100.0);
                let percent = if *confidence >= 0.8 {
                    percent.green().to_string()
                } else {
                    percent.yellow().to_string()
                };
                format!(
                    "{} {} {}",
                    coordinates,
                    percent,
                    candidate.formatted_address.dimmed()
                )
            }
            GeocodeOutcome::Unresolved { reason } => format!("{}", reason.red()),
        }
    }
}

impl Render for LocationEntry {
    fn render(&self) -> String {
        format!("{} → {}", self.location.bold(), self.outcome.render())
    }
}

impl Render for ClusterSummary {
    fn render(&self) -> String {
        let centroid = self
            .centroid
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());

        let anchor = match &self.anchor {
            Some(anchor) => {
                let source = match &anchor.source {
                    AnchorSource::Location(name) => name.clone(),
                    AnchorSource::Centroid => "centroid".to_string(),
                    AnchorSource::School(name) => name.clone(),
                };
                format!("{} ({})", anchor.point, source)
            }
            None => "none".to_string(),
        };

        let mut lines = vec![
            format!("{} {}", "centroid:".dimmed(), centroid),
            format!("{} {}", "anchor:".dimmed(), anchor),
        ];
        if !self.outliers.is_empty() {
            lines.push(format!(
                "{} {}",
                "outliers:".dimmed(),
                self.outliers.join(", ").yellow()
            ));
        }
        lines.join("\n")
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let time = format!(
            "{}–{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );
        let place = match self.coordinates {
            Some(c) => format!("{} {}", self.location, format!("({})", c).dimmed()),
            None if self.location.is_empty() => String::new(),
            None => format!("{} {}", self.location, "(no coordinates)".red()),
        };
        format!("  {} {} {}", time, self.title, place)
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
