use std::path::Path;

use anyhow::{Context, Result};
use calview_core::config::CalViewConfig;
use calview_core::geocode::LocationCache;
use calview_core::occurrence::{Occurrence, OccurrenceRecord};
use calview_core::pipeline::{CalendarPipeline, PipelineReport};
use owo_colors::OwoColorize;

use crate::geocoder::Geocoder;
use crate::render::{Render, pluralize};
use crate::utils::tui;

pub async fn run(
    config: &CalViewConfig,
    file: &Path,
    context: &str,
    json: bool,
    offline: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    tracing::debug!(path = %file.display(), bytes = content.len(), "Read calendar file");

    let geocoder = Geocoder::select(offline)?;
    let cache = if config.geocoder.cache {
        LocationCache::new()
    } else {
        LocationCache::disabled()
    };
    let schools = config.school_directory();

    let pipeline = CalendarPipeline::new(&geocoder, &cache, &schools)
        .with_timeout(config.geocoder.timeout());

    let spinner = (!json).then(|| tui::create_spinner("Geocoding locations".to_string()));
    let report = pipeline.run(&content, context).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = report?;

    if json {
        let records: Vec<OccurrenceRecord> =
            report.occurrences.iter().map(OccurrenceRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &PipelineReport) {
    if report.occurrences.is_empty() {
        println!("{}", "No class meetings found".dimmed());
        return;
    }

    let mut current_date = None;
    for occurrence in chronological(&report.occurrences) {
        if current_date != Some(occurrence.date) {
            if current_date.is_some() {
                println!();
            }
            let label = occurrence.date.format("%a %b %-d %Y").to_string();
            println!("{}", label.bold());
            current_date = Some(occurrence.date);
        }
        println!("{}", occurrence.render());
    }

    println!();
    println!("{}", "Locations".bold());
    for entry in report.locations.iter() {
        println!("  {}", entry.render());
    }
    println!("{}", report.summary.render());

    println!();
    let count = report.occurrences.len();
    println!(
        "{} {}, {}/{} locations resolved",
        count,
        pluralize("meeting", count),
        report.locations.located_count(),
        report.locations.len()
    );
}

/// Occurrences sorted by date, then start time.
fn chronological(occurrences: &[Occurrence]) -> Vec<&Occurrence> {
    let mut sorted: Vec<&Occurrence> = occurrences.iter().collect();
    sorted.sort_by_key(|o| (o.date, o.start_time));
    sorted
}
