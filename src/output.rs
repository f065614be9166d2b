//! Output formatting and persistence for traffic results.
//!
//! Supports pretty-printing, JSON report files, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::model::Station;
use crate::report::TrafficReport;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TrafficReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &TrafficReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty-printed JSON to `path`.
pub fn write_report(path: &str, report: &TrafficReport) -> Result<()> {
    debug!(path, stations = report.stations.len(), "Writing JSON report");
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Appends per-station traffic rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, stations: &[Station]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = stations.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for station in stations {
        writer.serialize(station)?;
    }
    writer.flush()?;

    Ok(())
}
