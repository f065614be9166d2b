//! CLI entry point for the bike traffic tool.
//!
//! Provides subcommands for computing per-station traffic from station and
//! trip datasets and for emitting presentation-ready JSON reports.

use anyhow::Result;
use bike_traffic::{
    fetch::{BasicClient, fetch_bytes},
    loader::{parse_stations, parse_trips},
    output::{append_records, print_json, write_report},
    report::build_report,
    traffic::{NO_FILTER, compute_traffic, filter_by_time},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_traffic")]
#[command(about = "Per-station bike share traffic aggregation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-station traffic and append rows to a CSV
    Compute {
        /// Station JSON document, file path or URL
        #[arg(long)]
        stations: String,

        /// Trip CSV export, file path or URL
        #[arg(long)]
        trips: String,

        /// Minute of day (0-1439) to filter around, -1 for no filter
        #[arg(short = 't', long, default_value_t = NO_FILTER,
              value_parser = clap::value_parser!(i32).range(-1..=1439))]
        target_minutes: i32,

        /// CSV file to append results to
        #[arg(short, long, default_value = "traffic.csv")]
        output: String,
    },
    /// Build a presentation-ready JSON report
    Report {
        /// Station JSON document, file path or URL
        #[arg(long)]
        stations: String,

        /// Trip CSV export, file path or URL
        #[arg(long)]
        trips: String,

        /// Minute of day (0-1439) to filter around, -1 for no filter
        #[arg(short = 't', long, default_value_t = NO_FILTER,
              value_parser = clap::value_parser!(i32).range(-1..=1439))]
        target_minutes: i32,

        /// File to write the JSON report to; logs to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bike_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            stations,
            trips,
            target_minutes,
            output,
        } => {
            let stations = parse_stations(&fetcher(&stations).await?)?;
            let trips = parse_trips(&fetcher(&trips).await?)?;
            info!(
                stations = stations.len(),
                trips = trips.len(),
                target_minutes,
                "Datasets loaded"
            );

            let trips = filter_by_time(trips, target_minutes);
            let stations = compute_traffic(stations, &trips);

            append_records(&output, &stations)?;
            info!(
                output = %output,
                matched_trips = trips.len(),
                "Traffic rows written"
            );
        }
        Commands::Report {
            stations,
            trips,
            target_minutes,
            output,
        } => {
            let stations = parse_stations(&fetcher(&stations).await?)?;
            let trips = parse_trips(&fetcher(&trips).await?)?;
            info!(
                stations = stations.len(),
                trips = trips.len(),
                target_minutes,
                "Datasets loaded"
            );

            let report = build_report(stations, trips, target_minutes);

            match output {
                Some(path) => {
                    write_report(&path, &report)?;
                    info!(path = %path, "Report written");
                }
                None => print_json(&report)?,
            }
        }
    }

    Ok(())
}

/// Loads dataset bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &String) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}
