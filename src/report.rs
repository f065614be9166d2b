//! Presentation-ready traffic reports.
//!
//! A report is one aggregation pass flattened into what a rendering caller
//! needs per station: position, counters, circle radius under the active
//! view's scale, and the quantized flow bucket.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Station, Trip};
use crate::scale::{FILTERED_RANGE, UNFILTERED_RANGE, flow_ratio, quantize_flow, radius_for_traffic};
use crate::traffic::{NO_FILTER, compute_traffic, filter_by_time};

/// One station's row in a [`TrafficReport`].
#[derive(Debug, Serialize)]
pub struct StationEntry {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub arrivals: u32,
    pub departures: u32,
    pub total_traffic: u32,
    /// Circle radius in pixels under the active view's scale range.
    pub radius: f64,
    /// Departure share of total traffic, before quantization.
    pub flow_ratio: f64,
    /// Quantized flow bucket: 0.0 arrival-heavy, 0.5 balanced, 1.0 departure-heavy.
    pub flow: f64,
}

/// Complete result of one aggregation pass.
#[derive(Debug, Serialize)]
pub struct TrafficReport {
    pub generated_at: DateTime<Utc>,
    /// Minute-of-day target the pass was filtered to, or -1 for no filter.
    pub target_minutes: i32,
    /// Trips remaining after the time filter.
    pub trip_count: usize,
    /// Busiest station's total, the scale's domain maximum.
    pub max_traffic: u32,
    pub stations: Vec<StationEntry>,
}

/// Runs a full aggregation pass and flattens it into a [`TrafficReport`].
///
/// Applies the time filter, computes per-station traffic, then scales radii
/// against the busiest station. The filtered view uses the raised-minimum
/// radius range so low-count stations stay visible.
pub fn build_report(stations: Vec<Station>, trips: Vec<Trip>, target_minutes: i32) -> TrafficReport {
    let filtered = filter_by_time(trips, target_minutes);
    let stations = compute_traffic(stations, &filtered);

    let max_traffic = stations.iter().map(|s| s.total_traffic).max().unwrap_or(0);
    let range = if target_minutes == NO_FILTER {
        UNFILTERED_RANGE
    } else {
        FILTERED_RANGE
    };

    let entries = stations
        .into_iter()
        .map(|s| {
            let ratio = flow_ratio(&s);
            StationEntry {
                radius: radius_for_traffic(s.total_traffic, max_traffic, range),
                flow_ratio: ratio,
                flow: quantize_flow(ratio),
                id: s.id,
                lon: s.lon,
                lat: s.lat,
                arrivals: s.arrivals,
                departures: s.departures,
                total_traffic: s.total_traffic,
            }
        })
        .collect();

    TrafficReport {
        generated_at: Utc::now(),
        target_minutes,
        trip_count: filtered.len(),
        max_traffic,
        stations: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn trip(start: &str, end: &str, s: NaiveDateTime, e: NaiveDateTime) -> Trip {
        Trip {
            ride_id: format!("{start}-{end}"),
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: s,
            ended_at: e,
            bike_type: None,
            is_member: None,
        }
    }

    #[test]
    fn test_unfiltered_report_uses_full_trip_set() {
        let stations = vec![Station::new("A", 0.0, 0.0), Station::new("B", 1.0, 1.0)];
        let trips = vec![
            trip("A", "B", at(8, 0), at(8, 20)),
            trip("A", "A", at(22, 0), at(22, 10)),
        ];

        let report = build_report(stations, trips, NO_FILTER);
        assert_eq!(report.trip_count, 2);
        assert_eq!(report.max_traffic, 3);

        let a = &report.stations[0];
        assert_eq!(a.total_traffic, 3);
        // Busiest station sits at the top of the unfiltered range.
        assert_eq!(a.radius, 25.0);
        assert_eq!(a.flow, 1.0); // 2 departures of 3 total
    }

    #[test]
    fn test_filtered_report_uses_raised_minimum() {
        let stations = vec![Station::new("A", 0.0, 0.0), Station::new("B", 1.0, 1.0)];
        let trips = vec![
            trip("A", "B", at(8, 0), at(8, 20)),
            trip("A", "A", at(8, 30), at(8, 40)),
            trip("A", "A", at(22, 0), at(22, 10)),
        ];

        let report = build_report(stations, trips, 480);
        assert_eq!(report.trip_count, 2);
        assert_eq!(report.max_traffic, 3);

        // B saw one arrival; its radius sits strictly inside (3,50).
        let b = &report.stations[1];
        assert_eq!(b.total_traffic, 1);
        assert!(b.radius > 3.0 && b.radius < 50.0);
        assert_eq!(b.flow, 0.0);
    }

    #[test]
    fn test_report_with_no_trips_is_all_floor() {
        let stations = vec![Station::new("A", 0.0, 0.0)];
        let report = build_report(stations, vec![], NO_FILTER);

        assert_eq!(report.trip_count, 0);
        assert_eq!(report.max_traffic, 0);
        assert_eq!(report.stations[0].radius, 0.0);
        assert_eq!(report.stations[0].flow_ratio, 0.0);
    }
}
