//! Per-station traffic aggregation.
//!
//! Both operations are pure and reentrant: each call takes materialized
//! inputs and produces an independent result, so callers may re-run them as
//! often as they like (e.g. once per slider event) with last-write-wins
//! semantics.

use std::collections::HashMap;

use crate::model::{Station, Trip, minutes_since_midnight};

/// Sentinel target meaning "no time-of-day filter".
pub const NO_FILTER: i32 = -1;

/// Half-width of the time-of-day window, in minutes (inclusive).
pub const WINDOW_MINUTES: i32 = 60;

/// Restricts `trips` to those starting or ending within [`WINDOW_MINUTES`]
/// of `target_minutes` (minutes since midnight).
///
/// `target_minutes == NO_FILTER` returns the input unchanged. The comparison
/// is a plain absolute difference on minutes-since-midnight: it does not wrap
/// across midnight, so minute 1430 is not close to a target of minute 5.
/// Order-preserving.
pub fn filter_by_time(trips: Vec<Trip>, target_minutes: i32) -> Vec<Trip> {
    if target_minutes == NO_FILTER {
        return trips;
    }

    trips
        .into_iter()
        .filter(|t| {
            let started = minutes_since_midnight(t.started_at);
            let ended = minutes_since_midnight(t.ended_at);
            (started - target_minutes).abs() <= WINDOW_MINUTES
                || (ended - target_minutes).abs() <= WINDOW_MINUTES
        })
        .collect()
}

/// Counts departures and arrivals per station over `trips` and returns the
/// stations with their derived counters populated.
///
/// Trips referencing a station id not present in `stations` simply contribute
/// nothing on that side; an empty trip set yields all-zero counters. The
/// returned vector is freshly built — callers must not assume the input was
/// mutated in place.
pub fn compute_traffic(stations: Vec<Station>, trips: &[Trip]) -> Vec<Station> {
    let mut departures: HashMap<&str, u32> = HashMap::new();
    let mut arrivals: HashMap<&str, u32> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .into_iter()
        .map(|mut s| {
            s.departures = departures.get(s.id.as_str()).copied().unwrap_or(0);
            s.arrivals = arrivals.get(s.id.as_str()).copied().unwrap_or(0);
            s.total_traffic = s.arrivals + s.departures;
            s
        })
        .collect()
}
