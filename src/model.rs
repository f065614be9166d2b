//! Canonical station and trip types.
//!
//! Loaders normalize raw source records into these shapes once; everything
//! downstream (aggregation, scaling, reporting) only ever sees them.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A fixed dock location with its per-pass traffic counters.
///
/// `id`, `lon`, and `lat` are immutable once loaded. The three derived
/// counters default to zero and are (re)populated by every aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub lon: f64,
    pub lat: f64,

    #[serde(default)]
    pub arrivals: u32,
    #[serde(default)]
    pub departures: u32,
    #[serde(default)]
    pub total_traffic: u32,
}

impl Station {
    pub fn new(id: impl Into<String>, lon: f64, lat: f64) -> Self {
        Station {
            id: id.into(),
            lon,
            lat,
            arrivals: 0,
            departures: 0,
            total_traffic: 0,
        }
    }
}

/// One rental event. Immutable once loaded.
///
/// The timestamps are naive (the source data carries local wall-clock times
/// within a single day); aggregation only consults their time-of-day
/// component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub ride_id: String,
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,

    // Rider attributes, carried through but never aggregated over.
    pub bike_type: Option<String>,
    pub is_member: Option<bool>,
}

/// Minutes since midnight for a timestamp's time-of-day component, in [0,1439].
pub fn minutes_since_midnight(t: NaiveDateTime) -> i32 {
    (t.hour() * 60 + t.minute()) as i32
}
