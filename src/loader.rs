//! Dataset parsing and field-name normalization.
//!
//! Station and trip exports have gone through several schema vintages, so the
//! same logical field shows up under different spellings (`station_id`,
//! `short_name`, `Number`; `lon`, `Long`, `longitude`). All of that is
//! resolved here, once, into the canonical [`model`](crate::model) types.
//! Records that carry no recognized id or coordinates are dropped with a
//! warning rather than failing the whole load.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{Station, Trip};

/// A station record as it appears in the source document, before
/// normalization. Id and coordinate fields are all optional because no single
/// spelling is guaranteed to be present.
#[derive(Debug, Deserialize)]
pub struct RawStation {
    pub station_id: Option<String>,
    pub short_name: Option<String>,
    #[serde(alias = "Number")]
    pub number: Option<String>,

    #[serde(alias = "Long", alias = "longitude")]
    pub lon: Option<f64>,
    #[serde(alias = "Lat", alias = "latitude")]
    pub lat: Option<f64>,

    pub name: Option<String>,
}

/// GBFS-style station document: `{ "data": { "stations": [...] } }`.
#[derive(Debug, Deserialize)]
struct StationDocument {
    data: StationData,
}

#[derive(Debug, Deserialize)]
struct StationData {
    stations: Vec<RawStation>,
}

/// A trip row as exported to CSV. Older exports used space-separated column
/// names; both spellings deserialize here.
#[derive(Debug, Deserialize)]
struct RawTrip {
    ride_id: String,
    #[serde(alias = "start station id")]
    start_station_id: String,
    #[serde(alias = "end station id")]
    end_station_id: String,
    #[serde(alias = "start time")]
    started_at: String,
    #[serde(alias = "stop time")]
    ended_at: String,

    #[serde(default, alias = "rideable_type")]
    bike_type: Option<String>,
    #[serde(default)]
    member_casual: Option<String>,
}

/// Maps a raw station record onto the canonical [`Station`] shape.
///
/// Id spellings are tried in order (`station_id`, `short_name`, `number`).
///
/// # Errors
///
/// Returns an error if no id spelling or either coordinate is present.
pub fn normalize_station(raw: RawStation) -> Result<Station> {
    let id = raw
        .station_id
        .or(raw.short_name)
        .or(raw.number)
        .with_context(|| {
            format!(
                "station record has no recognized id field (name: {:?})",
                raw.name
            )
        })?;

    let lon = raw
        .lon
        .with_context(|| format!("station {id} has no recognized longitude field"))?;
    let lat = raw
        .lat
        .with_context(|| format!("station {id} has no recognized latitude field"))?;

    Ok(Station::new(id, lon, lat))
}

/// Parses a station JSON document into canonical stations.
///
/// Accepts either the GBFS-style `{ "data": { "stations": [...] } }` wrapper
/// or a bare top-level array. Malformed records are dropped with a warning.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON in either shape.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let raw: Vec<RawStation> = match serde_json::from_slice::<StationDocument>(bytes) {
        Ok(doc) => doc.data.stations,
        Err(_) => serde_json::from_slice(bytes).context("station JSON is neither a GBFS document nor an array")?,
    };

    let total = raw.len();
    let mut stations = Vec::with_capacity(total);
    for record in raw {
        match normalize_station(record) {
            Ok(s) => stations.push(s),
            Err(e) => warn!(error = %e, "Dropping malformed station record"),
        }
    }

    debug!(parsed = stations.len(), total, "Station document parsed");
    Ok(stations)
}

/// Parses a trip CSV export into canonical trips.
///
/// Rows that fail to deserialize or carry unparseable timestamps are dropped
/// with a warning.
///
/// # Errors
///
/// Returns an error if the CSV itself is unreadable (e.g. a broken header).
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();

    for row in reader.deserialize::<RawTrip>() {
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Dropping malformed trip row");
                continue;
            }
        };
        match normalize_trip(raw) {
            Ok(t) => trips.push(t),
            Err(e) => warn!(error = %e, "Dropping trip with bad timestamp"),
        }
    }

    debug!(parsed = trips.len(), "Trip CSV parsed");
    Ok(trips)
}

fn normalize_trip(raw: RawTrip) -> Result<Trip> {
    let started_at = parse_timestamp(&raw.started_at)
        .with_context(|| format!("trip {}: bad start time {:?}", raw.ride_id, raw.started_at))?;
    let ended_at = parse_timestamp(&raw.ended_at)
        .with_context(|| format!("trip {}: bad end time {:?}", raw.ride_id, raw.ended_at))?;

    let is_member = raw.member_casual.as_deref().map(|m| m == "member");

    Ok(Trip {
        ride_id: raw.ride_id,
        start_station_id: raw.start_station_id,
        end_station_id: raw.end_station_id,
        started_at,
        ended_at,
        bike_type: raw.bike_type,
        is_member,
    })
}

// Exports have used both space- and T-separated timestamps, with and without
// fractional seconds.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    bail!("unrecognized timestamp format: {s:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::minutes_since_midnight;

    #[test]
    fn test_normalize_station_prefers_station_id() {
        let raw = RawStation {
            station_id: Some("A32000".into()),
            short_name: Some("M32-1".into()),
            number: None,
            lon: Some(-71.09),
            lat: Some(42.36),
            name: None,
        };
        let s = normalize_station(raw).unwrap();
        assert_eq!(s.id, "A32000");
    }

    #[test]
    fn test_normalize_station_missing_id_fails() {
        let raw = RawStation {
            station_id: None,
            short_name: None,
            number: None,
            lon: Some(-71.09),
            lat: Some(42.36),
            name: Some("Main St".into()),
        };
        assert!(normalize_station(raw).is_err());
    }

    #[test]
    fn test_normalize_station_missing_coordinate_fails() {
        let raw = RawStation {
            station_id: Some("A32000".into()),
            short_name: None,
            number: None,
            lon: None,
            lat: Some(42.36),
            name: None,
        };
        assert!(normalize_station(raw).is_err());
    }

    #[test]
    fn test_parse_stations_gbfs_document() {
        let json = br#"{"data":{"stations":[
            {"station_id":"A1","lon":-71.1,"lat":42.3,"name":"One"},
            {"short_name":"B2","longitude":-71.2,"latitude":42.4}
        ]}}"#;
        let stations = parse_stations(json).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "A1");
        assert_eq!(stations[1].id, "B2");
        assert_eq!(stations[1].lon, -71.2);
    }

    #[test]
    fn test_parse_stations_bare_array_with_legacy_spellings() {
        let json = br#"[{"Number":"C3","Long":-71.3,"Lat":42.5}]"#;
        let stations = parse_stations(json).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "C3");
        assert_eq!(stations[0].lat, 42.5);
    }

    #[test]
    fn test_parse_stations_drops_malformed_records() {
        let json = br#"[
            {"station_id":"A1","lon":-71.1,"lat":42.3},
            {"name":"no id here","lon":-71.2,"lat":42.4}
        ]"#;
        let stations = parse_stations(json).unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn test_parse_trips_basic() {
        let csv = b"ride_id,started_at,ended_at,start_station_id,end_station_id,rideable_type,member_casual\n\
                    r1,2024-03-01 07:05:00,2024-03-01 09:30:00,A1,B2,classic_bike,member\n\
                    r2,2024-03-01T08:10:00,2024-03-01T08:40:00,B2,A1,electric_bike,casual\n";
        let trips = parse_trips(csv).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].start_station_id, "A1");
        assert_eq!(minutes_since_midnight(trips[0].started_at), 425);
        assert_eq!(trips[0].is_member, Some(true));
        assert_eq!(trips[1].is_member, Some(false));
    }

    #[test]
    fn test_parse_trips_drops_bad_timestamp() {
        let csv = b"ride_id,started_at,ended_at,start_station_id,end_station_id\n\
                    r1,not-a-time,2024-03-01 09:30:00,A1,B2\n\
                    r2,2024-03-01 08:10:00,2024-03-01 08:40:00,B2,A1\n";
        let trips = parse_trips(csv).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].ride_id, "r2");
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let t = parse_timestamp("2024-03-01 07:05:00.123").unwrap();
        assert_eq!(minutes_since_midnight(t), 425);
    }
}
