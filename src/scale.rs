//! Visual scaling helpers for rendering callers.
//!
//! These are presentation hints, not part of the aggregation contract: a
//! square-root radius scale and a three-band quantizer over the
//! departure-to-traffic ratio.

use crate::model::Station;

/// Inclusive radius range for one view configuration, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRange {
    pub min: f64,
    pub max: f64,
}

/// Range used when the full trip set is shown.
pub const UNFILTERED_RANGE: RadiusRange = RadiusRange { min: 0.0, max: 25.0 };

/// Range used when a time-of-day filter is active. The raised minimum keeps
/// low-count stations visible in the sparser filtered view.
pub const FILTERED_RANGE: RadiusRange = RadiusRange { min: 3.0, max: 50.0 };

/// Square-root scale from a traffic count to a circle radius.
///
/// Maps `[0, domain_max]` onto `[range.min, range.max]`; a zero `domain_max`
/// collapses the scale to `range.min`.
pub fn radius_for_traffic(total_traffic: u32, domain_max: u32, range: RadiusRange) -> f64 {
    if domain_max == 0 {
        return range.min;
    }
    let t = (total_traffic as f64 / domain_max as f64).sqrt();
    range.min + (range.max - range.min) * t
}

/// Fraction of a station's traffic that is departures, 0.0 when it saw no
/// traffic at all.
pub fn flow_ratio(station: &Station) -> f64 {
    if station.total_traffic == 0 {
        return 0.0;
    }
    station.departures as f64 / station.total_traffic as f64
}

/// Quantizes a flow ratio into one of three levels.
///
/// [0,1] splits into three equal-width bands mapped to 0.0 (arrival-heavy),
/// 0.5 (balanced), and 1.0 (departure-heavy).
pub fn quantize_flow(ratio: f64) -> f64 {
    if ratio < 1.0 / 3.0 {
        0.0
    } else if ratio < 2.0 / 3.0 {
        0.5
    } else {
        1.0
    }
}
