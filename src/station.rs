//! Station formatting and parsing.
//!
//! Stations are alignment distances in metres, displayed as `K{km}+{meters}`
//! (for example `K23+456.789`).

use crate::constants::{MAX_STATION_DIGITS, STATION_RANGE_SEPARATOR};
use crate::error::{QuantityError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn station_regex() -> &'static Regex {
    static STATION_RE: OnceLock<Regex> = OnceLock::new();
    STATION_RE.get_or_init(|| {
        Regex::new(r"K(-?\d+)\+(\d*.*)").unwrap_or_else(|e| panic!("invalid station pattern: {e}"))
    })
}

/// Format a station value as `K{km}+{meters}`
///
/// The value is rounded to `max_digits` fractional digits first; a value
/// that is whole after rounding is printed without a fraction. Rounding
/// carries into the kilometre part, so `999.6` with zero digits becomes
/// `K1+000`. Stations before the origin keep a negative kilometre and
/// positive metres (`-5.0` is `K-1+995`). Digits beyond
/// [`MAX_STATION_DIGITS`] are ignored.
pub fn format_station(station: f64, max_digits: usize) -> String {
    let max_digits = max_digits.min(MAX_STATION_DIGITS);
    let scale = 10f64.powi(max_digits as i32);
    let rounded = (station * scale).round() / scale;
    let km = (rounded / 1000.0).floor();
    let meters = (rounded - km * 1000.0).max(0.0);

    if rounded.fract() == 0.0 {
        format!("K{}+{:03.0}", km as i64, meters)
    } else {
        format!(
            "K{}+{:0width$.prec$}",
            km as i64,
            meters,
            width = 4 + max_digits,
            prec = max_digits
        )
    }
}

/// Format a station range as `K23+456~K23+789`
pub fn format_station_range(start: f64, end: f64, max_digits: usize) -> String {
    format!(
        "{}{}{}",
        format_station(start, max_digits),
        STATION_RANGE_SEPARATOR,
        format_station(end, max_digits)
    )
}

/// Parse a `K{km}+{meters}` string back into a station value
///
/// Returns `None` when the text does not follow the pattern.
pub fn parse_station(text: &str) -> Option<f64> {
    let captures = station_regex().captures(text.trim())?;
    let km: i64 = captures.get(1)?.as_str().parse().ok()?;
    let meters: f64 = captures.get(2)?.as_str().trim().parse().ok()?;
    Some(km as f64 * 1000.0 + meters)
}

/// Read a station given either as `K{km}+{meters}` or as plain metres
pub fn station_from_text(text: &str) -> Result<f64> {
    let text = text.trim();
    let station = parse_station(text).or_else(|| text.parse::<f64>().ok());
    match station {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(QuantityError::InvalidStation {
            text: text.to_string(),
        }),
    }
}

/// Read a comma-separated station list
pub fn stations_from_list(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(station_from_text)
        .collect()
}

/// Order two stations by numeric value
pub fn compare_stations(a: f64, b: f64) -> std::cmp::Ordering {
    a.total_cmp(&b)
}
