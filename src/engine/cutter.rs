//! Structure block cutting.
//!
//! Ranges that fall inside a bridge, tunnel or other structure zone are
//! nulled; ranges that straddle a zone edge are truncated to the part outside
//! the zone. Zones are applied one after another, so a range may be trimmed by
//! several of them.

use super::range::{CrossSectionRange, Payload};
use crate::config::BlockMargins;
use crate::models::BlockZone;
use tracing::debug;

/// Counts of ranges affected by block cutting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutSummary {
    pub nulled: usize,
    pub truncated: usize,
}

/// Applies block zones to classified ranges
#[derive(Debug, Clone)]
pub struct BlockCutter<'a> {
    zones: &'a [BlockZone],
    margins: BlockMargins,
}

impl<'a> BlockCutter<'a> {
    pub fn new(zones: &'a [BlockZone], margins: BlockMargins) -> Self {
        Self { zones, margins }
    }

    /// Null or truncate every range that intersects a padded zone
    pub fn cut<P: Payload>(&self, ranges: &mut [CrossSectionRange<P>]) -> CutSummary {
        let mut summary = CutSummary::default();

        for zone in self.zones {
            let (zone_start, zone_end) = zone.padded(self.margins.for_kind(zone.kind));

            for range in ranges.iter_mut().filter(|r| !r.is_null) {
                let back = range.back_edge();
                let front = range.front_edge();

                // Touching edges do not intersect
                if !(back < zone_end && front > zone_start) {
                    continue;
                }

                if back >= zone_start && front <= zone_end {
                    range.is_null = true;
                    summary.nulled += 1;
                    debug!("Station {} lies inside block zone {}", range.station, zone);
                    continue;
                }

                if keep_back_piece(range.station, back, front, zone_start, zone_end) {
                    range.clip(back, zone_start, zone_start);
                } else {
                    range.clip(zone_end, front, zone_end);
                }
                summary.truncated += 1;
                debug!(
                    "Station {} truncated by block zone {} to [{}, {}]",
                    range.station,
                    zone,
                    range.back_edge(),
                    range.front_edge()
                );
            }
        }

        summary
    }
}

/// Which side of a partially overlapped range survives
///
/// A zone covering one end leaves the other end. A zone strictly inside the
/// range leaves the side holding the parent station, or the longer side when
/// the station itself is covered (the back side on a tie).
fn keep_back_piece(station: f64, back: f64, front: f64, zone_start: f64, zone_end: f64) -> bool {
    if zone_start <= back {
        false
    } else if zone_end >= front {
        true
    } else if station <= zone_start {
        true
    } else if station >= zone_end {
        false
    } else {
        zone_start - back >= front - zone_end
    }
}
