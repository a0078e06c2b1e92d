//! Interval partitioning of an alignment.
//!
//! Each station's zone reaches halfway to its neighbours; the first and last
//! stations stop at themselves. Consecutive zones share their edge exactly, so
//! the ranges tile `[first, last]` without gap or overlap.

use super::range::StationRange;
use crate::constants::COINCIDE_TOLERANCE;

/// Partitioned ranges keyed by station
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<StationRange>,
}

impl RangeTable {
    /// Partition an ascending, de-duplicated station list
    pub fn partition(stations: &[f64]) -> Self {
        let n = stations.len();
        let ranges = stations
            .iter()
            .enumerate()
            .map(|(i, &station)| {
                let back_edge = if i > 0 {
                    (stations[i - 1] + station) / 2.0
                } else {
                    station
                };
                let front_edge = if i + 1 < n {
                    (station + stations[i + 1]) / 2.0
                } else {
                    station
                };
                StationRange::new(station, back_edge, front_edge)
            })
            .collect();

        Self { ranges }
    }

    /// Range at partition position `index`
    pub fn get(&self, index: usize) -> Option<&StationRange> {
        self.ranges.get(index)
    }

    /// Range owned by `station`
    pub fn find(&self, station: f64) -> Option<&StationRange> {
        let index = self
            .ranges
            .partition_point(|r| r.station < station - COINCIDE_TOLERANCE);
        self.ranges
            .get(index)
            .filter(|r| (r.station - station).abs() <= COINCIDE_TOLERANCE)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
