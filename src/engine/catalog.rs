//! Station catalog construction.
//!
//! Sorts the raw section snapshots by station and collapses duplicates.
//! When two snapshots share a station the later one in input order wins.

use crate::constants::COINCIDE_TOLERANCE;
use crate::error::{QuantityError, Result};
use crate::models::{ExcludedStation, SectionSnapshot};
use crate::station::compare_stations;
use tracing::{debug, warn};

/// Ordered, de-duplicated stations of one alignment with their snapshots
#[derive(Debug, Clone)]
pub struct StationCatalog<'a> {
    entries: Vec<(f64, &'a SectionSnapshot)>,
    duplicates: usize,
    skipped: Vec<ExcludedStation>,
}

impl<'a> StationCatalog<'a> {
    /// Build the catalog from snapshots in any order
    ///
    /// Snapshots with a non-finite station cannot be placed on the alignment
    /// and are reported as skipped. Fails with `NoStations` when nothing is left.
    pub fn build(sections: &'a [SectionSnapshot]) -> Result<Self> {
        let mut skipped = Vec::new();
        let mut indexed: Vec<(usize, &'a SectionSnapshot)> = Vec::with_capacity(sections.len());

        for (index, section) in sections.iter().enumerate() {
            if section.station.is_finite() {
                indexed.push((index, section));
            } else {
                warn!("Skipping section #{} with non-finite station", index);
                skipped.push(ExcludedStation {
                    station: section.station,
                    reason: "station is not a finite number".to_string(),
                });
            }
        }

        // Stable sort keeps input order among equal stations
        indexed.sort_by(|a, b| compare_stations(a.1.station, b.1.station));

        let mut entries: Vec<(f64, &'a SectionSnapshot)> = Vec::with_capacity(indexed.len());
        let mut duplicates = 0;
        for (_, section) in indexed {
            match entries.last_mut() {
                Some(last) if last.0 == section.station => {
                    *last = (section.station, section);
                    duplicates += 1;
                }
                _ => entries.push((section.station, section)),
            }
        }

        if entries.is_empty() {
            return Err(QuantityError::NoStations);
        }

        debug!(
            "Station catalog: {} stations from {} sections ({} duplicates collapsed)",
            entries.len(),
            sections.len(),
            duplicates
        );

        Ok(Self {
            entries,
            duplicates,
            skipped,
        })
    }

    /// Stations in ascending order
    pub fn stations(&self) -> Vec<f64> {
        self.entries.iter().map(|(station, _)| *station).collect()
    }

    /// Snapshot at catalog position `index`
    pub fn section(&self, index: usize) -> Option<&'a SectionSnapshot> {
        self.entries.get(index).map(|(_, section)| *section)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &'a SectionSnapshot)> + '_ {
        self.entries.iter().copied()
    }

    /// Position of `station`, tolerating coordinate noise
    pub fn position(&self, station: f64) -> Option<usize> {
        let index = self
            .entries
            .partition_point(|(s, _)| *s < station - COINCIDE_TOLERANCE);
        self.entries
            .get(index)
            .filter(|(s, _)| (*s - station).abs() <= COINCIDE_TOLERANCE)
            .map(|_| index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of snapshots replaced by a later one at the same station
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Snapshots that could not be placed in the catalog
    pub fn skipped(&self) -> &[ExcludedStation] {
        &self.skipped
    }
}
