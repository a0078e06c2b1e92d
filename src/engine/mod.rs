//! Station interval accumulation engine.
//!
//! Orchestrates one quantity export through its stages:
//!
//! 1. [`catalog`] - sort and de-duplicate the section snapshots
//! 2. [`partition`] - split the alignment into per-station ranges
//! 3. classification - run the quantity's [`CriteriaEvaluator`] per station
//! 4. [`cutter`] - null or truncate ranges inside structure block zones
//! 5. [`merger`] - collapse adjacent mergeable ranges
//! 6. [`report`] - lay the merged ranges out as a table
//!
//! Each stage only consumes the previous stage's output plus read-only
//! configuration. Per-station failures are recorded and the run continues;
//! catalog and configuration failures abort it.

pub mod catalog;
pub mod cutter;
pub mod merger;
pub mod partition;
pub mod range;
pub mod report;
pub mod sink;
pub mod stats;

#[cfg(test)]
pub mod tests;

use self::{
    catalog::StationCatalog,
    cutter::BlockCutter,
    merger::RangeMerger,
    partition::RangeTable,
    range::{CrossSectionRange, MergedRange},
    report::{QuantityReport, ReportAssembler},
    stats::ExportStats,
};

use crate::config::EngineConfig;
use crate::constants::COINCIDE_TOLERANCE;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::{ExcludedStation, SectionSnapshot};
use crate::quantity::CriteriaEvaluator;
use crate::station::{compare_stations, format_station};
use tracing::{debug, info, warn};

/// Merged ranges of one export before they are laid out as a table
#[derive(Debug, Clone)]
pub struct ExportOutcome<P> {
    pub merged: Vec<MergedRange<P>>,
    pub excluded: Vec<ExcludedStation>,
    pub stats: ExportStats,
}

/// Runs quantity exports for one evaluator
#[derive(Debug)]
pub struct QuantityEngine<'c, E> {
    evaluator: E,
    config: &'c EngineConfig,
}

impl<'c, E: CriteriaEvaluator> QuantityEngine<'c, E> {
    /// Create an engine; the configuration is validated up front
    pub fn new(evaluator: E, config: &'c EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { evaluator, config })
    }

    /// Export the quantity over every section
    pub fn export(
        &self,
        sections: &[SectionSnapshot],
        geometry: &dyn GeometryProvider,
    ) -> Result<QuantityReport> {
        let outcome = self.compute(sections, geometry, None)?;
        Ok(self.assemble(outcome))
    }

    /// Export the quantity for selected stations only
    ///
    /// Ranges are still partitioned over all sections, so a selected
    /// station's zone reaches halfway to its real neighbours.
    pub fn export_selected(
        &self,
        sections: &[SectionSnapshot],
        geometry: &dyn GeometryProvider,
        selection: &[f64],
    ) -> Result<QuantityReport> {
        let outcome = self.compute(sections, geometry, Some(selection))?;
        Ok(self.assemble(outcome))
    }

    /// Lay an outcome out as a report table
    pub fn assemble(&self, outcome: ExportOutcome<E::Payload>) -> QuantityReport {
        ReportAssembler::new(self.config.station_digits).assemble(
            self.evaluator.kind(),
            &outcome.merged,
            outcome.excluded,
            outcome.stats,
        )
    }

    /// Run every stage up to merging
    pub fn compute(
        &self,
        sections: &[SectionSnapshot],
        geometry: &dyn GeometryProvider,
        selection: Option<&[f64]>,
    ) -> Result<ExportOutcome<E::Payload>> {
        let kind = self.evaluator.kind();
        let mut stats = ExportStats::new();
        stats.total_sections = sections.len();

        info!("Starting {} export over {} sections", kind, sections.len());

        // Step 1: Station catalog
        let catalog = StationCatalog::build(sections)?;
        stats.catalog_stations = catalog.len();
        let mut excluded: Vec<ExcludedStation> = catalog.skipped().to_vec();
        for skipped in catalog.skipped() {
            stats.add_error(format!("section skipped: {}", skipped.reason));
        }

        // Step 2: Partition over all stations
        let table = RangeTable::partition(&catalog.stations());

        // Step 3: Classification
        let targets = self.select_targets(&catalog, selection, &mut excluded, &mut stats);
        let mut ranges: Vec<CrossSectionRange<E::Payload>> = Vec::new();

        for index in targets {
            let (Some(section), Some(range)) = (catalog.section(index), table.get(index)) else {
                continue;
            };

            match self.evaluator.evaluate(section, geometry) {
                Ok(Some(payload)) => {
                    stats.evaluated += 1;
                    debug!("Station {} qualifies: {:?}", section.station, payload);
                    ranges.push(range.attach(payload));
                }
                Ok(None) => {
                    stats.evaluated += 1;
                }
                Err(e) if e.is_station_recoverable() => {
                    warn!(
                        "Excluding station {} from {}: {}",
                        format_station(section.station, 3),
                        kind,
                        e
                    );
                    stats.add_error(e.to_string());
                    excluded.push(ExcludedStation {
                        station: section.station,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        stats.qualified = ranges.len();
        info!(
            "{}: {} of {} evaluated stations qualify",
            kind, stats.qualified, stats.evaluated
        );

        if ranges.is_empty() {
            info!("{}: no qualifying sections", kind);
            return Ok(ExportOutcome {
                merged: Vec::new(),
                excluded,
                stats,
            });
        }

        // Step 4: Block zones
        let cut = BlockCutter::new(&self.config.block_zones, self.config.block_margins)
            .cut(&mut ranges);
        stats.nulled_by_blocks = cut.nulled;
        stats.truncated_by_blocks = cut.truncated;
        ranges.retain(|r| !r.is_null);

        // Step 5: Merge
        let merger = RangeMerger::new(
            self.config.range_merge_tolerance,
            self.evaluator.merge_policy(),
        );
        let merged = merger.merge(ranges.into_iter().map(MergedRange::from).collect());
        stats.merged_ranges = merged.len();

        info!("{} export complete: {}", kind, stats.summary());

        Ok(ExportOutcome {
            merged,
            excluded,
            stats,
        })
    }

    /// Catalog positions to evaluate, in ascending station order
    fn select_targets(
        &self,
        catalog: &StationCatalog<'_>,
        selection: Option<&[f64]>,
        excluded: &mut Vec<ExcludedStation>,
        stats: &mut ExportStats,
    ) -> Vec<usize> {
        let Some(selection) = selection else {
            return (0..catalog.len()).collect();
        };

        // A station picked twice is evaluated and reported once
        let mut requested = selection.to_vec();
        requested.sort_by(|a, b| compare_stations(*a, *b));
        requested.dedup_by(|a, b| (*a - *b).abs() <= COINCIDE_TOLERANCE);

        let mut targets = Vec::with_capacity(requested.len());
        for station in requested {
            match catalog.position(station) {
                Some(index) => targets.push(index),
                None => {
                    let reason = format!(
                        "selected station {} has no section",
                        format_station(station, 3)
                    );
                    warn!("{}", reason);
                    stats.add_error(reason.clone());
                    excluded.push(ExcludedStation { station, reason });
                }
            }
        }
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}
