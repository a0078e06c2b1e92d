//! Report assembly.
//!
//! Turns merged ranges into a header row plus one data row per range, in
//! ascending station order, ready for a [`ReportSink`](super::sink::ReportSink).

use super::range::{MergedRange, Payload};
use super::stats::ExportStats;
use crate::constants::REPORT_BASE_HEADER;
use crate::models::{Cell, ExcludedStation};
use crate::quantity::QuantityKind;
use crate::station::format_station_range;
use serde::Serialize;

/// Tabular result of one quantity export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityReport {
    pub quantity: QuantityKind,
    pub sheet_name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Stations left out because of per-station errors
    pub excluded: Vec<ExcludedStation>,
    pub stats: ExportStats,
}

impl QuantityReport {
    /// Number of merged ranges in the report, zero included
    pub fn range_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a header column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// All values of one column
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    /// Sum of a numeric column
    pub fn column_total(&self, name: &str) -> Option<f64> {
        let cells = self.column(name)?;
        Some(cells.iter().filter_map(|c| c.as_number()).sum())
    }
}

/// Builds reports with a fixed station precision
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    station_digits: usize,
}

impl ReportAssembler {
    pub fn new(station_digits: usize) -> Self {
        Self { station_digits }
    }

    /// Header row for payload type `P`
    pub fn header<P: Payload>() -> Vec<String> {
        REPORT_BASE_HEADER
            .iter()
            .copied()
            .chain(P::column_headers())
            .map(str::to_string)
            .collect()
    }

    /// Assemble the report table
    pub fn assemble<P: Payload>(
        &self,
        quantity: QuantityKind,
        merged: &[MergedRange<P>],
        excluded: Vec<ExcludedStation>,
        stats: ExportStats,
    ) -> QuantityReport {
        let rows = merged
            .iter()
            .map(|range| {
                let mut row = vec![
                    Cell::Number(range.back_edge),
                    Cell::Number(range.front_edge),
                    Cell::Text(format_station_range(
                        range.back_edge,
                        range.front_edge,
                        self.station_digits,
                    )),
                    Cell::Number(range.length()),
                    Cell::Text(range.value.describe()),
                ];
                row.extend(range.value.columns());
                row
            })
            .collect();

        QuantityReport {
            quantity,
            sheet_name: quantity.sheet_name().to_string(),
            header: Self::header::<P>(),
            rows,
            excluded,
            stats,
        }
    }
}
