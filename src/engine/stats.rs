//! Export statistics
//!
//! Counts collected while a quantity export moves through the pipeline.

use serde::Serialize;

/// Statistics for one quantity export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportStats {
    /// Snapshots handed to the engine
    pub total_sections: usize,
    /// Distinct stations in the catalog
    pub catalog_stations: usize,
    /// Stations the evaluator was run on
    pub evaluated: usize,
    /// Stations that qualified for the quantity
    pub qualified: usize,
    /// Stations left out because of errors
    pub excluded: usize,
    /// Qualified ranges removed entirely by block zones
    pub nulled_by_blocks: usize,
    /// Qualified ranges shortened by block zones
    pub truncated_by_blocks: usize,
    /// Rows in the final report
    pub merged_ranges: usize,
    /// Messages for every excluded station
    pub error_messages: Vec<String>,
}

impl ExportStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a station left out of the export
    pub fn add_error(&mut self, message: String) {
        self.excluded += 1;
        self.error_messages.push(message);
    }

    /// Percentage of evaluated stations that did not fail
    pub fn success_rate(&self) -> f64 {
        let attempted = self.evaluated + self.excluded;
        if attempted == 0 {
            100.0
        } else {
            (self.evaluated as f64 / attempted as f64) * 100.0
        }
    }

    /// Whether the result covers every station that was asked for
    pub fn is_complete(&self) -> bool {
        self.excluded == 0
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} stations, {} evaluated, {} qualified, {} excluded, {} nulled / {} truncated by blocks, {} rows",
            self.catalog_stations,
            self.evaluated,
            self.qualified,
            self.excluded,
            self.nulled_by_blocks,
            self.truncated_by_blocks,
            self.merged_ranges
        )
    }
}
