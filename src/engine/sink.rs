//! Report sinks.
//!
//! The engine hands a finished [`QuantityReport`] to a sink; persistence and
//! display are the sink's business.

use super::report::QuantityReport;
use crate::constants::get_report_filename;
use crate::error::Result;
use crate::models::Cell;
use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Receiver of finished reports
pub trait ReportSink {
    fn write(&mut self, report: &QuantityReport) -> Result<()>;
}

/// Keeps reports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<QuantityReport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn write(&mut self, report: &QuantityReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Writes each report as a CSV file
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    target: CsvTarget,
}

#[derive(Debug, Clone)]
enum CsvTarget {
    /// Exact output file
    File(PathBuf),
    /// Directory receiving one file per sheet
    Directory(PathBuf),
}

impl CsvReportSink {
    /// Write to exactly this file
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: CsvTarget::File(path.into()),
        }
    }

    /// Write `<sheet>.csv` files into a directory
    pub fn to_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: CsvTarget::Directory(dir.into()),
        }
    }

    /// Path the report will be written to
    pub fn output_path(&self, report: &QuantityReport) -> PathBuf {
        match &self.target {
            CsvTarget::File(path) => path.clone(),
            CsvTarget::Directory(dir) => dir.join(get_report_filename(&report.sheet_name)),
        }
    }
}

impl ReportSink for CsvReportSink {
    fn write(&mut self, report: &QuantityReport) -> Result<()> {
        let path = self.output_path(report);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut df = report_to_dataframe(report)?;
        write_csv(&mut df, &path)?;

        info!(
            "Wrote {} rows of '{}' to {}",
            report.range_count(),
            report.sheet_name,
            path.display()
        );
        Ok(())
    }
}

/// Convert a report into a DataFrame, one column per header entry
///
/// A column whose cells are all numbers becomes `f64`; anything else is text.
pub fn report_to_dataframe(report: &QuantityReport) -> Result<DataFrame> {
    let columns = report
        .header
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cells: Vec<Option<&Cell>> = report.rows.iter().map(|row| row.get(index)).collect();
            let numeric = cells
                .iter()
                .all(|c| matches!(c, Some(Cell::Number(_))));

            if numeric {
                let values: Vec<f64> = cells.iter().filter_map(|c| c.and_then(Cell::as_number)).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<String> = cells
                    .iter()
                    .map(|c| c.map(|cell| cell.to_string()).unwrap_or_default())
                    .collect();
                Column::new(name.as_str().into(), values)
            }
        })
        .collect::<Vec<Column>>();

    let df = DataFrame::new(columns)?;
    debug!("Report '{}' as DataFrame: {:?}", report.sheet_name, df.shape());
    Ok(df)
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    Ok(())
}
