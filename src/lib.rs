//! Subgrade Quantity Library
//!
//! Station-indexed interval accumulation for road subgrade quantity takeoff.
//! Cross sections sampled along an alignment are classified per quantity type,
//! each station's zone of influence carries the quantity, structure zones are
//! cut out, and adjacent qualifying zones are merged into report rows.
//!
//! This library provides tools for:
//! - Building an ordered station catalog from section snapshots
//! - Partitioning the alignment into per-station ranges
//! - Classifying sections for six subgrade treatment quantity types
//! - Cutting ranges around bridges, tunnels and other block zones
//! - Merging adjacent ranges and assembling tabular reports
//! - Writing reports to CSV through a pluggable sink

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod models;
pub mod quantity;
pub mod station;

// Re-export commonly used types
pub use config::{CriteriaSet, EngineConfig, MergePolicy};
pub use engine::QuantityEngine;
pub use engine::report::QuantityReport;
pub use engine::sink::{CsvReportSink, MemorySink, ReportSink};
pub use error::{QuantityError, Result};
pub use geometry::{GeometryArena, GeometryProvider};
pub use models::{BlockZone, SectionSnapshot, SectionSurvey};
pub use quantity::{CriteriaEvaluator, QuantityKind, export_quantity};
pub use station::{format_station, parse_station};
