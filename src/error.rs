//! Error handling for quantity takeoff operations.
//!
//! Catalog and configuration failures abort an export. Geometry and
//! classification failures are scoped to a single station and are recorded
//! in the report instead of aborting the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuantityError {
    #[error("No stations available for export")]
    NoStations,

    #[error("Geometry lookup failed at station {station}: handle {handle} - {reason}")]
    GeometryLookup {
        station: f64,
        handle: String,
        reason: String,
    },

    #[error("Classification failed at station {station}: {reason}")]
    Classification { station: f64, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid station text: {text}")]
    InvalidStation { text: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl QuantityError {
    /// Create a geometry lookup error for one station
    pub fn geometry_lookup(station: f64, handle: impl ToString, reason: impl Into<String>) -> Self {
        Self::GeometryLookup {
            station,
            handle: handle.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a classification error for one station
    pub fn classification(station: f64, reason: impl Into<String>) -> Self {
        Self::Classification {
            station,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the failure only invalidates the station it was raised for
    pub fn is_station_recoverable(&self) -> bool {
        matches!(
            self,
            QuantityError::GeometryLookup { .. } | QuantityError::Classification { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, QuantityError>;
