//! Application constants for the subgrade quantity engine
//!
//! Numeric tolerances, default criterion values and report labels used
//! throughout the crate.

// =============================================================================
// Tolerances
// =============================================================================

/// Maximum gap between two half-interval edges that still counts as adjacent.
///
/// Midpoint arithmetic leaves representation noise, so `[100, 110]` and
/// `[110.0004, 120]` are linked.
pub const RANGE_MERGE_TOLERANCE: f64 = 0.005;

/// Summed left + right treated width below which a section does not qualify
pub const MIN_TREATED_WIDTH: f64 = 0.1;

/// Distance below which two coordinates are considered coincident
pub const COINCIDE_TOLERANCE: f64 = 1e-6;

/// Default number of fractional digits in formatted stations
pub const DEFAULT_STATION_DIGITS: usize = 0;

/// Most fractional station digits an `f64` can carry meaningfully
pub const MAX_STATION_DIGITS: usize = 15;

// =============================================================================
// Default criteria
// =============================================================================

/// Thin fill / shallow cut defaults
pub mod thin_fill {
    pub const MAX_FILL_HEIGHT: f64 = 1.3;
    pub const FILL_RAY_RATIO: f64 = 5.0;
    pub const FILL_TREATED_DEPTH: f64 = 1.3;
    pub const MAX_CUT_DEPTH: f64 = 0.5;
    pub const CUT_RAY_RATIO: f64 = 5.0;
    pub const CUT_TREATED_DEPTH: f64 = 0.8;
}

/// Soft-subgrade substitution defaults
pub mod soft_sub {
    pub const MIN_REPLACEMENT_DEPTH: f64 = 0.5;
    pub const ADDITIONAL_WIDTH: f64 = 2.0;
    pub const REPLACEMENT_DEPTH: f64 = 1.5;
}

/// Steep-slope embankment defaults
pub mod steep_fill {
    pub const MIN_ITERATION_WIDTH: f64 = 4.0;
    pub const STEEP_RATIO: f64 = 2.5;
    pub const REINFORCED_MIN_FILL_HEIGHT: f64 = 5.0;
}

/// Cross stair excavation defaults
pub mod stair_excavation {
    pub const MIN_ITERATION_WIDTH: f64 = 4.0;
    pub const UPPER_RATIO: f64 = 2.5;
    pub const LOWER_RATIO: f64 = 5.0;
}

/// Road shoulder defaults (cross-section areas in m²)
pub mod road_surface {
    pub const SHOULDER_AREA_WALL: f64 = 0.1125;
    pub const SHOULDER_AREA_PLAIN: f64 = 0.264375;
    pub const SHOULDER_AREA_GUARDRAIL: f64 = SHOULDER_AREA_PLAIN + 0.225;
    pub const GUARDRAIL_FILL_HEIGHT: f64 = 3.0;
}

/// High fill / deep cut defaults
pub mod high_fill {
    pub const MIN_FILL_HEIGHT: f64 = 20.0;
    pub const MIN_SOIL_CUT_DEPTH: f64 = 20.0;
    pub const MIN_ROCK_CUT_DEPTH: f64 = 30.0;
}

// =============================================================================
// Report layout
// =============================================================================

/// Leading report columns shared by every quantity type
pub const REPORT_BASE_HEADER: &[&str] = &[
    "Start station",
    "End station",
    "Station range",
    "Length",
    "Treatment",
];

/// Separator between the two ends of a formatted station range
pub const STATION_RANGE_SEPARATOR: &str = "~";

/// Get the CSV file name used for a report sheet
pub fn get_report_filename(sheet_name: &str) -> String {
    format!("{}.csv", sheet_name.replace(' ', "_").to_lowercase())
}
