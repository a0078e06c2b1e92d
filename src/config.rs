//! Configuration management and validation.
//!
//! Provides the immutable engine configuration: per-quantity criteria
//! thresholds, merge policies, structure block zones and their margins.
//! A config value is built once by the caller and passed explicitly into every
//! evaluator and the block cutter.

use crate::constants::{self, DEFAULT_STATION_DIGITS, MAX_STATION_DIGITS, RANGE_MERGE_TOLERANCE};
use crate::error::{QuantityError, Result};
use crate::models::{BlockKind, BlockZone};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// How two adjacent qualifying ranges decide whether they share a report row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Spatially adjacent ranges are always merged
    Always,
    /// Ranges merge only when their descriptions are identical
    SameDescription,
    /// Defer to the payload's own comparison
    Payload,
}

/// Thin fill / shallow cut criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinFillCriterion {
    /// Largest centre fill height (road above ground) treated as thin fill
    pub max_fill_height: f64,
    /// Thin fill cone rays radiate from the centre ground point at 1:n
    pub fill_ray_ratio: f64,
    /// Depth below the road centre that pavement plus subgrade must reach
    pub fill_treated_depth: f64,
    /// Largest centre cut depth treated as shallow cut
    pub max_cut_depth: f64,
    /// Shallow cut cone rays radiate at 1:n
    pub cut_ray_ratio: f64,
    /// Scarify-and-compact depth below the trench bottom
    pub cut_treated_depth: f64,
    #[serde(default = "same_description")]
    pub merge_policy: MergePolicy,
}

impl Default for ThinFillCriterion {
    fn default() -> Self {
        Self {
            max_fill_height: constants::thin_fill::MAX_FILL_HEIGHT,
            fill_ray_ratio: constants::thin_fill::FILL_RAY_RATIO,
            fill_treated_depth: constants::thin_fill::FILL_TREATED_DEPTH,
            max_cut_depth: constants::thin_fill::MAX_CUT_DEPTH,
            cut_ray_ratio: constants::thin_fill::CUT_RAY_RATIO,
            cut_treated_depth: constants::thin_fill::CUT_TREATED_DEPTH,
            merge_policy: MergePolicy::SameDescription,
        }
    }
}

/// Soft-subgrade substitution criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftSubCriterion {
    /// Remaining replacement depth (D - T) below which nothing is counted
    pub min_replacement_depth: f64,
    /// Extra width added to the treated ground length on each side
    pub additional_width: f64,
    /// Full replacement depth D
    pub replacement_depth: f64,
    #[serde(default = "always")]
    pub merge_policy: MergePolicy,
}

impl Default for SoftSubCriterion {
    fn default() -> Self {
        Self {
            min_replacement_depth: constants::soft_sub::MIN_REPLACEMENT_DEPTH,
            additional_width: constants::soft_sub::ADDITIONAL_WIDTH,
            replacement_depth: constants::soft_sub::REPLACEMENT_DEPTH,
            merge_policy: MergePolicy::Always,
        }
    }
}

/// Steep-slope embankment criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteepFillCriterion {
    /// Smallest horizontal ground span a gradient is measured over
    pub min_iteration_width: f64,
    /// Ground steeper than 1:n counts as steep
    pub steep_ratio: f64,
    /// Centre fill height from which the embankment is reinforced
    pub reinforced_min_fill_height: f64,
    #[serde(default = "same_description")]
    pub merge_policy: MergePolicy,
}

impl Default for SteepFillCriterion {
    fn default() -> Self {
        Self {
            min_iteration_width: constants::steep_fill::MIN_ITERATION_WIDTH,
            steep_ratio: constants::steep_fill::STEEP_RATIO,
            reinforced_min_fill_height: constants::steep_fill::REINFORCED_MIN_FILL_HEIGHT,
            merge_policy: MergePolicy::SameDescription,
        }
    }
}

/// Cross stair excavation criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairExcavationCriterion {
    pub min_iteration_width: f64,
    /// Ground steeper than 1:upper is left to the steep-slope treatment
    pub upper_ratio: f64,
    /// Ground flatter than 1:lower needs no steps
    pub lower_ratio: f64,
    #[serde(default = "always")]
    pub merge_policy: MergePolicy,
}

impl Default for StairExcavationCriterion {
    fn default() -> Self {
        Self {
            min_iteration_width: constants::stair_excavation::MIN_ITERATION_WIDTH,
            upper_ratio: constants::stair_excavation::UPPER_RATIO,
            lower_ratio: constants::stair_excavation::LOWER_RATIO,
            merge_policy: MergePolicy::Always,
        }
    }
}

/// Road shoulder criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSurfaceCriterion {
    pub shoulder_area_wall: f64,
    pub shoulder_area_guardrail: f64,
    pub shoulder_area_plain: f64,
    /// Centre fill height from which a guardrail is installed
    pub guardrail_fill_height: f64,
    #[serde(default = "same_description")]
    pub merge_policy: MergePolicy,
}

impl Default for RoadSurfaceCriterion {
    fn default() -> Self {
        Self {
            shoulder_area_wall: constants::road_surface::SHOULDER_AREA_WALL,
            shoulder_area_guardrail: constants::road_surface::SHOULDER_AREA_GUARDRAIL,
            shoulder_area_plain: constants::road_surface::SHOULDER_AREA_PLAIN,
            guardrail_fill_height: constants::road_surface::GUARDRAIL_FILL_HEIGHT,
            merge_policy: MergePolicy::SameDescription,
        }
    }
}

/// High fill / deep cut criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighFillCriterion {
    pub min_fill_height: f64,
    pub min_soil_cut_depth: f64,
    pub min_rock_cut_depth: f64,
    #[serde(default = "same_description")]
    pub merge_policy: MergePolicy,
}

impl Default for HighFillCriterion {
    fn default() -> Self {
        Self {
            min_fill_height: constants::high_fill::MIN_FILL_HEIGHT,
            min_soil_cut_depth: constants::high_fill::MIN_SOIL_CUT_DEPTH,
            min_rock_cut_depth: constants::high_fill::MIN_ROCK_CUT_DEPTH,
            merge_policy: MergePolicy::SameDescription,
        }
    }
}

fn always() -> MergePolicy {
    MergePolicy::Always
}

fn same_description() -> MergePolicy {
    MergePolicy::SameDescription
}

/// Criteria blocks per quantity type; a block may be absent from a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSet {
    #[serde(default)]
    pub thin_fill: Option<ThinFillCriterion>,
    #[serde(default)]
    pub soft_sub: Option<SoftSubCriterion>,
    #[serde(default)]
    pub steep_fill: Option<SteepFillCriterion>,
    #[serde(default)]
    pub stair_excavation: Option<StairExcavationCriterion>,
    #[serde(default)]
    pub road_surface: Option<RoadSurfaceCriterion>,
    #[serde(default)]
    pub high_fill: Option<HighFillCriterion>,
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self {
            thin_fill: Some(ThinFillCriterion::default()),
            soft_sub: Some(SoftSubCriterion::default()),
            steep_fill: Some(SteepFillCriterion::default()),
            stair_excavation: Some(StairExcavationCriterion::default()),
            road_surface: Some(RoadSurfaceCriterion::default()),
            high_fill: Some(HighFillCriterion::default()),
        }
    }
}

fn required<'a, T>(block: &'a Option<T>, name: &str) -> Result<&'a T> {
    block
        .as_ref()
        .ok_or_else(|| QuantityError::configuration(format!("missing '{name}' criteria")))
}

impl CriteriaSet {
    /// An empty set, for config files that list only what they need
    pub fn empty() -> Self {
        Self {
            thin_fill: None,
            soft_sub: None,
            steep_fill: None,
            stair_excavation: None,
            road_surface: None,
            high_fill: None,
        }
    }

    pub fn thin_fill(&self) -> Result<&ThinFillCriterion> {
        required(&self.thin_fill, "thin_fill")
    }

    pub fn soft_sub(&self) -> Result<&SoftSubCriterion> {
        required(&self.soft_sub, "soft_sub")
    }

    pub fn steep_fill(&self) -> Result<&SteepFillCriterion> {
        required(&self.steep_fill, "steep_fill")
    }

    pub fn stair_excavation(&self) -> Result<&StairExcavationCriterion> {
        required(&self.stair_excavation, "stair_excavation")
    }

    pub fn road_surface(&self) -> Result<&RoadSurfaceCriterion> {
        required(&self.road_surface, "road_surface")
    }

    pub fn high_fill(&self) -> Result<&HighFillCriterion> {
        required(&self.high_fill, "high_fill")
    }
}

/// Extra station distance trimmed around a block zone, by zone kind
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockMargins {
    pub fill: f64,
    pub cut: f64,
}

impl BlockMargins {
    pub fn for_kind(&self, kind: BlockKind) -> f64 {
        match kind {
            BlockKind::Fill => self.fill,
            BlockKind::Cut => self.cut,
        }
    }
}

/// Global configuration for one quantity export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest edge gap still treated as adjacent when merging
    #[serde(default = "default_tolerance")]
    pub range_merge_tolerance: f64,

    /// Fractional digits in formatted station strings
    #[serde(default)]
    pub station_digits: usize,

    /// Structure spans excluded from every quantity
    #[serde(default)]
    pub block_zones: Vec<BlockZone>,

    #[serde(default)]
    pub block_margins: BlockMargins,

    /// Criteria per quantity type
    #[serde(default = "CriteriaSet::empty")]
    pub criteria: CriteriaSet,
}

fn default_tolerance() -> f64 {
    RANGE_MERGE_TOLERANCE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range_merge_tolerance: RANGE_MERGE_TOLERANCE,
            station_digits: DEFAULT_STATION_DIGITS,
            block_zones: Vec::new(),
            block_margins: BlockMargins::default(),
            criteria: CriteriaSet::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)
            .map_err(|e| QuantityError::configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        debug!(
            "Loaded config: {} block zones, merge tolerance {}",
            config.block_zones.len(),
            config.range_merge_tolerance
        );
        Ok(config)
    }

    /// Set the merge tolerance
    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.range_merge_tolerance = tolerance;
        self
    }

    /// Set the station string precision
    pub fn with_station_digits(mut self, digits: usize) -> Self {
        self.station_digits = digits;
        self
    }

    /// Add a structure block zone
    pub fn with_block_zone(mut self, zone: BlockZone) -> Self {
        self.block_zones.push(zone);
        self
    }

    /// Set the block zone margins
    pub fn with_block_margins(mut self, fill: f64, cut: f64) -> Self {
        self.block_margins = BlockMargins { fill, cut };
        self
    }

    /// Replace the criteria set
    pub fn with_criteria(mut self, criteria: CriteriaSet) -> Self {
        self.criteria = criteria;
        self
    }

    /// Reject thresholds and zones the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        check_non_negative("range_merge_tolerance", self.range_merge_tolerance)?;
        check_non_negative("block_margins.fill", self.block_margins.fill)?;
        check_non_negative("block_margins.cut", self.block_margins.cut)?;
        if self.station_digits > MAX_STATION_DIGITS {
            return Err(QuantityError::configuration(format!(
                "station_digits must be at most {MAX_STATION_DIGITS}, got {}",
                self.station_digits
            )));
        }

        for zone in &self.block_zones {
            if !zone.start_station.is_finite() || !zone.end_station.is_finite() {
                return Err(QuantityError::configuration(format!(
                    "block zone {zone} has a non-finite station"
                )));
            }
            if zone.start_station > zone.end_station {
                return Err(QuantityError::configuration(format!(
                    "block zone {zone} starts after it ends"
                )));
            }
        }

        let c = &self.criteria;
        if let Some(t) = &c.thin_fill {
            check_non_negative("thin_fill.max_fill_height", t.max_fill_height)?;
            check_positive("thin_fill.fill_ray_ratio", t.fill_ray_ratio)?;
            check_non_negative("thin_fill.fill_treated_depth", t.fill_treated_depth)?;
            check_non_negative("thin_fill.max_cut_depth", t.max_cut_depth)?;
            check_positive("thin_fill.cut_ray_ratio", t.cut_ray_ratio)?;
            check_non_negative("thin_fill.cut_treated_depth", t.cut_treated_depth)?;
        }
        if let Some(s) = &c.soft_sub {
            check_non_negative("soft_sub.min_replacement_depth", s.min_replacement_depth)?;
            check_non_negative("soft_sub.additional_width", s.additional_width)?;
            check_non_negative("soft_sub.replacement_depth", s.replacement_depth)?;
        }
        if let Some(s) = &c.steep_fill {
            check_non_negative("steep_fill.min_iteration_width", s.min_iteration_width)?;
            check_positive("steep_fill.steep_ratio", s.steep_ratio)?;
            check_non_negative("steep_fill.reinforced_min_fill_height", s.reinforced_min_fill_height)?;
        }
        if let Some(s) = &c.stair_excavation {
            check_non_negative("stair_excavation.min_iteration_width", s.min_iteration_width)?;
            check_positive("stair_excavation.upper_ratio", s.upper_ratio)?;
            check_positive("stair_excavation.lower_ratio", s.lower_ratio)?;
            if s.upper_ratio > s.lower_ratio {
                return Err(QuantityError::configuration(
                    "stair_excavation.upper_ratio must not exceed lower_ratio",
                ));
            }
        }
        if let Some(r) = &c.road_surface {
            check_non_negative("road_surface.shoulder_area_wall", r.shoulder_area_wall)?;
            check_non_negative("road_surface.shoulder_area_guardrail", r.shoulder_area_guardrail)?;
            check_non_negative("road_surface.shoulder_area_plain", r.shoulder_area_plain)?;
            check_non_negative("road_surface.guardrail_fill_height", r.guardrail_fill_height)?;
        }
        if let Some(h) = &c.high_fill {
            check_non_negative("high_fill.min_fill_height", h.min_fill_height)?;
            check_non_negative("high_fill.min_soil_cut_depth", h.min_soil_cut_depth)?;
            check_non_negative("high_fill.min_rock_cut_depth", h.min_rock_cut_depth)?;
        }

        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(QuantityError::configuration(format!(
            "{name} must be a finite non-negative number, got {value}"
        )))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QuantityError::configuration(format!(
            "{name} must be a finite positive number, got {value}"
        )))
    }
}
