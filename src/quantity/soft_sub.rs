//! Soft-subgrade substitution under fill sections.
//!
//! A fill section qualifies when the thin-fill treatment does not already
//! consume the full replacement depth. Each side whose slope toe lies outside
//! the thin-fill radiation cone contributes the natural ground length between
//! the centreline and the toe plus a fixed additional width.

use super::ground::ground_span;
use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, MergePolicy, SoftSubCriterion, ThinFillCriterion};
use crate::constants::MIN_TREATED_WIDTH;
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::{cone_position, ConePosition, GeometryProvider};
use crate::models::{Cell, SectionSnapshot, Side};
use tracing::debug;

/// Treated soft ground carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutedSoil {
    /// Summed left + right treated width across the section
    pub treated_width: f64,
    /// Treated width times the covered station length
    pub treated_area: f64,
}

impl SubstitutedSoil {
    pub fn new(treated_width: f64) -> Self {
        Self {
            treated_width,
            treated_area: 0.0,
        }
    }
}

impl Payload for SubstitutedSoil {
    fn apportion(&mut self, length: f64) {
        self.treated_area = self.treated_width * length;
    }

    fn merge(&mut self, next: &Self) {
        self.treated_area += next.treated_area;
        self.treated_width = self.treated_width.max(next.treated_width);
    }

    fn is_mergeable(&self, _next: &Self) -> bool {
        true
    }

    fn describe(&self) -> String {
        "Soft subgrade substitution".to_string()
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Max treated width", "Treated area"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.treated_width), Cell::Number(self.treated_area)]
    }
}

/// Soft-subgrade substitution evaluator
#[derive(Debug, Clone)]
pub struct SoftSubstitution {
    criterion: SoftSubCriterion,
    thin_fill: ThinFillCriterion,
}

impl SoftSubstitution {
    pub fn new(criterion: SoftSubCriterion, thin_fill: ThinFillCriterion) -> Self {
        Self {
            criterion,
            thin_fill,
        }
    }

    /// Build from the soft-subgrade and thin-fill criteria of a config
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(
            config.criteria.soft_sub()?.clone(),
            config.criteria.thin_fill()?.clone(),
        ))
    }

    /// Treated width of one side, zero when the toe is inside the thin-fill cone
    fn side_width(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
        side: Side,
    ) -> Result<f64> {
        let toe = section.outer_point(geometry, side)?;
        let gradient = 1.0 / self.thin_fill.fill_ray_ratio;
        if cone_position(section.ground_point(), gradient, gradient, toe) == ConePosition::Within {
            return Ok(0.0);
        }

        let span = ground_span(section, geometry, side, toe)?;
        Ok(span.curve_length + self.criterion.additional_width)
    }
}

impl CriteriaEvaluator for SoftSubstitution {
    type Payload = SubstitutedSoil;

    fn kind(&self) -> QuantityKind {
        QuantityKind::SoftSub
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
    ) -> Result<Option<SubstitutedSoil>> {
        if !section.is_center_fill() {
            return Ok(None);
        }

        let thin_fill_depth = self.thin_fill.fill_treated_depth - section.center_height();
        if self.criterion.replacement_depth - thin_fill_depth < self.criterion.min_replacement_depth {
            return Ok(None);
        }

        let mut width = 0.0;
        for side in Side::BOTH {
            width += self.side_width(section, geometry, side)?;
        }

        debug!("Station {}: soft subgrade width {:.3}", section.station, width);
        if width > MIN_TREATED_WIDTH {
            Ok(Some(SubstitutedSoil::new(width)))
        } else {
            Ok(None)
        }
    }
}
