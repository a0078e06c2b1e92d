//! Embankments placed on steep natural ground.
//!
//! Per side, the natural ground under the fill footprint is measured from the
//! centreline ground point to the projection of the slope toe. A side is steep
//! when that span is wide enough to judge and its gradient is steeper than
//! `1:steep_ratio`.

use super::ground::{ground_span, SideSet};
use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, MergePolicy, SteepFillCriterion};
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::{Cell, SectionSnapshot, Side};

/// Steep-slope treatment carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct SteepSlopeTreatment {
    pub sides: SideSet,
    /// Reinforced embankment rather than stepped benches
    pub reinforced: bool,
    /// Natural ground length of the steep sides across the section
    pub ground_length: f64,
    pub treated_area: f64,
}

impl Payload for SteepSlopeTreatment {
    fn apportion(&mut self, length: f64) {
        self.treated_area = self.ground_length * length;
    }

    fn merge(&mut self, next: &Self) {
        self.sides.union(&next.sides);
        self.reinforced |= next.reinforced;
        self.ground_length = self.ground_length.max(next.ground_length);
        self.treated_area += next.treated_area;
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.reinforced == next.reinforced
    }

    fn describe(&self) -> String {
        let method = if self.reinforced {
            "reinforced"
        } else {
            "stepped benches"
        };
        format!("Steep slope embankment, {} ({})", method, self.sides.label())
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Max ground length", "Treated area"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.ground_length), Cell::Number(self.treated_area)]
    }
}

/// Steep-slope embankment evaluator
#[derive(Debug, Clone)]
pub struct SteepFill {
    criterion: SteepFillCriterion,
}

impl SteepFill {
    pub fn new(criterion: SteepFillCriterion) -> Self {
        Self { criterion }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.criteria.steep_fill()?.clone()))
    }
}

impl CriteriaEvaluator for SteepFill {
    type Payload = SteepSlopeTreatment;

    fn kind(&self) -> QuantityKind {
        QuantityKind::SteepFill
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
    ) -> Result<Option<SteepSlopeTreatment>> {
        if !section.is_center_fill() {
            return Ok(None);
        }

        let mut sides = SideSet::default();
        let mut ground_length = 0.0;
        for side in Side::BOTH {
            let toe = section.outer_point(geometry, side)?;
            let span = ground_span(section, geometry, side, toe)?;
            if span.horizontal < self.criterion.min_iteration_width {
                continue;
            }
            if span.ratio().is_some_and(|ratio| ratio < self.criterion.steep_ratio) {
                sides.insert(side);
                ground_length += span.curve_length;
            }
        }

        if sides.is_empty() {
            return Ok(None);
        }

        Ok(Some(SteepSlopeTreatment {
            sides,
            reinforced: section.center_height() >= self.criterion.reinforced_min_fill_height,
            ground_length,
            treated_area: 0.0,
        }))
    }
}
