//! Cross stair excavation under fill on moderately steep ground.

use super::ground::{ground_span, SideSet};
use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, MergePolicy, StairExcavationCriterion};
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::{Cell, SectionSnapshot, Side};

/// Benched ground carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct BenchedGround {
    pub sides: SideSet,
    /// Ground length to bench across the section
    pub ground_length: f64,
    pub excavated_area: f64,
}

impl Payload for BenchedGround {
    fn apportion(&mut self, length: f64) {
        self.excavated_area = self.ground_length * length;
    }

    fn merge(&mut self, next: &Self) {
        self.sides.union(&next.sides);
        self.ground_length = self.ground_length.max(next.ground_length);
        self.excavated_area += next.excavated_area;
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.sides == next.sides
    }

    fn describe(&self) -> String {
        format!("Stair excavation ({})", self.sides.label())
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Max ground length", "Excavated area"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.ground_length), Cell::Number(self.excavated_area)]
    }
}

/// Cross stair excavation evaluator
#[derive(Debug, Clone)]
pub struct StairExcavation {
    criterion: StairExcavationCriterion,
}

impl StairExcavation {
    pub fn new(criterion: StairExcavationCriterion) -> Self {
        Self { criterion }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.criteria.stair_excavation()?.clone()))
    }

    /// Ground between `1:upper` and `1:lower`; steeper ground is a steep-slope
    /// embankment instead
    fn needs_benching(&self, ratio: f64) -> bool {
        ratio >= self.criterion.upper_ratio && ratio < self.criterion.lower_ratio
    }
}

impl CriteriaEvaluator for StairExcavation {
    type Payload = BenchedGround;

    fn kind(&self) -> QuantityKind {
        QuantityKind::StairExcavation
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
    ) -> Result<Option<BenchedGround>> {
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
            if span.ratio().is_some_and(|ratio| self.needs_benching(ratio)) {
                sides.insert(side);
                ground_length += span.curve_length;
            }
        }

        if sides.is_empty() {
            Ok(None)
        } else {
            Ok(Some(BenchedGround {
                sides,
                ground_length,
                excavated_area: 0.0,
            }))
        }
    }
}
