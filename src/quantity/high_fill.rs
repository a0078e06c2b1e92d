//! High fill and deep cut sections.

use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, HighFillCriterion, MergePolicy};
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::{Cell, SectionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighSectionKind {
    HighFill,
    DeepSoilCut,
    DeepRockCut,
}

/// High fill or deep cut carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct HighSection {
    pub kind: HighSectionKind,
    /// Centre fill height, or cut depth, of the tallest station in the range
    pub max_height: f64,
}

impl Payload for HighSection {
    fn apportion(&mut self, _length: f64) {}

    fn merge(&mut self, next: &Self) {
        self.max_height = self.max_height.max(next.max_height);
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.kind == next.kind
    }

    fn describe(&self) -> String {
        match self.kind {
            HighSectionKind::HighFill => "High fill embankment".to_string(),
            HighSectionKind::DeepSoilCut => "Deep soil cutting".to_string(),
            HighSectionKind::DeepRockCut => "Deep rock cutting".to_string(),
        }
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Max height"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.max_height)]
    }
}

/// High fill / deep cut evaluator
#[derive(Debug, Clone)]
pub struct HighFillDeepCut {
    criterion: HighFillCriterion,
}

impl HighFillDeepCut {
    pub fn new(criterion: HighFillCriterion) -> Self {
        Self { criterion }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.criteria.high_fill()?.clone()))
    }
}

impl CriteriaEvaluator for HighFillDeepCut {
    type Payload = HighSection;

    fn kind(&self) -> QuantityKind {
        QuantityKind::HighFill
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        _geometry: &dyn GeometryProvider,
    ) -> Result<Option<HighSection>> {
        let height = section.center_height();

        let (kind, max_height, threshold) = if section.is_center_fill() {
            (HighSectionKind::HighFill, height, self.criterion.min_fill_height)
        } else if section.rock_cut {
            (HighSectionKind::DeepRockCut, -height, self.criterion.min_rock_cut_depth)
        } else {
            (HighSectionKind::DeepSoilCut, -height, self.criterion.min_soil_cut_depth)
        };

        if max_height < threshold {
            return Ok(None);
        }
        Ok(Some(HighSection { kind, max_height }))
    }
}
