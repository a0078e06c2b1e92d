//! Thin fill and shallow cut subgrade treatment.

use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, MergePolicy, ThinFillCriterion};
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::{cone_position, ConePosition, GeometryProvider, Point2};
use crate::models::{Cell, FillCut, SectionSnapshot, Side};
use tracing::debug;

/// Which of the two treatments applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinFillKind {
    /// Over-excavate below a low embankment and backfill
    ThinFill,
    /// Scarify and compact below a shallow cutting
    ShallowCut,
}

/// Thin fill / shallow cut treatment carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct ThinFillTreatment {
    pub kind: ThinFillKind,
    pub treated_depth: f64,
    /// Horizontal distance between the two outer points
    pub footprint_width: f64,
    pub treated_area: f64,
    pub treated_volume: f64,
}

impl ThinFillTreatment {
    pub fn new(kind: ThinFillKind, treated_depth: f64, footprint_width: f64) -> Self {
        Self {
            kind,
            treated_depth,
            footprint_width,
            treated_area: 0.0,
            treated_volume: 0.0,
        }
    }
}

impl Payload for ThinFillTreatment {
    fn apportion(&mut self, length: f64) {
        self.treated_area = self.footprint_width * length;
        self.treated_volume = self.treated_area * self.treated_depth;
    }

    fn merge(&mut self, next: &Self) {
        self.treated_area += next.treated_area;
        self.treated_volume += next.treated_volume;
        self.treated_depth = self.treated_depth.max(next.treated_depth);
        self.footprint_width = self.footprint_width.max(next.footprint_width);
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.kind == next.kind
    }

    fn describe(&self) -> String {
        match self.kind {
            ThinFillKind::ThinFill => "Thin fill: over-excavate and backfill".to_string(),
            ThinFillKind::ShallowCut => "Shallow cut: scarify and compact".to_string(),
        }
    }

    fn column_headers() -> Vec<&'static str> {
        vec![
            "Max treated depth",
            "Max footprint width",
            "Treated area",
            "Treated volume",
        ]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![
            Cell::Number(self.treated_depth),
            Cell::Number(self.footprint_width),
            Cell::Number(self.treated_area),
            Cell::Number(self.treated_volume),
        ]
    }
}

/// Thin fill / shallow cut evaluator
#[derive(Debug, Clone)]
pub struct ThinFillShallowCut {
    criterion: ThinFillCriterion,
}

impl ThinFillShallowCut {
    pub fn new(criterion: ThinFillCriterion) -> Self {
        Self { criterion }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.criteria.thin_fill()?.clone()))
    }

    fn inside_cone(section: &SectionSnapshot, ray_ratio: f64, outer: [Point2; 2]) -> bool {
        let gradient = 1.0 / ray_ratio;
        outer
            .iter()
            .all(|p| cone_position(section.ground_point(), gradient, gradient, *p) == ConePosition::Within)
    }
}

impl CriteriaEvaluator for ThinFillShallowCut {
    type Payload = ThinFillTreatment;

    fn kind(&self) -> QuantityKind {
        QuantityKind::ThinFill
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
    ) -> Result<Option<ThinFillTreatment>> {
        let c = &self.criterion;
        let height = section.center_height();

        let (kind, ray_ratio, treated_depth) = match section.center_kind {
            FillCut::Fill => {
                if !(height < c.max_fill_height) {
                    return Ok(None);
                }
                (ThinFillKind::ThinFill, c.fill_ray_ratio, c.fill_treated_depth - height)
            }
            FillCut::Cut => {
                if !(-height < c.max_cut_depth) {
                    return Ok(None);
                }
                (ThinFillKind::ShallowCut, c.cut_ray_ratio, c.cut_treated_depth)
            }
        };
        if treated_depth <= 0.0 {
            return Ok(None);
        }

        let left = section.outer_point(geometry, Side::Left)?;
        let right = section.outer_point(geometry, Side::Right)?;
        if !Self::inside_cone(section, ray_ratio, [left, right]) {
            debug!("Station {}: outer points leave the {:?} cone", section.station, kind);
            return Ok(None);
        }

        Ok(Some(ThinFillTreatment::new(
            kind,
            treated_depth,
            (right.x - left.x).abs(),
        )))
    }
}
