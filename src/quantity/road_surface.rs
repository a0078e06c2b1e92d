//! Road shoulder soil.
//!
//! Every section carries shoulder soil. Its cross-section area per side depends
//! on what finishes the shoulder: a shoulder retaining wall, a guardrail on
//! high fill, or nothing.

use super::{CriteriaEvaluator, QuantityKind};
use crate::config::{EngineConfig, MergePolicy, RoadSurfaceCriterion};
use crate::engine::range::Payload;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::{Cell, SectionSnapshot, Side, WallKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoulderKind {
    Wall,
    Guardrail,
    Plain,
}

impl fmt::Display for ShoulderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoulderKind::Wall => write!(f, "retaining wall"),
            ShoulderKind::Guardrail => write!(f, "guardrail"),
            ShoulderKind::Plain => write!(f, "plain"),
        }
    }
}

/// Shoulder soil carried by one range
#[derive(Debug, Clone, PartialEq)]
pub struct ShoulderSoil {
    pub left: ShoulderKind,
    pub right: ShoulderKind,
    /// Left plus right cross-section area
    pub cross_area: f64,
    pub volume: f64,
}

impl Payload for ShoulderSoil {
    fn apportion(&mut self, length: f64) {
        self.volume = self.cross_area * length;
    }

    fn merge(&mut self, next: &Self) {
        self.volume += next.volume;
        self.cross_area = self.cross_area.max(next.cross_area);
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.left == next.left && self.right == next.right
    }

    fn describe(&self) -> String {
        format!("Shoulder: left {}, right {}", self.left, self.right)
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Cross-section area", "Shoulder volume"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.cross_area), Cell::Number(self.volume)]
    }
}

/// Road shoulder evaluator
#[derive(Debug, Clone)]
pub struct RoadSurface {
    criterion: RoadSurfaceCriterion,
}

impl RoadSurface {
    pub fn new(criterion: RoadSurfaceCriterion) -> Self {
        Self { criterion }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.criteria.road_surface()?.clone()))
    }

    pub fn shoulder_kind(&self, section: &SectionSnapshot, side: Side) -> ShoulderKind {
        let wall = section
            .side(side)
            .retaining_wall
            .is_some_and(|w| w.kind == WallKind::Shoulder);
        if wall {
            ShoulderKind::Wall
        } else if section.is_center_fill()
            && section.center_height() >= self.criterion.guardrail_fill_height
        {
            ShoulderKind::Guardrail
        } else {
            ShoulderKind::Plain
        }
    }

    pub fn shoulder_area(&self, kind: ShoulderKind) -> f64 {
        match kind {
            ShoulderKind::Wall => self.criterion.shoulder_area_wall,
            ShoulderKind::Guardrail => self.criterion.shoulder_area_guardrail,
            ShoulderKind::Plain => self.criterion.shoulder_area_plain,
        }
    }
}

impl CriteriaEvaluator for RoadSurface {
    type Payload = ShoulderSoil;

    fn kind(&self) -> QuantityKind {
        QuantityKind::RoadSurface
    }

    fn merge_policy(&self) -> MergePolicy {
        self.criterion.merge_policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        _geometry: &dyn GeometryProvider,
    ) -> Result<Option<ShoulderSoil>> {
        let left = self.shoulder_kind(section, Side::Left);
        let right = self.shoulder_kind(section, Side::Right);
        Ok(Some(ShoulderSoil {
            left,
            right,
            cross_area: self.shoulder_area(left) + self.shoulder_area(right),
            volume: 0.0,
        }))
    }
}
