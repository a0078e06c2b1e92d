//! Natural ground measurements shared by the fill criteria.

use crate::constants::COINCIDE_TOLERANCE;
use crate::error::{QuantityError, Result};
use crate::geometry::{GeometryProvider, Point2};
use crate::models::{SectionSnapshot, Side};

/// Natural ground between the centreline and one side's outer point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSpan {
    /// Centreline ground point projected onto the side's ground curve
    pub center_on_ground: Point2,
    /// Outer point projected onto the side's ground curve
    pub outer_on_ground: Point2,
    /// Curve length between the two projections
    pub curve_length: f64,
    pub horizontal: f64,
    pub vertical: f64,
}

impl GroundSpan {
    /// Ground gradient as `1:n`; `None` when the ground is level
    pub fn ratio(&self) -> Option<f64> {
        if self.vertical < COINCIDE_TOLERANCE {
            None
        } else {
            Some(self.horizontal / self.vertical)
        }
    }
}

/// Measure the natural ground a side's footprint covers
pub fn ground_span(
    section: &SectionSnapshot,
    geometry: &dyn GeometryProvider,
    side: Side,
    outer_point: Point2,
) -> Result<GroundSpan> {
    let ground = section.resolve(
        geometry,
        section.side(side).ground_surface,
        "ground surface",
        side,
    )?;

    let not_projectable = || {
        QuantityError::classification(
            section.station,
            format!("{side} ground surface cannot be projected onto"),
        )
    };
    let outer_param = ground
        .closest_parameter(outer_point)
        .ok_or_else(not_projectable)?;
    let center_param = ground
        .closest_parameter(section.ground_point())
        .ok_or_else(not_projectable)?;

    let outer_on_ground = ground.point_at(outer_param).ok_or_else(not_projectable)?;
    let center_on_ground = ground.point_at(center_param).ok_or_else(not_projectable)?;

    Ok(GroundSpan {
        center_on_ground,
        outer_on_ground,
        curve_length: ground.length_between(outer_param, center_param),
        horizontal: (outer_on_ground.x - center_on_ground.x).abs(),
        vertical: (outer_on_ground.y - center_on_ground.y).abs(),
    })
}

/// Which sides of a section a treatment applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideSet {
    pub left: bool,
    pub right: bool,
}

impl SideSet {
    pub fn insert(&mut self, side: Side) {
        match side {
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    pub fn union(&mut self, other: &SideSet) {
        self.left |= other.left;
        self.right |= other.right;
    }

    pub fn is_empty(&self) -> bool {
        !self.left && !self.right
    }

    pub fn label(&self) -> &'static str {
        match (self.left, self.right) {
            (true, true) => "both sides",
            (true, false) => "left",
            (false, true) => "right",
            (false, false) => "none",
        }
    }
}
