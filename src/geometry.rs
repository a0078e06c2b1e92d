//! Resolved cross-section geometry.
//!
//! The drawing shell resolves every curve a snapshot refers to before the
//! engine runs. The engine only sees these immutable values, looked up through
//! [`GeometryProvider`].

use crate::constants::COINCIDE_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a curve stored in a [`GeometryProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryHandle(pub u64);

impl fmt::Display for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:X}", self.0)
    }
}

/// Point in the cross-section drawing plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Position along a polyline: whole part is the segment index, fraction is
/// the position within that segment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CurveParameter(pub f64);

/// Open polyline made of straight segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    pub points: Vec<Point2>,
}

impl Polyline {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// A polyline needs two vertices to support curve queries
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn end_point(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Total curve length
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// Parameter of the point on the curve closest to `point`
    pub fn closest_parameter(&self, point: Point2) -> Option<CurveParameter> {
        if !self.is_valid() {
            return None;
        }

        let mut best: Option<(f64, f64)> = None;
        for (index, w) in self.points.windows(2).enumerate() {
            let (a, b) = (w[0], w[1]);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let len_sq = dx * dx + dy * dy;
            let t = if len_sq < COINCIDE_TOLERANCE * COINCIDE_TOLERANCE {
                0.0
            } else {
                (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
            };
            let foot = Point2::new(a.x + t * dx, a.y + t * dy);
            let distance = foot.distance_to(&point);
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, index as f64 + t));
            }
        }

        best.map(|(_, param)| CurveParameter(param))
    }

    /// Point at a curve parameter, clamped to the curve ends
    pub fn point_at(&self, parameter: CurveParameter) -> Option<Point2> {
        if !self.is_valid() {
            return None;
        }
        let max = self.segment_count() as f64;
        let p = parameter.0.clamp(0.0, max);
        let index = (p.floor() as usize).min(self.segment_count() - 1);
        let t = p - index as f64;
        let (a, b) = (self.points[index], self.points[index + 1]);
        Some(Point2::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)))
    }

    /// Curve length between two parameters, in either order
    pub fn length_between(&self, from: CurveParameter, to: CurveParameter) -> f64 {
        let (lo, hi) = if from.0 <= to.0 {
            (from.0, to.0)
        } else {
            (to.0, from.0)
        };
        self.length_to(hi) - self.length_to(lo)
    }

    fn length_to(&self, parameter: f64) -> f64 {
        let max = self.segment_count() as f64;
        let p = parameter.clamp(0.0, max);
        let mut length = 0.0;
        for (index, w) in self.points.windows(2).enumerate() {
            let seg = w[0].distance_to(&w[1]);
            if p >= (index + 1) as f64 {
                length += seg;
            } else {
                length += seg * (p - index as f64).max(0.0);
                break;
            }
        }
        length
    }
}

/// Read-only lookup of resolved curves
pub trait GeometryProvider {
    /// Resolve a handle to its polyline, `None` when it is unknown
    fn polyline(&self, handle: GeometryHandle) -> Option<&Polyline>;
}

/// In-memory store of resolved curves keyed by handle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryArena {
    curves: HashMap<GeometryHandle, Polyline>,
}

impl GeometryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a curve and return its handle for chaining
    pub fn insert(&mut self, handle: GeometryHandle, polyline: Polyline) -> GeometryHandle {
        self.curves.insert(handle, polyline);
        handle
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl GeometryProvider for GeometryArena {
    fn polyline(&self, handle: GeometryHandle) -> Option<&Polyline> {
        self.curves.get(&handle)
    }
}

/// Where a point sits relative to a pair of rays radiating from an apex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConePosition {
    /// Above the upper ray
    Above,
    /// Between the two rays
    Within,
    /// Below the lower ray
    Below,
}

/// Classify `point` against rays leaving `apex` on both sides with the given
/// gradients (rise over run, `1 / n` for a `1:n` ray)
pub fn cone_position(apex: Point2, upper_gradient: f64, lower_gradient: f64, point: Point2) -> ConePosition {
    let run = (point.x - apex.x).abs();
    let rise = point.y - apex.y;
    if rise > run * upper_gradient {
        ConePosition::Above
    } else if rise < -run * lower_gradient {
        ConePosition::Below
    } else {
        ConePosition::Within
    }
}
