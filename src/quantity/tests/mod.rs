//! Tests for the quantity type evaluators
//!
//! Sections are drawn with the datum at elevation zero, so drawing `y` equals
//! elevation, and the centreline at `x = 0` (left is negative).


// Test helper functions and fixtures
use crate::geometry::{GeometryArena, GeometryHandle, Point2, Polyline};
use crate::models::{FillCut, SectionSnapshot, SideSnapshot};

/// Builds sections together with the arena holding their curves
#[derive(Debug, Default)]
pub struct SurveyFixture {
    pub arena: GeometryArena,
    next_handle: u64,
}

impl SurveyFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a curve and return its handle
    pub fn curve(&mut self, points: &[(f64, f64)]) -> GeometryHandle {
        self.next_handle += 1;
        let polyline = Polyline::new(points.iter().map(|&p| Point2::from(p)).collect());
        self.arena.insert(GeometryHandle(self.next_handle), polyline)
    }

    /// One side with a slope from the road edge to `outer` over `ground`
    pub fn side(&mut self, road_elevation: f64, outer: (f64, f64), ground: &[(f64, f64)]) -> SideSnapshot {
        let edge = (5.0 * outer.0.signum(), road_elevation);
        SideSnapshot {
            slope_exists: true,
            slope: Some(self.curve(&[edge, outer])),
            road_surface: Some(self.curve(&[(0.0, road_elevation), edge])),
            ground_surface: Some(self.curve(ground)),
            retaining_wall: None,
        }
    }

    /// One side on level ground at `ground_elevation`, outer point at `x`
    pub fn level_side(&mut self, road_elevation: f64, ground_elevation: f64, x: f64) -> SideSnapshot {
        self.side(
            road_elevation,
            (x, ground_elevation),
            &[(0.0, ground_elevation), (x * 3.0, ground_elevation)],
        )
    }
}

/// Section at `station` with the given centre elevations and sides
pub fn create_section(
    station: f64,
    road: f64,
    ground: f64,
    left: SideSnapshot,
    right: SideSnapshot,
) -> SectionSnapshot {
    SectionSnapshot {
        station,
        center_kind: if road >= ground {
            FillCut::Fill
        } else {
            FillCut::Cut
        },
        center_x: 0.0,
        datum_y: 0.0,
        datum_elevation: 0.0,
        center_elevation_road: road,
        center_elevation_ground: ground,
        rock_cut: false,
        left,
        right,
    }
}

/// Section on level ground with outer points 8 m either side
pub fn create_level_section(fixture: &mut SurveyFixture, station: f64, road: f64, ground: f64) -> SectionSnapshot {
    let left = fixture.level_side(road, ground, -8.0);
    let right = fixture.level_side(road, ground, 8.0);
    create_section(station, road, ground, left, right)
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
