//! Core data structures for quantity takeoff.
//!
//! Defines the per-station section snapshot handed over by the drawing shell,
//! structure block zones, and report cell values.

use crate::error::{QuantityError, Result};
use crate::geometry::{GeometryArena, GeometryHandle, GeometryProvider, Point2, Polyline};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the design road surface is above or below natural ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillCut {
    Fill,
    Cut,
}

/// Left or right of the centreline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Retaining wall placement on one side of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    /// Wall supporting the road shoulder
    Shoulder,
    /// Wall within the embankment slope
    Embankment,
    /// Wall at the slope toe
    Toe,
    /// Wall retaining a cut slope
    Cutting,
}

/// Retaining wall descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetainingWall {
    pub kind: WallKind,
    pub height: f64,
}

/// Measured attributes of one side of a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideSnapshot {
    pub slope_exists: bool,
    pub slope: Option<GeometryHandle>,
    pub road_surface: Option<GeometryHandle>,
    pub ground_surface: Option<GeometryHandle>,
    pub retaining_wall: Option<RetainingWall>,
}

/// Read-only bundle of cross-section measurements at one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub station: f64,
    pub center_kind: FillCut,
    /// Drawing x of the road centreline
    pub center_x: f64,
    /// Drawing y of the datum elevation
    pub datum_y: f64,
    pub datum_elevation: f64,
    pub center_elevation_road: f64,
    pub center_elevation_ground: f64,
    #[serde(default)]
    pub rock_cut: bool,
    #[serde(default)]
    pub left: SideSnapshot,
    #[serde(default)]
    pub right: SideSnapshot,
}

impl SectionSnapshot {
    pub fn is_center_fill(&self) -> bool {
        self.center_kind == FillCut::Fill
    }

    /// Road minus ground elevation at the centreline (negative in cut)
    pub fn center_height(&self) -> f64 {
        self.center_elevation_road - self.center_elevation_ground
    }

    /// Drawing y of an elevation
    pub fn y_from_elevation(&self, elevation: f64) -> f64 {
        self.datum_y + (elevation - self.datum_elevation)
    }

    /// Intersection of the centreline with natural ground
    pub fn ground_point(&self) -> Point2 {
        Point2::new(
            self.center_x,
            self.y_from_elevation(self.center_elevation_ground),
        )
    }

    pub fn side(&self, side: Side) -> &SideSnapshot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Resolve a required curve of this section
    pub fn resolve<'g, G: GeometryProvider + ?Sized>(
        &self,
        geometry: &'g G,
        handle: Option<GeometryHandle>,
        what: &str,
        side: Side,
    ) -> Result<&'g Polyline> {
        let handle = handle.ok_or_else(|| {
            QuantityError::classification(self.station, format!("{side} {what} is not recorded"))
        })?;
        let polyline = geometry.polyline(handle).ok_or_else(|| {
            QuantityError::geometry_lookup(self.station, handle, format!("{side} {what} not found"))
        })?;
        if !polyline.is_valid() {
            return Err(QuantityError::geometry_lookup(
                self.station,
                handle,
                format!("{side} {what} has fewer than two vertices"),
            ));
        }
        Ok(polyline)
    }

    /// Outer point of one side: the slope toe (or top, in cut) when a slope
    /// exists, otherwise the edge of the road surface
    pub fn outer_point<G: GeometryProvider + ?Sized>(&self, geometry: &G, side: Side) -> Result<Point2> {
        let info = self.side(side);
        let polyline = if info.slope_exists {
            if info.slope.is_none() {
                return Err(QuantityError::classification(
                    self.station,
                    format!("{side} slope is flagged as existing but has no slope line"),
                ));
            }
            self.resolve(geometry, info.slope, "slope line", side)?
        } else {
            self.resolve(geometry, info.road_surface, "road surface", side)?
        };
        polyline.end_point().ok_or_else(|| {
            QuantityError::classification(self.station, format!("{side} outer curve is empty"))
        })
    }
}

/// Sections and resolved curves for one alignment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionSurvey {
    pub sections: Vec<SectionSnapshot>,
    #[serde(default)]
    pub geometry: GeometryArena,
}

impl SectionSurvey {
    /// Load a survey from a JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Kind of structure occupying a block zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Fill,
    Cut,
}

/// Station span excluded from accounting (bridge, tunnel, other structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockZone {
    pub start_station: f64,
    pub end_station: f64,
    pub kind: BlockKind,
    #[serde(default)]
    pub name: Option<String>,
}

impl BlockZone {
    pub fn new(start_station: f64, end_station: f64, kind: BlockKind) -> Self {
        Self {
            start_station,
            end_station,
            kind,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Zone span widened by a margin on both ends
    pub fn padded(&self, margin: f64) -> (f64, f64) {
        (self.start_station - margin, self.end_station + margin)
    }
}

impl fmt::Display for BlockZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "{} [{}, {}]",
                name, self.start_station, self.end_station
            ),
            None => write!(f, "[{}, {}]", self.start_station, self.end_station),
        }
    }
}

/// One cell of a report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A station that was left out of an export, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedStation {
    pub station: f64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_section(left: SideSnapshot) -> SectionSnapshot {
        SectionSnapshot {
            station: 120.0,
            center_kind: FillCut::Fill,
            center_x: 50.0,
            datum_y: 200.0,
            datum_elevation: 100.0,
            center_elevation_road: 104.5,
            center_elevation_ground: 102.0,
            rock_cut: false,
            left,
            right: SideSnapshot::default(),
        }
    }

    #[test]
    fn test_elevation_maps_onto_drawing_y() {
        let section = fill_section(SideSnapshot::default());

        assert_eq!(section.y_from_elevation(100.0), 200.0);
        assert_eq!(section.ground_point(), Point2::new(50.0, 202.0));
        assert_eq!(section.center_height(), 2.5);
        assert!(section.is_center_fill());
    }

    #[test]
    fn test_outer_point_prefers_slope_line() {
        let mut arena = GeometryArena::new();
        let slope = arena.insert(
            GeometryHandle(1),
            Polyline::new(vec![Point2::new(45.0, 204.5), Point2::new(40.0, 202.0)]),
        );
        let road = arena.insert(
            GeometryHandle(2),
            Polyline::new(vec![Point2::new(50.0, 204.5), Point2::new(45.0, 204.5)]),
        );
        let mut left = SideSnapshot {
            slope_exists: true,
            slope: Some(slope),
            road_surface: Some(road),
            ..SideSnapshot::default()
        };

        let section = fill_section(left.clone());
        assert_eq!(section.outer_point(&arena, Side::Left).unwrap(), Point2::new(40.0, 202.0));

        left.slope_exists = false;
        let section = fill_section(left);
        assert_eq!(section.outer_point(&arena, Side::Left).unwrap(), Point2::new(45.0, 204.5));
    }

    #[test]
    fn test_missing_slope_line_is_classification_error() {
        let left = SideSnapshot {
            slope_exists: true,
            ..SideSnapshot::default()
        };
        let section = fill_section(left);

        let error = section.outer_point(&GeometryArena::new(), Side::Left).unwrap_err();
        assert!(matches!(error, QuantityError::Classification { .. }));
        assert!(error.is_station_recoverable());
    }

    #[test]
    fn test_unknown_or_degenerate_curve_is_lookup_error() {
        let mut arena = GeometryArena::new();
        let dot = arena.insert(GeometryHandle(7), Polyline::new(vec![Point2::new(0.0, 0.0)]));
        let section = fill_section(SideSnapshot {
            road_surface: Some(dot),
            ground_surface: Some(GeometryHandle(99)),
            ..SideSnapshot::default()
        });

        let error = section.outer_point(&arena, Side::Left).unwrap_err();
        assert!(matches!(error, QuantityError::GeometryLookup { .. }));

        let error = section
            .resolve(&arena, section.left.ground_surface, "ground surface", Side::Left)
            .unwrap_err();
        assert!(matches!(error, QuantityError::GeometryLookup { .. }));
    }

    #[test]
    fn test_survey_from_json() {
        let survey = SectionSurvey::from_json_str(
            r#"{
                "sections": [
                    { "station": 20.0, "center_kind": "cut", "center_x": 0.0, "datum_y": 0.0,
                      "datum_elevation": 0.0, "center_elevation_road": 8.0,
                      "center_elevation_ground": 10.0, "rock_cut": true },
                    { "station": 10.0, "center_kind": "fill", "center_x": 0.0, "datum_y": 0.0,
                      "datum_elevation": 0.0, "center_elevation_road": 12.0,
                      "center_elevation_ground": 10.0,
                      "left": { "road_surface": 3 } }
                ],
                "geometry": { "3": [{ "x": 0.0, "y": 12.0 }, { "x": -5.0, "y": 12.0 }] }
            }"#,
        )
        .unwrap();

        assert_eq!(survey.geometry.len(), 1);
        let sections = &survey.sections;
        assert_eq!(sections[1].station, 10.0);
        assert_eq!(sections[1].left.road_surface, Some(GeometryHandle(3)));
        assert!(sections[0].rock_cut);
        assert_eq!(sections[0].center_height(), -2.0);
    }

    #[test]
    fn test_block_zone_padding_and_display() {
        let zone = BlockZone::new(100.0, 150.0, BlockKind::Fill).with_name("Bridge 2");

        assert_eq!(zone.padded(5.0), (95.0, 155.0));
        assert!(zone.to_string().starts_with("Bridge 2"));
    }
}
