//! Tests for the interval accumulation engine
//!
//! Unit tests for each pipeline stage plus end-to-end exports driven by a
//! table-based evaluator.

pub mod cutter_tests;

// Test helper functions and fixtures
use crate::config::MergePolicy;
use crate::engine::range::{MergedRange, Payload};
use crate::error::{QuantityError, Result};
use crate::geometry::GeometryProvider;
use crate::models::{Cell, FillCut, SectionSnapshot, SideSnapshot};
use crate::quantity::{CriteriaEvaluator, QuantityKind};

/// Area spread evenly along the alignment at `density` per metre
#[derive(Debug, Clone, PartialEq)]
pub struct TestArea {
    pub label: String,
    pub density: f64,
    pub area: f64,
    pub cuts: usize,
}

impl TestArea {
    pub fn new(label: &str, density: f64) -> Self {
        Self {
            label: label.to_string(),
            density,
            area: 0.0,
            cuts: 0,
        }
    }
}

impl Payload for TestArea {
    fn apportion(&mut self, length: f64) {
        self.area = self.density * length;
    }

    fn merge(&mut self, next: &Self) {
        self.area += next.area;
        self.cuts += next.cuts;
    }

    fn is_mergeable(&self, next: &Self) -> bool {
        self.density == next.density
    }

    fn cut_by_block(&mut self, _block_station: f64) {
        self.cuts += 1;
    }

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn column_headers() -> Vec<&'static str> {
        vec!["Area"]
    }

    fn columns(&self) -> Vec<Cell> {
        vec![Cell::Number(self.area)]
    }
}

/// What the table evaluator answers for one station
#[derive(Debug, Clone)]
pub enum TableOutcome {
    Qualify(TestArea),
    Fail,
}

/// Evaluator answering from a fixed per-station table
///
/// Stations not in the table do not qualify.
#[derive(Debug, Clone)]
pub struct TableEvaluator {
    entries: Vec<(f64, TableOutcome)>,
    policy: MergePolicy,
}

impl TableEvaluator {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn qualify(mut self, station: f64, label: &str, density: f64) -> Self {
        self.entries
            .push((station, TableOutcome::Qualify(TestArea::new(label, density))));
        self
    }

    pub fn fail(mut self, station: f64) -> Self {
        self.entries.push((station, TableOutcome::Fail));
        self
    }
}

impl CriteriaEvaluator for TableEvaluator {
    type Payload = TestArea;

    fn kind(&self) -> QuantityKind {
        QuantityKind::SoftSub
    }

    fn merge_policy(&self) -> MergePolicy {
        self.policy
    }

    fn evaluate(
        &self,
        section: &SectionSnapshot,
        _geometry: &dyn GeometryProvider,
    ) -> Result<Option<TestArea>> {
        match self.entries.iter().find(|(s, _)| *s == section.station) {
            Some((_, TableOutcome::Qualify(area))) => Ok(Some(area.clone())),
            Some((_, TableOutcome::Fail)) => Err(QuantityError::classification(
                section.station,
                "slope flagged but missing",
            )),
            None => Ok(None),
        }
    }
}

/// Create a plain fill section at `station`
pub fn create_test_section(station: f64) -> SectionSnapshot {
    SectionSnapshot {
        station,
        center_kind: FillCut::Fill,
        center_x: 0.0,
        datum_y: 0.0,
        datum_elevation: 100.0,
        center_elevation_road: 102.0,
        center_elevation_ground: 100.0,
        rock_cut: false,
        left: SideSnapshot::default(),
        right: SideSnapshot::default(),
    }
}

/// Create one plain section per station, in the given order
pub fn create_test_sections(stations: &[f64]) -> Vec<SectionSnapshot> {
    stations.iter().map(|&s| create_test_section(s)).collect()
}

/// Create a single-station merged range carrying `density`
pub fn create_merged_range(back: f64, front: f64, label: &str, density: f64) -> MergedRange<TestArea> {
    let mut value = TestArea::new(label, density);
    value.apportion(front - back);
    MergedRange {
        back_edge: back,
        front_edge: front,
        value,
        stations: vec![(back + front) / 2.0],
    }
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
