//! Tests for structure block cutting

use super::*;
use crate::config::BlockMargins;
use crate::engine::cutter::BlockCutter;
use crate::engine::partition::RangeTable;
use crate::engine::range::CrossSectionRange;
use crate::models::{BlockKind, BlockZone};

/// Ranges of stations 100..=130 step 10, each carrying `density`
fn qualified_ranges(density: f64) -> Vec<CrossSectionRange<TestArea>> {
    RangeTable::partition(&[100.0, 110.0, 120.0, 130.0])
        .iter()
        .map(|r| r.attach(TestArea::new("fill", density)))
        .collect()
}

fn total_area(range: &CrossSectionRange<TestArea>) -> f64 {
    range.back.value.area + range.front.value.area
}

#[test]
fn test_range_inside_zone_is_nulled() {
    let zones = vec![BlockZone::new(104.0, 116.0, BlockKind::Fill)];
    let mut ranges = qualified_ranges(1.0);

    let summary = BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    assert!(ranges[1].is_null);
    assert_eq!(summary.nulled, 1);
    // [100, 105] and [115, 125] each lose a piece
    assert_eq!(summary.truncated, 2);
    assert_eq!(ranges[0].front_edge(), 104.0);
    assert_eq!(ranges[2].back_edge(), 116.0);
}

#[test]
fn test_zone_strictly_inside_keeps_back_on_tie() {
    let zones = vec![BlockZone::new(118.0, 122.0, BlockKind::Cut)];
    let mut ranges = qualified_ranges(0.7);

    BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    let range = &ranges[2];
    assert!(!range.is_null);
    assert_eq!(range.back_edge(), 115.0);
    assert_eq!(range.front_edge(), 118.0);
    assert_close(total_area(range), 2.1);
    assert_eq!(range.back.value.cuts, 1);
    assert_eq!(range.front.value.cuts, 1);
}

#[test]
fn test_zone_inside_keeps_parent_side() {
    // Station 120 sits before the zone, so the back piece survives
    let zones = vec![BlockZone::new(121.0, 123.0, BlockKind::Fill)];
    let mut ranges = qualified_ranges(1.0);

    BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    assert_eq!(ranges[2].back_edge(), 115.0);
    assert_eq!(ranges[2].front_edge(), 121.0);
    assert_close(total_area(&ranges[2]), 6.0);
}

#[test]
fn test_covered_parent_keeps_longer_side() {
    let zones = vec![BlockZone::new(116.0, 121.0, BlockKind::Fill)];
    let mut ranges = qualified_ranges(1.0);

    BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    assert_eq!(ranges[2].back_edge(), 121.0);
    assert_eq!(ranges[2].front_edge(), 125.0);
    assert_close(total_area(&ranges[2]), 4.0);
}

#[test]
fn test_touching_zone_does_not_cut() {
    let zones = vec![BlockZone::new(125.0, 140.0, BlockKind::Fill)];
    let mut ranges = qualified_ranges(1.0);

    let summary = BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    assert_eq!(ranges[2].front_edge(), 125.0);
    assert!(ranges[3].is_null);
    assert_eq!(summary.nulled, 1);
    assert_eq!(summary.truncated, 0);
}

#[test]
fn test_margin_follows_zone_kind() {
    let zones = vec![
        BlockZone::new(100.0, 101.0, BlockKind::Fill),
        BlockZone::new(129.0, 130.0, BlockKind::Cut),
    ];
    let margins = BlockMargins { fill: 2.0, cut: 0.5 };
    let mut ranges = qualified_ranges(1.0);

    BlockCutter::new(&zones, margins).cut(&mut ranges);

    // Fill zone padded to [98, 103]
    assert!(!ranges[0].is_null);
    assert_eq!(ranges[0].back_edge(), 103.0);
    assert_eq!(ranges[0].front_edge(), 105.0);
    assert_eq!(ranges[1].back_edge(), 105.0);
    // Cut zone padded to [128.5, 130.5]
    assert_eq!(ranges[3].back_edge(), 125.0);
    assert_eq!(ranges[3].front_edge(), 128.5);
}

#[test]
fn test_several_zones_trim_one_range() {
    let zones = vec![
        BlockZone::new(113.0, 116.0, BlockKind::Fill),
        BlockZone::new(124.0, 127.0, BlockKind::Fill),
    ];
    let mut ranges = qualified_ranges(1.0);

    BlockCutter::new(&zones, BlockMargins::default()).cut(&mut ranges);

    assert_eq!(ranges[2].back_edge(), 116.0);
    assert_eq!(ranges[2].front_edge(), 124.0);
    assert_close(total_area(&ranges[2]), 8.0);
}

#[test]
fn test_cut_never_grows_coverage() {
    let zone_sets = vec![
        vec![BlockZone::new(90.0, 95.0, BlockKind::Fill)],
        vec![BlockZone::new(107.0, 108.0, BlockKind::Cut)],
        vec![
            BlockZone::new(101.0, 112.0, BlockKind::Fill),
            BlockZone::new(119.0, 131.0, BlockKind::Cut),
        ],
        vec![BlockZone::new(0.0, 1000.0, BlockKind::Fill)],
    ];

    for zones in zone_sets {
        let mut ranges = qualified_ranges(1.0);
        let before: f64 = ranges.iter().map(|r| r.length()).sum();
        let area_before: f64 = ranges.iter().map(total_area).sum();

        BlockCutter::new(&zones, BlockMargins { fill: 0.5, cut: 1.0 }).cut(&mut ranges);

        let live: Vec<_> = ranges.iter().filter(|r| !r.is_null).collect();
        let after: f64 = live.iter().map(|r| r.length()).sum();
        let area_after: f64 = live.iter().map(|r| total_area(r)).sum();
        assert!(after <= before + 1e-9, "coverage grew for {zones:?}");
        assert!(area_after <= area_before + 1e-9, "area grew for {zones:?}");
    }
}
