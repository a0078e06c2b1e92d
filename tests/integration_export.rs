//! Integration tests for quantity export
//!
//! These tests load a survey and a configuration from JSON files, run exports
//! through the public API and write the reports as CSV, the way the
//! command-line tool does.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use subgrade_quantity::engine::sink::report_to_dataframe;
use subgrade_quantity::{
    CsvReportSink, EngineConfig, QuantityError, QuantityKind, ReportSink, SectionSurvey,
    export_quantity,
};
use tempfile::TempDir;

/// Side JSON referring to curves `base`, `base + 1` and `base + 2`
fn side(base: u64) -> Value {
    json!({
        "slope_exists": true,
        "slope": base,
        "road_surface": base + 1,
        "ground_surface": base + 2
    })
}

fn section(station: f64, left: Value, right: Value) -> Value {
    json!({
        "station": station,
        "center_kind": "fill",
        "center_x": 0.0,
        "datum_y": 0.0,
        "datum_elevation": 0.0,
        "center_elevation_road": 13.0,
        "center_elevation_ground": 10.0,
        "left": left,
        "right": right
    })
}

/// Four fill sections; the two in the middle sit on a hillside on the left
fn write_survey(dir: &Path) -> PathBuf {
    let geometry = json!({
        // Hillside left side: toe 4 m above the centre ground point
        "1": [{ "x": -5.0, "y": 13.0 }, { "x": -10.0, "y": 14.0 }],
        "2": [{ "x": 0.0, "y": 13.0 }, { "x": -5.0, "y": 13.0 }],
        "3": [{ "x": 0.0, "y": 10.0 }, { "x": -20.0, "y": 18.0 }],
        // Level left side
        "11": [{ "x": -5.0, "y": 13.0 }, { "x": -8.0, "y": 10.0 }],
        "12": [{ "x": 0.0, "y": 13.0 }, { "x": -5.0, "y": 13.0 }],
        "13": [{ "x": 0.0, "y": 10.0 }, { "x": -24.0, "y": 10.0 }],
        // Level right side
        "21": [{ "x": 5.0, "y": 13.0 }, { "x": 8.0, "y": 10.0 }],
        "22": [{ "x": 0.0, "y": 13.0 }, { "x": 5.0, "y": 13.0 }],
        "23": [{ "x": 0.0, "y": 10.0 }, { "x": 24.0, "y": 10.0 }]
    });

    let survey = json!({
        "sections": [
            section(40.0, side(1), side(21)),
            section(0.0, side(11), side(21)),
            section(60.0, side(11), side(21)),
            section(20.0, side(1), side(21))
        ],
        "geometry": geometry
    });

    let path = dir.join("survey.json");
    std::fs::write(&path, serde_json::to_string_pretty(&survey).unwrap()).unwrap();
    path
}

fn write_config(dir: &Path) -> PathBuf {
    let config = json!({
        "station_digits": 1,
        "block_zones": [
            { "start_station": 45.0, "end_station": 55.0, "kind": "fill", "name": "Bridge 1" }
        ],
        "criteria": {
            "thin_fill": {
                "max_fill_height": 1.3,
                "fill_ray_ratio": 5.0,
                "fill_treated_depth": 1.3,
                "max_cut_depth": 0.5,
                "cut_ray_ratio": 5.0,
                "cut_treated_depth": 0.8
            },
            "soft_sub": {
                "min_replacement_depth": 0.5,
                "additional_width": 2.0,
                "replacement_depth": 1.5
            }
        }
    });

    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn test_soft_sub_export_to_csv() {
    let temp_dir = TempDir::new().unwrap();
    let survey = SectionSurvey::from_json_file(&write_survey(temp_dir.path())).unwrap();
    let config = EngineConfig::from_json_file(&write_config(temp_dir.path())).unwrap();

    let report = export_quantity(
        QuantityKind::SoftSub,
        &config,
        &survey.sections,
        &survey.geometry,
        None,
    )
    .unwrap();

    // Stations 20 and 40 qualify; the bridge trims 40's zone back to 45
    let width = 116f64.sqrt() + 2.0;
    assert_eq!(report.range_count(), 1);
    assert_eq!(report.rows[0][0].as_number(), Some(10.0));
    assert_eq!(report.rows[0][1].as_number(), Some(45.0));
    assert_eq!(report.rows[0][2].as_text(), Some("K0+010~K0+045"));
    let area = report.column_total("Treated area").unwrap();
    assert!((area - 35.0 * width).abs() < 1e-6);
    assert_eq!(report.stats.truncated_by_blocks, 1);
    assert!(report.excluded.is_empty());

    let output = temp_dir.path().join("out").join("soft.csv");
    let mut sink = CsvReportSink::to_file(&output);
    sink.write(&report).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Treated area"));
    assert!(lines[1].contains("K0+010~K0+045"));
}

#[test]
fn test_missing_curve_excludes_station() {
    let temp_dir = TempDir::new().unwrap();
    let mut survey = SectionSurvey::from_json_file(&write_survey(temp_dir.path())).unwrap();
    let config = EngineConfig::from_json_file(&write_config(temp_dir.path())).unwrap();

    // Point station 20's left ground at a curve that does not exist
    let section = survey
        .sections
        .iter_mut()
        .find(|s| s.station == 20.0)
        .unwrap();
    section.left.ground_surface = Some(subgrade_quantity::geometry::GeometryHandle(404));

    let report = export_quantity(
        QuantityKind::SoftSub,
        &config,
        &survey.sections,
        &survey.geometry,
        None,
    )
    .unwrap();

    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].station, 20.0);
    assert_eq!(report.stats.excluded, 1);
    assert_eq!(report.range_count(), 1);
    assert_eq!(report.rows[0][0].as_number(), Some(30.0));
}

#[test]
fn test_selected_stations() {
    let temp_dir = TempDir::new().unwrap();
    let survey = SectionSurvey::from_json_file(&write_survey(temp_dir.path())).unwrap();
    let config = EngineConfig::from_json_file(&write_config(temp_dir.path())).unwrap();

    let report = export_quantity(
        QuantityKind::SoftSub,
        &config,
        &survey.sections,
        &survey.geometry,
        Some(&[20.0, 35.0][..]),
    )
    .unwrap();

    assert_eq!(report.stats.evaluated, 1);
    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.rows[0][0].as_number(), Some(10.0));
    assert_eq!(report.rows[0][1].as_number(), Some(30.0));
}

#[test]
fn test_missing_criteria_block_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let survey = SectionSurvey::from_json_file(&write_survey(temp_dir.path())).unwrap();
    let config = EngineConfig::from_json_file(&write_config(temp_dir.path())).unwrap();

    let result = export_quantity(
        QuantityKind::RoadSurface,
        &config,
        &survey.sections,
        &survey.geometry,
        None,
    );
    assert!(matches!(result, Err(QuantityError::Configuration { .. })));
}

#[test]
fn test_every_quantity_exports_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let survey = SectionSurvey::from_json_file(&write_survey(temp_dir.path())).unwrap();
    let config = EngineConfig::default();
    let reports_dir = temp_dir.path().join("reports");
    let mut sink = CsvReportSink::to_directory(&reports_dir);

    for kind in QuantityKind::ALL {
        let report = export_quantity(kind, &config, &survey.sections, &survey.geometry, None)
            .unwrap_or_else(|e| panic!("{kind} export failed: {e}"));
        assert!(report.excluded.is_empty(), "{kind} excluded stations");

        let df = report_to_dataframe(&report).unwrap();
        assert_eq!(df.height(), report.range_count());

        sink.write(&report).unwrap();
        assert!(sink.output_path(&report).exists());
    }

    let written = std::fs::read_dir(&reports_dir).unwrap().count();
    assert_eq!(written, QuantityKind::ALL.len());
}

#[test]
fn test_empty_survey_is_no_stations() {
    let survey = SectionSurvey::from_json_str(r#"{ "sections": [] }"#).unwrap();

    let result = export_quantity(
        QuantityKind::HighFill,
        &EngineConfig::default(),
        &survey.sections,
        &survey.geometry,
        None,
    );
    assert!(matches!(result, Err(QuantityError::NoStations)));
}
