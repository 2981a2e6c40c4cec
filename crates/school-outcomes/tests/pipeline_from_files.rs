mod common;

use school_outcomes::config::{DataConfig, SourceConfig};
use school_outcomes::pipeline::{
    ColumnLayout, PipelineError, PreparedDatasets, SchoolKind, SourceError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(dir: &Path, name: &str, body: &str) -> SourceConfig {
    let path = dir.join(name);
    fs::write(&path, common::with_preamble(body)).expect("fixture written");
    SourceConfig { path, sheet: None }
}

fn data_config(dir: &TempDir) -> DataConfig {
    DataConfig {
        high_school: write_fixture(dir.path(), "high_schools.csv", common::HIGH_SCHOOLS),
        university: write_fixture(dir.path(), "universities.csv", common::UNIVERSITIES),
        outcomes: [
            write_fixture(dir.path(), "national.csv", common::NATIONAL),
            write_fixture(dir.path(), "public.csv", common::PUBLIC),
            write_fixture(dir.path(), "private.csv", common::PRIVATE),
        ],
        header_rows: 5,
        layout: ColumnLayout::default(),
    }
}

#[test]
fn prepare_loads_all_sources_and_joins_both_school_tables() {
    let dir = TempDir::new().expect("temp dir");
    let datasets = PreparedDatasets::prepare(&data_config(&dir)).expect("pipeline runs");

    let high = datasets.joined(SchoolKind::HighSchool);
    assert_eq!(high.len(), 5);
    let aomori = high
        .records()
        .iter()
        .find(|record| record.region == "青森")
        .expect("padded region name normalized and joined");
    assert_eq!(aomori.schools, 75);
    assert_eq!(aomori.graduates, 200);
    assert_eq!(aomori.university_track, 60);
    assert!((aomori.rate - 30.0).abs() < 1e-9);

    let university = datasets.joined(SchoolKind::University);
    let regions: Vec<&str> = university
        .records()
        .iter()
        .map(|record| record.region.as_str())
        .collect();
    assert_eq!(regions, ["北海道", "東京都", "大阪府"]);

    assert_eq!(datasets.previews().len(), 5);
    assert_eq!(datasets.previews()[0].rows.len(), 5);
}

#[test]
fn combined_counts_are_exact_sums_of_the_three_sheets() {
    let datasets = common::prepared();
    let hokkaido = datasets.combined().get("北海道").expect("region present");
    assert_eq!(hokkaido.graduates, 100 + 200 + 50);
    assert_eq!(hokkaido.university_track, 40 + 80 + 20);
    assert!((hokkaido.rate - 40.0).abs() < 1e-9);

    assert!(datasets
        .combined()
        .rows()
        .iter()
        .all(|row| (0.0..=100.0).contains(&row.rate)));
}

#[test]
fn missing_source_file_aborts_the_pipeline() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = data_config(&dir);
    config.outcomes[1].path = dir.path().join("missing.csv");

    let err = PreparedDatasets::prepare(&config).expect_err("load fails");
    assert!(matches!(err, PipelineError::Source(SourceError::Io { .. })));
}

#[test]
fn wrong_header_offset_surfaces_as_missing_column() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = data_config(&dir);
    config.header_rows = 3;

    let err = PreparedDatasets::prepare(&config).expect_err("header row misplaced");
    assert!(matches!(err, PipelineError::MissingColumn { .. }));
}

#[test]
fn renamed_columns_can_be_configured() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = data_config(&dir);
    let renamed = common::NATIONAL.replace("卒業者数", "卒業者");
    config.outcomes[0] = write_fixture(dir.path(), "national.csv", &renamed);
    for name in ["public.csv", "private.csv"] {
        let path = dir.path().join(name);
        let body = fs::read_to_string(&path).expect("fixture readable");
        fs::write(&path, body.replace("卒業者数", "卒業者")).expect("fixture rewritten");
    }
    config.layout.graduates = "卒 業 者".to_string();

    let datasets = PreparedDatasets::prepare(&config).expect("pipeline runs");
    assert_eq!(datasets.combined().len(), 5);
}
