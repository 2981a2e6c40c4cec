use super::domain::{OutcomeVariant, SchoolKind};
use super::layout::{ColumnLayout, GRADUATES, SCHOOLS, UNIVERSITY_TRACK};
use super::normalizer::normalize_label;
use super::source::{RawRow, RawTable};
use super::PipelineError;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolCount {
    pub region: String,
    pub schools: u64,
}

/// Region → school count, in source row order.
#[derive(Debug, Clone)]
pub struct SchoolTable {
    kind: SchoolKind,
    rows: Vec<SchoolCount>,
}

impl SchoolTable {
    pub fn from_raw(
        kind: SchoolKind,
        table: &RawTable,
        layout: &ColumnLayout,
    ) -> Result<Self, PipelineError> {
        let columns = layout.school_columns(table)?;
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for row in table.rows() {
            let Some(region) = region_of(row, columns.region) else {
                continue;
            };
            if !seen.insert(region.clone()) {
                return Err(duplicate(table, row, region));
            }
            let schools = parse_count(table, row, columns.schools, SCHOOLS)?;
            rows.push(SchoolCount { region, schools });
        }

        Ok(Self { kind, rows })
    }

    pub fn new(kind: SchoolKind, rows: Vec<SchoolCount>) -> Self {
        Self { kind, rows }
    }

    pub fn kind(&self) -> SchoolKind {
        self.kind
    }

    pub fn rows(&self) -> &[SchoolCount] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub region: String,
    pub graduates: u64,
    pub university_track: u64,
}

/// Region → (graduates, university-track graduates) for one institution type.
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    variant: OutcomeVariant,
    rows: Vec<OutcomeCount>,
}

impl OutcomeTable {
    pub fn from_raw(
        variant: OutcomeVariant,
        table: &RawTable,
        layout: &ColumnLayout,
    ) -> Result<Self, PipelineError> {
        let columns = layout.outcome_columns(table)?;
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for row in table.rows() {
            let Some(region) = region_of(row, columns.region) else {
                continue;
            };
            if !seen.insert(region.clone()) {
                return Err(duplicate(table, row, region));
            }
            let graduates = parse_count(table, row, columns.graduates, GRADUATES)?;
            let university_track =
                parse_count(table, row, columns.university_track, UNIVERSITY_TRACK)?;
            rows.push(OutcomeCount {
                region,
                graduates,
                university_track,
            });
        }

        Ok(Self { variant, rows })
    }

    pub fn new(variant: OutcomeVariant, rows: Vec<OutcomeCount>) -> Self {
        Self { variant, rows }
    }

    pub fn variant(&self) -> OutcomeVariant {
        self.variant
    }

    pub fn rows(&self) -> &[OutcomeCount] {
        &self.rows
    }
}

fn region_of(row: &RawRow, index: usize) -> Option<String> {
    let region = normalize_label(row.cell(index));
    (!region.is_empty()).then_some(region)
}

fn duplicate(table: &RawTable, row: &RawRow, region: String) -> PipelineError {
    PipelineError::DuplicateRegion {
        table: table.name().to_string(),
        region,
        line: row.line,
    }
}

fn parse_count(
    table: &RawTable,
    row: &RawRow,
    index: usize,
    column: &'static str,
) -> Result<u64, PipelineError> {
    let raw = row.cell(index);
    count_from_str(raw).ok_or_else(|| PipelineError::NonNumeric {
        table: table.name().to_string(),
        line: row.line,
        column,
        value: raw.to_string(),
    })
}

/// Accepts plain integers, thousands separators, and integral floats as
/// produced by spreadsheet numeric cells.
fn count_from_str(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(value) = cleaned.parse::<u64>() {
        return Some(value);
    }

    let value = cleaned.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}
