use super::aggregate::CombinedOutcomeTable;
use super::domain::{RegionRecord, SchoolKind};
use super::tables::SchoolTable;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// School counts joined with combined outcomes; only regions present on both
/// sides survive, in school-table order.
#[derive(Debug, Clone, Serialize)]
pub struct JoinedTable {
    kind: SchoolKind,
    records: Vec<RegionRecord>,
}

impl JoinedTable {
    pub fn inner_join(schools: &SchoolTable, outcomes: &CombinedOutcomeTable) -> Self {
        let mut records = Vec::with_capacity(schools.rows().len());
        let mut dropped = Vec::new();

        for row in schools.rows() {
            match outcomes.get(&row.region) {
                Some(outcome) => records.push(RegionRecord {
                    region: row.region.clone(),
                    schools: row.schools,
                    graduates: outcome.graduates,
                    university_track: outcome.university_track,
                    rate: outcome.rate,
                }),
                None => dropped.push(row.region.as_str()),
            }
        }

        let matched: HashSet<&str> = records
            .iter()
            .map(|record| record.region.as_str())
            .collect();
        let unmatched_outcomes = outcomes
            .rows()
            .iter()
            .filter(|outcome| !matched.contains(outcome.region.as_str()))
            .count();
        if !dropped.is_empty() || unmatched_outcomes > 0 {
            debug!(
                kind = %schools.kind(),
                ?dropped,
                unmatched_outcomes,
                "inner join dropped regions"
            );
        }

        Self {
            kind: schools.kind(),
            records,
        }
    }

    pub fn kind(&self) -> SchoolKind {
        self.kind
    }

    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
