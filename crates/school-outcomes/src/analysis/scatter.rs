use crate::pipeline::JoinedTable;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub region: String,
    pub schools: u64,
    pub rate: f64,
}

/// One point per joined region: school count against advancement rate.
pub fn scatter_points(table: &JoinedTable) -> Vec<ScatterPoint> {
    table
        .records()
        .iter()
        .map(|record| ScatterPoint {
            region: record.region.clone(),
            schools: record.schools,
            rate: record.rate,
        })
        .collect()
}
