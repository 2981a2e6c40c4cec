use crate::pipeline::{JoinedTable, RegionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    /// Highest rates first.
    #[default]
    Top,
    /// Lowest rates first.
    Bottom,
}

impl RankDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RankDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" | "desc" | "highest" => Ok(Self::Top),
            "bottom" | "asc" | "lowest" => Ok(Self::Bottom),
            other => Err(format!(
                "unknown ranking direction '{other}'; expected top or bottom"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub region: String,
    pub schools: u64,
    pub graduates: u64,
    pub university_track: u64,
    pub rate: f64,
    /// Set on the extreme entry (rank 1) so charts can accent it.
    pub highlighted: bool,
}

/// Stable sort by rate in `direction`, first `limit` rows, ranks 1..=k.
/// Ties keep the joined table's row order.
pub fn rank(table: &JoinedTable, direction: RankDirection, limit: usize) -> Vec<RankedEntry> {
    let mut ordered: Vec<&RegionRecord> = table.records().iter().collect();
    match direction {
        RankDirection::Top => ordered.sort_by(|a, b| b.rate.total_cmp(&a.rate)),
        RankDirection::Bottom => ordered.sort_by(|a, b| a.rate.total_cmp(&b.rate)),
    }

    ordered
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| RankedEntry {
            rank: index + 1,
            region: record.region.clone(),
            schools: record.schools,
            graduates: record.graduates,
            university_track: record.university_track,
            rate: record.rate,
            highlighted: index == 0,
        })
        .collect()
}
