use super::tables::OutcomeTable;
use super::PipelineError;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedOutcome {
    pub region: String,
    pub graduates: u64,
    pub university_track: u64,
    pub rate: f64,
}

/// Outcome counts summed across institution types, with the advancement rate
/// derived from the sums.
#[derive(Debug, Clone, Default)]
pub struct CombinedOutcomeTable {
    rows: Vec<CombinedOutcome>,
    index: HashMap<String, usize>,
}

impl CombinedOutcomeTable {
    /// Sums graduates and university-track graduates per region over every
    /// table, then computes the rate once. Regions keep first-appearance order.
    pub fn combine(tables: &[OutcomeTable]) -> Result<Self, PipelineError> {
        let mut totals: Vec<(String, u64, u64)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for table in tables {
            for row in table.rows() {
                let slot = *index.entry(row.region.clone()).or_insert_with(|| {
                    totals.push((row.region.clone(), 0, 0));
                    totals.len() - 1
                });
                let entry = &mut totals[slot];
                entry.1 += row.graduates;
                entry.2 += row.university_track;
            }
        }

        let rows = totals
            .into_iter()
            .map(|(region, graduates, university_track)| {
                let rate = advancement_rate(&region, graduates, university_track)?;
                Ok(CombinedOutcome {
                    region,
                    graduates,
                    university_track,
                    rate,
                })
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;

        Ok(Self { rows, index })
    }

    pub fn rows(&self) -> &[CombinedOutcome] {
        &self.rows
    }

    pub fn get(&self, region: &str) -> Option<&CombinedOutcome> {
        self.index.get(region).map(|slot| &self.rows[*slot])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn advancement_rate(
    region: &str,
    graduates: u64,
    university_track: u64,
) -> Result<f64, PipelineError> {
    if graduates == 0 {
        return Err(PipelineError::ZeroGraduates {
            region: region.to_string(),
        });
    }

    let rate = university_track as f64 / graduates as f64 * 100.0;
    if university_track > graduates {
        warn!(
            region,
            graduates, university_track, rate, "university-track count exceeds graduates"
        );
    }
    Ok(rate)
}
