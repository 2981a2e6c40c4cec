use super::normalizer::normalize_label;
use super::source::RawTable;
use super::PipelineError;

/// Source header names mapped onto the canonical columns the pipeline works
/// with. The same layout applies to every source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub region: String,
    pub school_total: String,
    pub graduates: String,
    pub university_track: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            region: "区分".to_string(),
            school_total: "計".to_string(),
            graduates: "卒業者数".to_string(),
            university_track: "大学等進学者".to_string(),
        }
    }
}

pub(crate) const REGION: &str = "region";
pub(crate) const SCHOOLS: &str = "schools";
pub(crate) const GRADUATES: &str = "graduates";
pub(crate) const UNIVERSITY_TRACK: &str = "university_track";

#[derive(Debug, Clone, Copy)]
pub(crate) struct SchoolColumns {
    pub(crate) region: usize,
    pub(crate) schools: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OutcomeColumns {
    pub(crate) region: usize,
    pub(crate) graduates: usize,
    pub(crate) university_track: usize,
}

impl ColumnLayout {
    pub(crate) fn school_columns(&self, table: &RawTable) -> Result<SchoolColumns, PipelineError> {
        Ok(SchoolColumns {
            region: resolve(table, &self.region, REGION)?,
            schools: resolve(table, &self.school_total, SCHOOLS)?,
        })
    }

    pub(crate) fn outcome_columns(
        &self,
        table: &RawTable,
    ) -> Result<OutcomeColumns, PipelineError> {
        Ok(OutcomeColumns {
            region: resolve(table, &self.region, REGION)?,
            graduates: resolve(table, &self.graduates, GRADUATES)?,
            university_track: resolve(table, &self.university_track, UNIVERSITY_TRACK)?,
        })
    }
}

fn resolve(
    table: &RawTable,
    source_name: &str,
    canonical: &'static str,
) -> Result<usize, PipelineError> {
    table
        .column_index(source_name)
        .ok_or_else(|| PipelineError::MissingColumn {
            table: table.name().to_string(),
            column: normalize_label(source_name),
            canonical,
        })
}
