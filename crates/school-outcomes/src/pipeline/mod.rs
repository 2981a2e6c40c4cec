mod aggregate;
pub mod domain;
mod join;
mod layout;
mod normalizer;
mod source;
mod tables;

pub use aggregate::{CombinedOutcome, CombinedOutcomeTable};
pub use domain::{OutcomeVariant, RegionRecord, SchoolKind};
pub use join::JoinedTable;
pub use layout::ColumnLayout;
pub use source::{RawRow, RawTable, SourceError, TablePreview};
pub use tables::{OutcomeCount, OutcomeTable, SchoolCount, SchoolTable};

use crate::config::{DataConfig, SourceConfig};
use chrono::{DateTime, Utc};
use tracing::info;

/// Rows shown per raw table preview.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{table} is missing column '{column}' (needed as '{canonical}')")]
    MissingColumn {
        table: String,
        column: String,
        canonical: &'static str,
    },
    #[error("{table} row {line}: '{value}' is not a valid {column} count")]
    NonNumeric {
        table: String,
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("{table} row {line}: region '{region}' appears more than once")]
    DuplicateRegion {
        table: String,
        region: String,
        line: usize,
    },
    #[error("region '{region}' has no graduates across all outcome sheets")]
    ZeroGraduates { region: String },
}

/// The five source tables as loaded, before any column mapping.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub high_school: RawTable,
    pub university: RawTable,
    /// National, public, private; see [`OutcomeVariant::ordered`].
    pub outcomes: [RawTable; 3],
}

impl RawInputs {
    pub fn load(config: &DataConfig) -> Result<Self, SourceError> {
        let load = |source: &SourceConfig| {
            RawTable::from_path(&source.path, source.sheet.as_deref(), config.header_rows)
        };

        Ok(Self {
            high_school: load(&config.high_school)?,
            university: load(&config.university)?,
            outcomes: [
                load(&config.outcomes[0])?,
                load(&config.outcomes[1])?,
                load(&config.outcomes[2])?,
            ],
        })
    }
}

/// Everything the dashboard reads: built once, shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct PreparedDatasets {
    high_school: JoinedTable,
    university: JoinedTable,
    combined: CombinedOutcomeTable,
    previews: Vec<TablePreview>,
    loaded_at: DateTime<Utc>,
}

impl PreparedDatasets {
    pub fn prepare(config: &DataConfig) -> Result<Self, PipelineError> {
        let inputs = RawInputs::load(config)?;
        Self::from_raw(inputs, &config.layout)
    }

    pub fn from_raw(inputs: RawInputs, layout: &ColumnLayout) -> Result<Self, PipelineError> {
        let RawInputs {
            high_school,
            university,
            outcomes,
        } = inputs;

        let high_school_counts =
            SchoolTable::from_raw(SchoolKind::HighSchool, &high_school, layout)?;
        let university_counts =
            SchoolTable::from_raw(SchoolKind::University, &university, layout)?;

        let outcome_tables = OutcomeVariant::ordered()
            .into_iter()
            .zip(outcomes.iter())
            .map(|(variant, table)| OutcomeTable::from_raw(variant, table, layout))
            .collect::<Result<Vec<_>, _>>()?;
        for table in &outcome_tables {
            info!(
                variant = table.variant().label(),
                regions = table.rows().len(),
                "outcome sheet mapped"
            );
        }
        let combined = CombinedOutcomeTable::combine(&outcome_tables)?;

        let high_school_joined = JoinedTable::inner_join(&high_school_counts, &combined);
        let university_joined = JoinedTable::inner_join(&university_counts, &combined);

        info!(
            regions = combined.len(),
            high_school_rows = high_school_joined.len(),
            university_rows = university_joined.len(),
            "datasets prepared"
        );

        let previews = [&high_school, &university]
            .into_iter()
            .chain(outcomes.iter())
            .map(|table| table.preview(PREVIEW_ROWS))
            .collect();

        Ok(Self {
            high_school: high_school_joined,
            university: university_joined,
            combined,
            previews,
            loaded_at: Utc::now(),
        })
    }

    pub fn joined(&self, kind: SchoolKind) -> &JoinedTable {
        match kind {
            SchoolKind::HighSchool => &self.high_school,
            SchoolKind::University => &self.university,
        }
    }

    pub fn combined(&self) -> &CombinedOutcomeTable {
        &self.combined
    }

    pub fn previews(&self) -> &[TablePreview] {
        &self.previews
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
