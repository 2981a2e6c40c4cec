use crate::infra::{parse_direction, parse_school_kind};
use clap::Args;
use school_outcomes::analysis::{rank, RankDirection, RankedEntry};
use school_outcomes::config::AppConfig;
use school_outcomes::error::AppError;
use school_outcomes::pipeline::{PreparedDatasets, SchoolKind, TablePreview};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// School table to rank against (high_school or university)
    #[arg(long, default_value = "high_school", value_parser = parse_school_kind)]
    pub(crate) dataset: SchoolKind,
    /// Ranking direction (top or bottom)
    #[arg(long, default_value = "top", value_parser = parse_direction)]
    pub(crate) direction: RankDirection,
    /// Number of regions to list (defaults to APP_RANKING_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit the ranking as JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        dataset,
        direction,
        limit,
        json,
    } = args;

    let config = AppConfig::load()?;
    let limit = limit.unwrap_or(config.dashboard.default_limit);
    if limit == 0 {
        return Err(AppError::InvalidRequest("--limit must be at least 1".to_string()));
    }

    let datasets = PreparedDatasets::prepare(&config.data)?;
    let entries = rank(datasets.joined(dataset), direction, limit);

    if json {
        let payload = serde_json::to_string_pretty(&entries).map_err(std::io::Error::from)?;
        println!("{payload}");
    } else {
        print!("{}", render_ranking_text(dataset, direction, &entries));
    }
    Ok(())
}

pub(crate) fn run_preview() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let datasets = PreparedDatasets::prepare(&config.data)?;

    for preview in datasets.previews() {
        print!("{}", render_preview_text(preview));
    }

    println!("Joined datasets");
    for kind in SchoolKind::ordered() {
        println!("- {}: {} regions", kind.label(), datasets.joined(kind).len());
    }
    println!("- Combined outcomes: {} regions", datasets.combined().len());
    Ok(())
}

fn render_ranking_text(
    dataset: SchoolKind,
    direction: RankDirection,
    entries: &[RankedEntry],
) -> String {
    let mut out = format!(
        "{} {} regions by university advancement rate ({})\n",
        direction.label(),
        entries.len(),
        dataset.label()
    );
    if entries.is_empty() {
        out.push_str("  (no regions matched both tables)\n");
        return out;
    }

    for entry in entries {
        out.push_str(&format!(
            "{}{:>3}. {} | {:.1}% ({} of {} graduates) | {} schools\n",
            if entry.highlighted { "*" } else { " " },
            entry.rank,
            entry.region,
            entry.rate,
            entry.university_track,
            entry.graduates,
            entry.schools
        ));
    }
    out
}

fn render_preview_text(preview: &TablePreview) -> String {
    let mut out = format!(
        "{} ({} rows)\n  {}\n",
        preview.name,
        preview.total_rows,
        preview.headers.join(" | ")
    );
    for row in &preview.rows {
        out.push_str(&format!("  {}\n", row.join(" | ")));
    }
    out.push('\n');
    out
}
