//! SVG renderings of the joined datasets.
//!
//! Charts are drawn into an in-memory string so handlers can return them
//! directly; nothing is written to disk.

use crate::analysis::{scatter_points, RankDirection, RankedEntry};
use crate::pipeline::{JoinedTable, SchoolKind};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

const WIDTH: u32 = 860;
const SCATTER_HEIGHT: u32 = 540;
const RANKING_HEIGHT: u32 = 480;
const FONT: &str = "sans-serif";
const BASE: RGBColor = RGBColor(31, 119, 180);
const ACCENT: RGBColor = RGBColor(214, 39, 40);

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Backend(String),
}

fn backend_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Backend(err.to_string())
}

/// Upper bound of the rate axis, leaving headroom for value labels.
fn rate_ceiling(rates: impl Iterator<Item = f64>) -> f64 {
    rates.fold(100.0_f64, f64::max) * 1.06
}

/// Scatter plot of school count (x) against advancement rate (y), one
/// labeled point per region.
pub fn render_scatter(table: &JoinedTable) -> Result<String, ChartError> {
    let points = scatter_points(table);
    let x_max = points
        .iter()
        .map(|point| point.schools as f64)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;
    let y_max = rate_ceiling(points.iter().map(|point| point.rate));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, SCATTER_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(backend_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{}: school count vs. advancement rate", table.kind().label()),
                (FONT, 20),
            )
            .margin(16)
            .x_label_area_size(44)
            .y_label_area_size(56)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(backend_error)?;

        chart
            .configure_mesh()
            .x_desc("Schools")
            .y_desc("Advancement rate (%)")
            .draw()
            .map_err(backend_error)?;

        chart
            .draw_series(points.iter().map(|point| {
                EmptyElement::at((point.schools as f64, point.rate))
                    + Circle::new((0, 0), 4, BASE.mix(0.8).filled())
                    + Text::new(point.region.clone(), (6, -12), (FONT, 11).into_font())
            }))
            .map_err(backend_error)?;

        root.present().map_err(backend_error)?;
    }

    Ok(svg)
}

/// Bar chart of ranked regions, rank 1 leftmost; highlighted entries use the
/// accent color.
pub fn render_ranking(
    entries: &[RankedEntry],
    kind: SchoolKind,
    direction: RankDirection,
) -> Result<String, ChartError> {
    let slots = entries.len().max(1) as i32;
    let y_max = rate_ceiling(entries.iter().map(|entry| entry.rate));
    let labels: Vec<String> = entries
        .iter()
        .map(|entry| format!("{}. {}", entry.rank, entry.region))
        .collect();
    let label_of = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(index) => labels
            .get(*index as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, RANKING_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(backend_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!(
                    "{} {} regions by advancement rate ({})",
                    direction.label(),
                    entries.len(),
                    kind.label()
                ),
                (FONT, 20),
            )
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(56)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)
            .map_err(backend_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(entries.len() + 1)
            .x_label_formatter(&label_of)
            .y_desc("Advancement rate (%)")
            .draw()
            .map_err(backend_error)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(index, entry)| {
                let slot = index as i32;
                let color = if entry.highlighted { ACCENT } else { BASE };
                Rectangle::new(
                    [
                        (SegmentValue::Exact(slot), 0.0),
                        (SegmentValue::Exact(slot + 1), entry.rate),
                    ],
                    color.filled(),
                )
            }))
            .map_err(backend_error)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(index, entry)| {
                Text::new(
                    format!("{:.1}", entry.rate),
                    (SegmentValue::CenterOf(index as i32), entry.rate + y_max * 0.01),
                    (FONT, 11).into_font(),
                )
            }))
            .map_err(backend_error)?;

        root.present().map_err(backend_error)?;
    }

    Ok(svg)
}
