use super::handlers::ViewQuery;
use crate::analysis::{RankDirection, RankedEntry};
use crate::pipeline::{PreparedDatasets, SchoolKind, TablePreview};
use std::fmt::{self, Write};

/// Renders the dashboard page: the parameter form, both chart images, the
/// ranking table and, on request, previews of the raw source tables.
pub fn render_page(
    datasets: &PreparedDatasets,
    query: &ViewQuery,
    limit: usize,
    entries: &[RankedEntry],
) -> Result<String, fmt::Error> {
    let mut html = String::new();
    let table = datasets.joined(query.dataset);

    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head><meta charset=\"utf-8\">");
    html.push_str("<title>School counts and university advancement by region</title>");
    html.push_str(
        "<style>body{font-family:sans-serif;margin:2rem;}table{border-collapse:collapse;}\
         td,th{border:1px solid #ccc;padding:2px 8px;}tr.highlight{background:#fde2e2;}</style>",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>School counts and university advancement by region</h1>\n");
    writeln!(
        html,
        "<p>Data loaded {} &middot; {} regions joined</p>",
        datasets.loaded_at().format("%Y-%m-%d %H:%M UTC"),
        table.len()
    )?;

    write_form(&mut html, query, limit, table.len())?;

    let params = format!(
        "dataset={}&amp;direction={}&amp;limit={}",
        query.dataset, query.direction, limit
    );
    writeln!(
        html,
        "<section><h2>{}: schools vs. advancement rate</h2>\
         <img alt=\"scatter plot\" src=\"/charts/scatter.svg?{}\"></section>",
        query.dataset.label(),
        params
    )?;
    writeln!(
        html,
        "<section><h2>{} {} by advancement rate</h2>\
         <img alt=\"ranking chart\" src=\"/charts/ranking.svg?{}\"></section>",
        query.direction.label(),
        entries.len(),
        params
    )?;

    write_ranking_table(&mut html, entries)?;

    if query.previews {
        html.push_str("<section><h2>Source previews</h2>\n");
        for preview in datasets.previews() {
            write_preview(&mut html, preview)?;
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn write_form(html: &mut String, query: &ViewQuery, limit: usize, max: usize) -> fmt::Result {
    html.push_str("<form method=\"get\" action=\"/\" onchange=\"this.submit()\">\n");

    html.push_str("<label>Dataset <select name=\"dataset\">");
    for kind in SchoolKind::ordered() {
        write_option(html, kind.slug(), kind.label(), kind == query.dataset)?;
    }
    html.push_str("</select></label>\n");

    html.push_str("<label>Ranking <select name=\"direction\">");
    for direction in [RankDirection::Top, RankDirection::Bottom] {
        write_option(
            html,
            direction.slug(),
            direction.label(),
            direction == query.direction,
        )?;
    }
    html.push_str("</select></label>\n");

    writeln!(
        html,
        "<label>Regions <input type=\"number\" name=\"limit\" \
         min=\"1\" max=\"{}\" value=\"{}\"></label>",
        max.max(1),
        limit
    )?;
    writeln!(
        html,
        "<label><input type=\"checkbox\" name=\"previews\" value=\"true\"{}> \
         Show source previews</label>",
        if query.previews { " checked" } else { "" }
    )?;
    html.push_str("<noscript><button type=\"submit\">Update</button></noscript>\n</form>\n");
    Ok(())
}

fn write_option(html: &mut String, value: &str, label: &str, selected: bool) -> fmt::Result {
    write!(
        html,
        "<option value=\"{}\"{}>{}</option>",
        value,
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

fn write_ranking_table(html: &mut String, entries: &[RankedEntry]) -> fmt::Result {
    html.push_str(
        "<table><thead><tr><th>Rank</th><th>Region</th><th>Schools</th>\
         <th>Graduates</th><th>University track</th><th>Rate (%)</th></tr></thead><tbody>\n",
    );
    for entry in entries {
        writeln!(
            html,
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
            if entry.highlighted {
                " class=\"highlight\""
            } else {
                ""
            },
            entry.rank,
            escape_html(&entry.region),
            entry.schools,
            entry.graduates,
            entry.university_track,
            entry.rate
        )?;
    }
    html.push_str("</tbody></table>\n");
    Ok(())
}

fn write_preview(html: &mut String, preview: &TablePreview) -> fmt::Result {
    writeln!(
        html,
        "<h3>{} <small>({} rows)</small></h3>",
        escape_html(&preview.name),
        preview.total_rows
    )?;
    html.push_str("<table><thead><tr>");
    for header in &preview.headers {
        write!(html, "<th>{}</th>", escape_html(header))?;
    }
    html.push_str("</tr></thead><tbody>\n");
    for row in &preview.rows {
        html.push_str("<tr>");
        for cell in row {
            write!(html, "<td>{}</td>", escape_html(cell))?;
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    Ok(())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
