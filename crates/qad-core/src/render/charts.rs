//! Trend charts from the history CSV, emitted as inline SVG.

use crate::history::HistoryRow;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 120.0;
const PADDING: f64 = 10.0;

/// Render a polyline chart for one value series. Returns `None` when there
/// are fewer than two points, which is not enough for a trend.
pub fn line_chart(title: &str, values: &[f64]) -> Option<String> {
    if values.len() < 2 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };

    let step = (WIDTH - 2.0 * PADDING) / (values.len() - 1) as f64;
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = PADDING + i as f64 * step;
            let y = HEIGHT - PADDING - (v - min) / span * (HEIGHT - 2.0 * PADDING);
            format!("{x:.1},{y:.1}")
        })
        .collect();

    let mut svg = String::with_capacity(512);
    svg.push_str(&format!(
        "<svg class=\"chart\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" \
         role=\"img\" aria-label=\"{}\">",
        super::escape(title)
    ));
    svg.push_str(&format!(
        "<title>{}</title>",
        super::escape(title)
    ));
    svg.push_str(&format!(
        "<polyline fill=\"none\" stroke=\"#4a7bd0\" stroke-width=\"2\" points=\"{}\"/>",
        points.join(" ")
    ));
    svg.push_str(&format!(
        "<text x=\"{PADDING}\" y=\"{:.1}\" class=\"chart-label\">{} (last: {:.0})</text>",
        HEIGHT - 1.0,
        super::escape(title),
        values.last().copied().unwrap_or(0.0)
    ));
    svg.push_str("</svg>");
    Some(svg)
}

/// Trend charts for the repository at `index` across all history rows:
/// lint pass rate and source-file count. Rows that predate the repository
/// (too few columns) are skipped.
pub fn repo_trend_charts(rows: &[HistoryRow], index: usize) -> Vec<String> {
    let pass_rates: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.repos.get(index))
        .map(|r| r.lint_pass_rate() as f64)
        .collect();
    let file_counts: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.repos.get(index))
        .map(|r| r.files as f64)
        .collect();

    let mut charts = Vec::new();
    if let Some(chart) = line_chart("lint pass rate %", &pass_rates) {
        charts.push(chart);
    }
    if let Some(chart) = line_chart("source files", &file_counts) {
        charts.push(chart);
    }
    charts
}
