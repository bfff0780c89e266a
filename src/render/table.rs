//! HTML rendering of the projected forecast rows.

use std::fmt::Write;

use crate::types::forecast_row::DISPLAY_COLUMNS;
use crate::types::ForecastRow;

/// Renders the forecast rows as an HTML table.
///
/// The header always carries the four display columns, so an empty window
/// still renders as a recognizable (just empty) table.
pub fn forecast_table(rows: &[ForecastRow]) -> String {
    let mut html = String::from("<table class=\"forecast\">\n  <thead>\n    <tr>");
    for column in DISPLAY_COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in rows {
        let _ = writeln!(
            html,
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.time_ct.format("%Y-%m-%d %H:%M:%S"),
            cell(row.temperature_f, 2),
            cell(row.wind_speed_m_s, 2),
            cell(row.precipitation_m, 4),
        );
    }

    html.push_str("  </tbody>\n</table>\n");
    html
}

fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => String::new(),
    }
}
