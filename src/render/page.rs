//! Assembly of the single dashboard page.
//!
//! The page is rendered server-side into one HTML document: heading, intro,
//! optional storm imagery, the date picker, the forecast table, and the inline
//! chart snippet. Only the chart itself runs client-side, against the plotly.js
//! bundle loaded in the head.

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::render::chart::{forecast_chart, CHART_DIV_ID, PLOTLY_CDN};
use crate::render::table::forecast_table;
use crate::types::ForecastRow;

const PAGE_STYLE: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        max-width: 1100px;
        margin: 0 auto;
        padding: 20px;
        color: #222;
    }
    h1 { margin-bottom: 4px; }
    hr { border: none; border-top: 2px solid #ddd; margin: 8px 0 16px 0; }
    .author { text-align: right; font-size: 0.85em; color: #555; margin: 0 0 12px 0; }
    img { max-width: 100%; }
    form { margin: 16px 0 4px 0; }
    table.forecast { border-collapse: collapse; margin: 12px 0; }
    table.forecast th, table.forecast td {
        border: 1px solid #ccc;
        padding: 4px 10px;
        text-align: right;
        font-variant-numeric: tabular-nums;
    }
    table.forecast th { background: #f5f5f5; }
    .asset-missing { color: #888; font-style: italic; }
"#;

/// Renders the dashboard page.
///
/// `animation` carries the pre-encoded data URL of the storm-track loop, or
/// `None` when the asset could not be read; `overview_available` likewise
/// decides whether the static overview image is referenced. A missing asset
/// degrades to an inline placeholder note in its slot; the rest of the page
/// renders normally.
pub fn render_page(
    config: &DashboardConfig,
    picked: NaiveDate,
    rows: &[ForecastRow],
    animation: Option<&str>,
    overview_available: bool,
) -> String {
    let page = &config.page;

    let intro: String = page
        .intro
        .iter()
        .map(|bullet| format!("      <li>{}</li>\n", html_escape(bullet)))
        .collect();

    let animation_html = match animation {
        Some(data_url) => format!(
            "    <p><a href=\"{}\"><img class=\"animation\" src=\"{}\" alt=\"Storm track animation\"></a></p>\n",
            html_escape(&config.assets.animation_link),
            data_url,
        ),
        None => "    <p class=\"asset-missing\">Storm track animation unavailable.</p>\n"
            .to_string(),
    };

    let overview_html = if overview_available {
        "    <p><img class=\"overview\" src=\"/assets/overview.png\" alt=\"Forecast region overview\"></p>\n"
            .to_string()
    } else {
        "    <p class=\"asset-missing\">Region overview image unavailable.</p>\n".to_string()
    };

    let chart = forecast_chart(rows, &config.chart).to_inline_html(Some(CHART_DIV_ID));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <script src="{plotly_cdn}"></script>
  <style>{style}</style>
</head>
<body>
  <h1>{heading}</h1>
  <hr>
  <p class="author">{author}</p>
  <ul>
{intro}  </ul>
  <h2>{subheading}</h2>
{overview}{animation}  <form method="get" action="/">
    <label>{date_label} <input type="date" name="date" value="{picked}"></label>
    <button type="submit">Show</button>
  </form>
  <p>Date selected: {picked}</p>
  <p>{table_caption}</p>
{table}
{chart}
</body>
</html>
"#,
        title = html_escape(&page.heading),
        plotly_cdn = PLOTLY_CDN,
        style = PAGE_STYLE,
        heading = html_escape(&page.heading),
        author = html_escape(&page.author),
        intro = intro,
        subheading = html_escape(&page.subheading),
        animation = animation_html,
        overview = overview_html,
        date_label = html_escape(&page.date_label),
        picked = picked,
        table_caption = html_escape(&page.table_caption),
        table = forecast_table(rows),
        chart = chart,
    )
}

/// Renders a minimal page for fatal failures (credentials, query execution).
pub fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Dashboard unavailable</title>
  <style>{style}</style>
</head>
<body>
  <h1>Dashboard unavailable</h1>
  <p>{message}</p>
</body>
</html>
"#,
        style = PAGE_STYLE,
        message = html_escape(message),
    )
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
