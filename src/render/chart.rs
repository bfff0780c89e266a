//! Forecast chart assembly.
//!
//! One time axis, three traces, and three independently scaled y-axes: wind
//! speed reads against the left axis, temperature and precipitation against
//! two overlaid axes on the right. Value gaps stay gaps; a null never plots
//! as zero.

use plotly::common::{DashType, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::common::AxisSide;
use plotly::layout::{Axis, AxisType, Layout};
use plotly::{Plot, Scatter};

use crate::config::ChartConfig;
use crate::types::ForecastRow;

/// Element id the inline chart snippet renders into.
pub const CHART_DIV_ID: &str = "forecast-chart";

/// plotly.js bundle the inline snippet expects to find on the page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const MS_PER_DAY: f64 = 86_400_000.0;

/// Builds the three-series forecast chart.
///
/// An empty `rows` slice produces a valid chart with styled axes and no data
/// points.
pub fn forecast_chart(rows: &[ForecastRow], style: &ChartConfig) -> Plot {
    let times: Vec<String> = rows
        .iter()
        .map(|row| row.time_ct.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let wind: Vec<Option<f64>> = rows.iter().map(|row| row.wind_speed_m_s).collect();
    let temperature: Vec<Option<f64>> = rows.iter().map(|row| row.temperature_f).collect();
    let precipitation: Vec<Option<f64>> = rows.iter().map(|row| row.precipitation_m).collect();

    let wind_trace = Scatter::new(times.clone(), wind)
        .mode(Mode::LinesMarkers)
        .name(style.wind_label.as_str())
        .line(
            Line::new()
                .color(style.wind_color.clone())
                .width(2.0)
                .dash(DashType::Solid),
        )
        .marker(Marker::new().symbol(MarkerSymbol::Circle));

    let temperature_trace = Scatter::new(times.clone(), temperature)
        .mode(Mode::LinesMarkers)
        .name(style.temperature_label.as_str())
        .line(
            Line::new()
                .color(style.temperature_color.clone())
                .width(2.0)
                .dash(DashType::Dash),
        )
        .marker(Marker::new().symbol(MarkerSymbol::X))
        .y_axis("y2");

    let precipitation_trace = Scatter::new(times, precipitation)
        .mode(Mode::LinesMarkers)
        .name(style.precipitation_label.as_str())
        .line(
            Line::new()
                .color(style.precipitation_color.clone())
                .width(2.0)
                .dash(DashType::DashDot),
        )
        .marker(Marker::new().symbol(MarkerSymbol::Star))
        .y_axis("y3");

    // The x domain stops short of the right edge so the free-floating third
    // axis has room for its tick labels.
    let layout = Layout::new()
        .title(Title::with_text(style.title.clone()))
        .x_axis(
            Axis::new()
                .title(Title::with_text(style.x_label.clone()))
                .type_(AxisType::Date)
                .tick_format(style.tick_format.as_str())
                .dtick(f64::from(style.tick_interval_days) * MS_PER_DAY)
                .tick_angle(45.0)
                .show_grid(true)
                .domain(&[0.0, 0.9]),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text(style.wind_label.clone()))
                .color(style.wind_color.clone()),
        )
        .y_axis2(
            Axis::new()
                .title(Title::with_text(style.temperature_label.clone()))
                .color(style.temperature_color.clone())
                .anchor("x")
                .overlaying("y")
                .side(AxisSide::Right)
                .show_grid(false),
        )
        .y_axis3(
            Axis::new()
                .title(Title::with_text(style.precipitation_label.clone()))
                .color(style.precipitation_color.clone())
                .anchor("free")
                .overlaying("y")
                .side(AxisSide::Right)
                .position(0.97)
                .show_grid(false),
        )
        .show_legend(false)
        .height(style.height);

    let mut plot = Plot::new();
    plot.add_trace(wind_trace);
    plot.add_trace(temperature_trace);
    plot.add_trace(precipitation_trace);
    plot.set_layout(layout);
    plot
}
