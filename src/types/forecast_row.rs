//! Column names of the forecast table and the projected row the dashboard
//! renders.

use chrono::NaiveDateTime;

/// Column holding the model run initialization instant. Only present on
/// frames fetched with a range selection.
pub const COL_INIT_TIME: &str = "init_time";
/// Column holding the forecast valid time, localized by the warehouse to the
/// configured display time zone.
pub const COL_TIME_CT: &str = "time_CT";
/// Raw 2 m air temperature in Kelvin, as published by the model.
pub const COL_TEMPERATURE_K: &str = "temperature_K";
/// Derived 2 m air temperature in Fahrenheit.
pub const COL_TEMPERATURE_F: &str = "temperature_F";
/// Raw eastward (u) wind component at 10 m, in meters per second.
pub const COL_WIND_U: &str = "wind_u_m_s";
/// Raw northward (v) wind component at 10 m, in meters per second.
pub const COL_WIND_V: &str = "wind_v_m_s";
/// Derived wind speed magnitude at 10 m, in meters per second.
pub const COL_WIND_SPEED: &str = "wind_speed_m_s";
/// Accumulated precipitation over the trailing six hours, in meters.
pub const COL_PRECIPITATION: &str = "precipitation_m";

/// Column order of the display projection, matching the dashboard table.
pub const DISPLAY_COLUMNS: [&str; 4] = [
    COL_TIME_CT,
    COL_TEMPERATURE_F,
    COL_WIND_SPEED,
    COL_PRECIPITATION,
];

/// One projected forecast record, as shown in the dashboard table and fed to
/// the chart.
///
/// Measurements are `Option` because the model occasionally publishes gaps;
/// a missing value renders as an empty table cell and a gap in the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Forecast valid time in the display time zone.
    pub time_ct: NaiveDateTime,
    pub temperature_f: Option<f64>,
    pub wind_speed_m_s: Option<f64>,
    pub precipitation_m: Option<f64>,
}
