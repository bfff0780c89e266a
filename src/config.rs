use std::env;
use std::fs;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::types::{LonLat, Polygon, RunSelection};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(String, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(String, #[source] toml::de::Error),

    #[error("Config field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Region polygon must be a closed ring of at least four [lon, lat] vertices")]
    OpenPolygon,

    #[error("window.{0} is required when window.mode is 'run-range'")]
    MissingRange(&'static str),

    #[error("window.range_end lies before window.range_start")]
    WindowReversed,

    #[error("Credential environment variable '{0}' is not set")]
    MissingCredential(String, #[source] env::VarError),

    #[error("Credential environment variable '{0}' is empty")]
    EmptyCredential(String),
}

/// Connection settings for the forecast warehouse.
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    /// Base URL of the warehouse REST API.
    pub endpoint: String,
    /// Billing project the query jobs run under.
    pub project_id: String,
    /// Fully qualified forecast table, e.g. `project.dataset.table`.
    pub table: String,
    /// Name of the environment variable holding the bearer token.
    ///
    /// Only the variable name lives in the config file; the token itself is
    /// read from the environment at startup.
    pub credential_env: String,
    pub timeout_secs: u64,
}

impl WarehouseConfig {
    /// Reads the bearer token from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Fails when the variable is unset or holds an empty value, so a missing
    /// credential is caught at construction rather than on the first query.
    pub fn credential(&self) -> Result<String, ConfigError> {
        let token = env::var(&self.credential_env)
            .map_err(|e| ConfigError::MissingCredential(self.credential_env.clone(), e))?;
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyCredential(self.credential_env.clone()));
        }
        Ok(token)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The geographic region forecasts are pulled for.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// Display name, used in logs.
    pub name: String,
    /// IANA time zone the warehouse localizes forecast times to.
    pub time_zone: String,
    /// Polygon ring as `[lon, lat]` pairs; the last vertex must repeat the
    /// first.
    pub vertices: Vec<[f64; 2]>,
}

impl RegionConfig {
    /// Builds the query polygon from the configured ring.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OpenPolygon`] if the ring has fewer than four
    /// vertices or does not close on itself.
    pub fn polygon(&self) -> Result<Polygon, ConfigError> {
        let ring = self
            .vertices
            .iter()
            .map(|&[lon, lat]| LonLat(lon, lat))
            .collect();
        let polygon = Polygon::new(ring);
        if !polygon.is_closed() {
            return Err(ConfigError::OpenPolygon);
        }
        Ok(polygon)
    }
}

/// How the model-run window is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    /// One model run; the date picked on the page chooses which.
    SingleRun,
    /// Every run between `range_start` and `range_end`, inclusive.
    RunRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub mode: WindowMode,
    /// Run date preselected in the page's date picker.
    pub default_date: NaiveDate,
    /// Inclusive range bounds, required in `run-range` mode.
    pub range_start: Option<DateTime<Utc>>,
    pub range_end: Option<DateTime<Utc>>,
}

impl WindowConfig {
    /// Resolves the window into a concrete run selection.
    ///
    /// In single-run mode `picked` overrides the default date. Range mode
    /// ignores `picked` and uses the configured bounds.
    pub fn selection_for(&self, picked: Option<NaiveDate>) -> Result<RunSelection, ConfigError> {
        match self.mode {
            WindowMode::SingleRun => Ok(RunSelection::run_on(picked.unwrap_or(self.default_date))),
            WindowMode::RunRange => {
                let start = self
                    .range_start
                    .ok_or(ConfigError::MissingRange("range_start"))?;
                let end = self
                    .range_end
                    .ok_or(ConfigError::MissingRange("range_end"))?;
                if end < start {
                    return Err(ConfigError::WindowReversed);
                }
                Ok(RunSelection::Range { start, end })
            }
        }
    }
}

/// Titles, labels and styling for the forecast chart.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub wind_label: String,
    pub temperature_label: String,
    pub precipitation_label: String,
    pub wind_color: String,
    pub temperature_color: String,
    pub precipitation_color: String,
    /// strftime pattern applied to the time-axis tick labels.
    pub tick_format: String,
    /// Days between two consecutive date ticks.
    pub tick_interval_days: u32,
    /// Rendered chart height in pixels.
    pub height: usize,
}

/// Static copy shown on the dashboard page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub heading: String,
    pub author: String,
    /// Bullet points shown under the heading.
    pub intro: Vec<String>,
    pub subheading: String,
    pub date_label: String,
    pub table_caption: String,
}

/// Image assets embedded in or served next to the page.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    /// Animated storm-track loop, inlined into the page as a data URL.
    pub animation_path: String,
    /// Page the animation links out to.
    pub animation_link: String,
    /// Static overview image, served under `/assets`.
    pub overview_image_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub warehouse: WarehouseConfig,
    pub region: RegionConfig,
    pub window: WindowConfig,
    pub chart: ChartConfig,
    pub page: PageConfig,
    pub assets: AssetConfig,
    pub server: ServerConfig,
}

impl DashboardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("warehouse.endpoint", &self.warehouse.endpoint),
            ("warehouse.project_id", &self.warehouse.project_id),
            ("warehouse.table", &self.warehouse.table),
            ("warehouse.credential_env", &self.warehouse.credential_env),
            ("region.time_zone", &self.region.time_zone),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        self.region.polygon()?;
        self.window.selection_for(None)?;
        Ok(())
    }
}

/// Loads and validates the dashboard configuration.
///
/// # Arguments
///
/// * `config_path` - path to the TOML configuration file
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or if validation rejects the
/// parsed values (open polygon ring, missing or reversed range bounds, empty
/// required fields).
pub fn load_config(config_path: &str) -> Result<DashboardConfig, ConfigError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| ConfigError::Read(config_path.to_string(), e))?;
    let config: DashboardConfig =
        toml::from_str(&toml).map_err(|e| ConfigError::Parse(config_path.to_string(), e))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FULL_TOML: &str = r##"
[warehouse]
endpoint = "https://bigquery.googleapis.com/bigquery/v2"
project_id = "acme-weather"
table = "acme-weather.weathernext.59572747_4_0"
credential_env = "STORMBOARD_WAREHOUSE_TOKEN"
timeout_secs = 30

[region]
name = "Houston"
time_zone = "America/Chicago"
vertices = [
    [-95.2481, 29.8767],
    [-95.2810, 30.2825],
    [-95.4601, 29.7765],
    [-95.2481, 29.8767],
]

[window]
mode = "single-run"
default_date = "2024-07-07"

[chart]
title = "Temperature, Wind Speed, Precipitation in Houston"
x_label = "Time"
wind_label = "Wind Speed (m/s)"
temperature_label = "Temp (F)"
precipitation_label = "Precipitation (m)"
wind_color = "#1f77b4"
temperature_color = "#d62728"
precipitation_color = "#9467bd"
tick_format = "%Y-%m-%d %H:%M"
tick_interval_days = 2
height = 600

[page]
heading = "Storm Preparation and Opportunity"
author = "Stormboard"
intro = ["What is the estimated impact of an approaching storm?"]
subheading = "Beryl 2024 Houston - WeatherNext Forecast"
date_label = "Enter date:"
table_caption = "Temperature, Wind, Precipitation in Houston:"

[assets]
animation_path = "assets/beryl.gif"
animation_link = "https://www.nhc.noaa.gov/archive/2024/BERYL.shtml"
overview_image_path = "assets/houston_beryl.png"

[server]
host = "0.0.0.0"
port = 8080
"##;

    fn parsed() -> DashboardConfig {
        toml::from_str(FULL_TOML).unwrap()
    }

    #[test]
    fn full_config_parses_and_validates() {
        let config = parsed();
        config.validate().unwrap();

        assert_eq!(config.warehouse.project_id, "acme-weather");
        assert_eq!(config.warehouse.timeout(), Duration::from_secs(30));
        assert_eq!(config.region.time_zone, "America/Chicago");
        assert_eq!(config.window.mode, WindowMode::SingleRun);
        assert_eq!(config.chart.tick_interval_days, 2);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn load_config_reads_and_validates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stormboard.toml");
        fs::write(&path, FULL_TOML).unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.page.subheading, "Beryl 2024 Houston - WeatherNext Forecast");
    }

    #[test]
    fn load_config_reports_missing_file() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Read(_, _))));
    }

    #[test]
    fn single_run_prefers_picked_date_over_default() {
        let config = parsed();
        let picked = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();

        let selection = config.window.selection_for(Some(picked)).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap();
        assert_eq!(selection, RunSelection::Run(expected));
    }

    #[test]
    fn single_run_falls_back_to_default_date() {
        let config = parsed();

        let selection = config.window.selection_for(None).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 7, 7, 0, 0, 0).unwrap();
        assert_eq!(selection, RunSelection::Run(expected));
    }

    #[test]
    fn run_range_mode_uses_configured_bounds() {
        let mut config = parsed();
        config.window.mode = WindowMode::RunRange;
        config.window.range_start = Some(Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap());
        config.window.range_end = Some(Utc.with_ymd_and_hms(2024, 7, 8, 0, 0, 0).unwrap());

        let picked = NaiveDate::from_ymd_opt(2024, 7, 6).unwrap();
        let selection = config.window.selection_for(Some(picked)).unwrap();
        assert!(selection.is_range());
    }

    #[test]
    fn run_range_mode_requires_both_bounds() {
        let mut config = parsed();
        config.window.mode = WindowMode::RunRange;
        config.window.range_start = Some(Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap());

        let result = config.window.selection_for(None);
        assert!(matches!(result, Err(ConfigError::MissingRange("range_end"))));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let mut config = parsed();
        config.window.mode = WindowMode::RunRange;
        config.window.range_start = Some(Utc.with_ymd_and_hms(2024, 7, 8, 0, 0, 0).unwrap());
        config.window.range_end = Some(Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap());

        let result = config.window.selection_for(None);
        assert!(matches!(result, Err(ConfigError::WindowReversed)));
    }

    #[test]
    fn open_polygon_ring_is_rejected() {
        let mut config = parsed();
        config.region.vertices.pop();

        assert!(matches!(config.region.polygon(), Err(ConfigError::OpenPolygon)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_required_field_fails_validation() {
        let mut config = parsed();
        config.warehouse.table = "  ".to_string();

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::EmptyField("warehouse.table"))));
    }

    // Each credential test uses its own variable name; test threads share the
    // process environment.

    #[test]
    fn credential_comes_from_the_named_env_var() {
        let mut config = parsed();
        config.warehouse.credential_env = "STORMBOARD_TEST_TOKEN_SET".to_string();
        env::set_var("STORMBOARD_TEST_TOKEN_SET", "opaque-token");

        assert_eq!(config.warehouse.credential().unwrap(), "opaque-token");
    }

    #[test]
    fn unset_credential_var_is_rejected() {
        let mut config = parsed();
        config.warehouse.credential_env = "STORMBOARD_TEST_TOKEN_UNSET".to_string();

        let result = config.warehouse.credential();
        assert!(matches!(result, Err(ConfigError::MissingCredential(_, _))));
    }

    #[test]
    fn empty_credential_var_is_rejected() {
        let mut config = parsed();
        config.warehouse.credential_env = "STORMBOARD_TEST_TOKEN_EMPTY".to_string();
        env::set_var("STORMBOARD_TEST_TOKEN_EMPTY", "");

        let result = config.warehouse.credential();
        assert!(matches!(result, Err(ConfigError::EmptyCredential(_))));
    }
}
