//! Main entry point for the crate. [`Stormboard`] owns the dashboard
//! configuration, the query polygon derived from it, and the connection to the
//! forecast warehouse, and turns run selections into [`ForecastLazyFrame`]s.

use std::sync::Arc;

use bon::bon;
use chrono::NaiveDate;
use log::info;
use polars::prelude::IntoLazy;

use crate::config::DashboardConfig;
use crate::error::StormboardError;
use crate::query::ForecastQuery;
use crate::types::forecast_frame::ForecastLazyFrame;
use crate::types::polygon::Polygon;
use crate::types::run_selection::RunSelection;
use crate::warehouse::{BigQueryClient, QueryRunner};

/// Client for the forecast warehouse behind the dashboard.
///
/// Construction resolves the region polygon once and wires up a
/// [`QueryRunner`]; after that, [`Stormboard::forecast`] is the only call the
/// page needs. The runner is injectable so the query pipeline can be exercised
/// without a live warehouse.
///
/// # Examples
///
/// ```rust
/// use stormboard::{load_config, Stormboard, StormboardError};
///
/// # async fn run() -> Result<(), StormboardError> {
/// let config = load_config("stormboard.toml")?;
/// let board = Stormboard::new(config)?;
///
/// let forecast = board.forecast().call().await?;
/// let rows = forecast.collect_rows()?;
/// println!("{} forecast rows", rows.len());
/// # Ok(())
/// # }
/// ```
pub struct Stormboard {
    config: DashboardConfig,
    polygon: Polygon,
    runner: Arc<dyn QueryRunner>,
}

#[bon]
impl Stormboard {
    /// Creates a client backed by the live warehouse.
    ///
    /// The bearer token is read from the environment variable named by
    /// `warehouse.credential_env` in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`](crate::ConfigError::MissingCredential)
    /// if the token variable is unset, [`ConfigError::OpenPolygon`](crate::ConfigError::OpenPolygon)
    /// if the configured ring does not close, or a [`WarehouseError`](crate::WarehouseError)
    /// if the HTTP client cannot be built.
    pub fn new(config: DashboardConfig) -> Result<Self, StormboardError> {
        let credential = config.warehouse.credential()?;
        let client = BigQueryClient::new(
            &config.warehouse.endpoint,
            &config.warehouse.project_id,
            credential,
            config.warehouse.timeout(),
        )?;
        Self::with_runner(config, Arc::new(client))
    }

    /// Creates a client with an injected query runner instead of the live
    /// warehouse connection.
    pub fn with_runner(
        config: DashboardConfig,
        runner: Arc<dyn QueryRunner>,
    ) -> Result<Self, StormboardError> {
        let polygon = config.region.polygon()?;
        Ok(Self {
            config,
            polygon,
            runner,
        })
    }

    /// Fetches the forecast window for the configured region.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.date(NaiveDate)`: Optional. Pins the model run initialized at
    ///   midnight UTC of this date. Defaults to `window.default_date`. In
    ///   `run-range` mode the date is ignored and the configured bounds are
    ///   queried instead.
    ///
    /// # Errors
    ///
    /// Returns a [`WarehouseError`](crate::WarehouseError) if query execution
    /// fails; an empty forecast window is not an error.
    #[builder]
    pub async fn forecast(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<ForecastLazyFrame, StormboardError> {
        let selection = self.config.window.selection_for(date)?;
        self.fetch(selection).await
    }

    /// Runs the forecast query for an explicit run selection.
    pub async fn fetch(
        &self,
        selection: RunSelection,
    ) -> Result<ForecastLazyFrame, StormboardError> {
        let query = ForecastQuery::new(
            &self.config.warehouse.table,
            &self.polygon,
            &self.config.region.time_zone,
            selection,
        );
        info!(
            "Fetching forecast for region '{}' ({:?})",
            self.config.region.name, selection
        );
        let frame = self.runner.run_query(&query.to_sql()).await?;
        Ok(ForecastLazyFrame::from_raw(frame.lazy()))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}
