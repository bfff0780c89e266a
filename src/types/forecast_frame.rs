//! Contains the `ForecastLazyFrame` structure for lazy operations on fetched
//! forecast data.

use crate::filtering::ForecastFrameFilterExt;
use crate::types::forecast_row::{
    ForecastRow, COL_PRECIPITATION, COL_TEMPERATURE_F, COL_TIME_CT, COL_WIND_SPEED,
};
use crate::units::{temperature_f_expr, wind_speed_expr};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// A wrapper around a Polars `LazyFrame` holding forecast rows for one
/// region.
///
/// This struct provides the operations the dashboard pipeline needs between
/// fetch and render: narrowing to a single model run, projecting to the
/// display columns, and collecting typed rows, while retaining lazy
/// evaluation in between.
///
/// Instances are typically obtained via [`crate::Stormboard::fetch`].
///
/// # Note on timestamps
///
/// The `time_CT` column is localized to the display time zone by the
/// warehouse and arrives timezone-naive; `init_time` (present only on
/// range fetches) is naive UTC. Filters therefore compare against
/// `NaiveDateTime` values.
#[derive(Clone)]
pub struct ForecastLazyFrame {
    /// The underlying Polars LazyFrame containing the forecast data.
    pub frame: LazyFrame,
}

impl ForecastLazyFrame {
    /// Wraps a frame that already carries the derived display columns.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Wraps a raw warehouse reply, lazily appending the derived columns
    /// `temperature_F` and `wind_speed_m_s`.
    ///
    /// The raw frame must carry `temperature_K`, `wind_u_m_s` and
    /// `wind_v_m_s`; the derivations surface as a `PolarsError` on collect
    /// if one is missing.
    pub fn from_raw(frame: LazyFrame) -> Self {
        Self::new(frame.with_columns([temperature_f_expr(), wind_speed_expr()]))
    }

    /// Applies an arbitrary Polars predicate expression.
    ///
    /// Returns a *new* `ForecastLazyFrame` with the filter applied lazily;
    /// the original remains unchanged.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use stormboard::ForecastLazyFrame;
    /// use polars::prelude::{col, lit};
    ///
    /// # fn demo(forecast: ForecastLazyFrame) -> Result<(), polars::prelude::PolarsError> {
    /// // Keep only hours with gale-force wind
    /// let windy = forecast.filter(col("wind_speed_m_s").gt_eq(lit(17.2f64)));
    /// let df = windy.frame.collect()?;
    /// println!("{df}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> ForecastLazyFrame {
        ForecastLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Narrows the frame to the model run initialized at `init_time`.
    ///
    /// When the frame carries no `init_time` column — single-run fetches
    /// already hold exactly one run — the frame is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the frame's schema cannot be resolved.
    pub fn for_init_time(&self, init_time: NaiveDateTime) -> PolarsResult<ForecastLazyFrame> {
        Ok(ForecastLazyFrame::new(
            self.frame.clone().filter_init_time(init_time)?,
        ))
    }

    /// Narrows the frame to the model run initialized at midnight UTC of
    /// `date`, matching how the dashboard's date picker addresses runs.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the frame's schema cannot be resolved.
    pub fn for_run_date(&self, date: NaiveDate) -> PolarsResult<ForecastLazyFrame> {
        Ok(ForecastLazyFrame::new(
            self.frame.clone().filter_run_date(date)?,
        ))
    }

    /// Projects down to the four display columns, in dashboard table order.
    pub fn display_only(&self) -> ForecastLazyFrame {
        ForecastLazyFrame::new(self.frame.clone().project_display())
    }

    /// Executes the lazy plan and returns the materialized frame.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if any lazy operation fails to execute.
    pub fn collect(&self) -> PolarsResult<DataFrame> {
        self.frame.clone().collect()
    }

    /// Executes the display projection and converts it into typed rows for
    /// rendering.
    ///
    /// Rows whose valid time is null are skipped; they cannot be placed on
    /// the chart's time axis. An empty frame yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the plan fails or a display column is
    /// missing or mistyped.
    pub fn collect_rows(&self) -> PolarsResult<Vec<ForecastRow>> {
        let df = self.display_only().collect()?;

        let time_col = df.column(COL_TIME_CT)?.datetime()?;
        let time_unit = time_col.time_unit();
        let temperature = df.column(COL_TEMPERATURE_F)?;
        let wind_speed = df.column(COL_WIND_SPEED)?;
        let precipitation = df.column(COL_PRECIPITATION)?;

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let time_ct = match time_col
                .get(idx)
                .and_then(|ts| timestamp_to_naive(ts, time_unit))
            {
                Some(ts) => ts,
                None => continue,
            };
            rows.push(ForecastRow {
                time_ct,
                temperature_f: get_opt_float(temperature, idx),
                wind_speed_m_s: get_opt_float(wind_speed, idx),
                precipitation_m: get_opt_float(precipitation, idx),
            });
        }
        Ok(rows)
    }
}

fn get_opt_float(column: &Column, idx: usize) -> Option<f64> {
    column.f64().ok().and_then(|ca| ca.get(idx))
}

fn timestamp_to_naive(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
    .map(|dt| dt.naive_utc())
}
