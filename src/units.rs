//! Unit conversions applied to the raw model columns.
//!
//! The warehouse publishes temperature in Kelvin and wind as u/v components;
//! the dashboard shows Fahrenheit and the wind speed magnitude. The scalar
//! functions are the reference formulas, the `Expr` builders apply the same
//! math lazily across a whole column.

use crate::types::forecast_row::{
    COL_TEMPERATURE_F, COL_TEMPERATURE_K, COL_WIND_SPEED, COL_WIND_U, COL_WIND_V,
};
use polars::prelude::{col, lit, Expr};

/// Converts a temperature from Kelvin to Fahrenheit.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - 273.15) * 9.0 / 5.0 + 32.0
}

/// Computes the wind speed magnitude from its u/v components.
///
/// The result carries the unit of the components and is never negative.
pub fn wind_speed_from_components(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt()
}

/// Lazy expression deriving [`COL_TEMPERATURE_F`] from the raw Kelvin column.
pub fn temperature_f_expr() -> Expr {
    ((col(COL_TEMPERATURE_K) - lit(273.15)) * lit(9.0) / lit(5.0) + lit(32.0))
        .alias(COL_TEMPERATURE_F)
}

/// Lazy expression deriving [`COL_WIND_SPEED`] from the raw component columns.
pub fn wind_speed_expr() -> Expr {
    (col(COL_WIND_U) * col(COL_WIND_U) + col(COL_WIND_V) * col(COL_WIND_V))
        .sqrt()
        .alias(COL_WIND_SPEED)
}
