//! Builds the parameterized SQL statement sent to the forecast warehouse.
//!
//! Query construction is pure string assembly with no I/O, so the exact
//! statement a given configuration produces can be asserted in tests without
//! touching the network. Execution lives behind
//! [`crate::warehouse::QueryRunner`].

use crate::types::forecast_row::{
    COL_INIT_TIME, COL_PRECIPITATION, COL_TEMPERATURE_K, COL_TIME_CT, COL_WIND_U, COL_WIND_V,
};
use crate::types::polygon::Polygon;
use crate::types::run_selection::RunSelection;
use chrono::{DateTime, Utc};

/// Source column holding the 2 m air temperature, in Kelvin.
const SRC_TEMPERATURE: &str = "2m_temperature";
/// Source column holding the eastward wind component at 10 m.
const SRC_WIND_U: &str = "10m_u_component_of_wind";
/// Source column holding the northward wind component at 10 m.
const SRC_WIND_V: &str = "10m_v_component_of_wind";
/// Source column holding the trailing six-hour precipitation accumulation.
const SRC_PRECIPITATION: &str = "total_precipitation_6hr";

/// One forecast query against the warehouse table.
///
/// Each table row holds one model run: its `init_time`, a geography polygon
/// covering the forecast area, and a nested `forecast` array with the hourly
/// records. The query unnests that array (`t1.forecast AS t2`), keeps runs
/// whose polygon intersects the region of interest, and narrows to the
/// selected run(s).
pub struct ForecastQuery<'a> {
    table: &'a str,
    polygon: &'a Polygon,
    time_zone: &'a str,
    selection: RunSelection,
}

impl<'a> ForecastQuery<'a> {
    pub fn new(
        table: &'a str,
        polygon: &'a Polygon,
        time_zone: &'a str,
        selection: RunSelection,
    ) -> Self {
        Self {
            table,
            polygon,
            time_zone,
            selection,
        }
    }

    /// Renders the query as one standard-SQL statement.
    ///
    /// The projection aliases the raw model columns to the crate's column
    /// contract and localizes the valid time to the display time zone.
    /// Range selections additionally project `init_time` so downstream
    /// filtering can tell the returned runs apart; single-run selections
    /// omit it, since every returned row belongs to the same run.
    pub fn to_sql(&self) -> String {
        let mut select = Vec::with_capacity(6);
        if self.selection.is_range() {
            select.push(format!("t1.init_time AS `{COL_INIT_TIME}`"));
        }
        select.push(format!(
            "DATETIME(t2.time, '{}') AS `{COL_TIME_CT}`",
            self.time_zone
        ));
        select.push(format!("t2.`{SRC_TEMPERATURE}` AS `{COL_TEMPERATURE_K}`"));
        select.push(format!("t2.`{SRC_WIND_U}` AS `{COL_WIND_U}`"));
        select.push(format!("t2.`{SRC_WIND_V}` AS `{COL_WIND_V}`"));
        select.push(format!("t2.`{SRC_PRECIPITATION}` AS `{COL_PRECIPITATION}`"));

        let init_time_predicate = match self.selection {
            RunSelection::Run(init_time) => {
                format!("t1.init_time = {}", timestamp_literal(init_time))
            }
            RunSelection::Range { start, end } => format!(
                "t1.init_time BETWEEN {} AND {}",
                timestamp_literal(start),
                timestamp_literal(end)
            ),
        };

        format!(
            "SELECT\n  {select}\n\
             FROM `{table}` AS t1, t1.forecast AS t2\n\
             WHERE ST_INTERSECTS(t1.geography_polygon, ST_GEOGFROMTEXT('{wkt}'))\n  \
             AND {init_time_predicate}\n\
             ORDER BY t2.time",
            select = select.join(",\n  "),
            table = self.table,
            wkt = self.polygon.wkt(),
        )
    }
}

/// Formats an instant as a `TIMESTAMP('YYYY-MM-DD HH:MM:SS UTC')` literal.
fn timestamp_literal(instant: DateTime<Utc>) -> String {
    format!("TIMESTAMP('{} UTC')", instant.format("%Y-%m-%d %H:%M:%S"))
}
