use crate::types::forecast_row::{COL_INIT_TIME, DISPLAY_COLUMNS};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{col, lit, LazyFrame, PolarsResult};

pub trait ForecastFrameFilterExt {
    /// Filters a forecast LazyFrame down to the model run initialized at
    /// `init_time` (exact match on the 'init_time' column).
    ///
    /// Frames fetched for a single run carry no 'init_time' column; in that
    /// case the frame already holds exactly one run and is returned
    /// unchanged, so the call is safe in both fetch modes.
    ///
    /// # Errors
    /// Fails only if the frame's schema cannot be resolved.
    fn filter_init_time(self, init_time: NaiveDateTime) -> PolarsResult<LazyFrame>;

    /// Filters a forecast LazyFrame down to the model run initialized at
    /// midnight UTC of `date`.
    ///
    /// # Errors
    /// Fails only if the frame's schema cannot be resolved.
    fn filter_run_date(self, date: NaiveDate) -> PolarsResult<LazyFrame>;

    /// Projects down to the display columns, in dashboard table order.
    /// Columns outside the projection ('init_time', raw model columns) are
    /// dropped.
    fn project_display(self) -> LazyFrame;
}

impl ForecastFrameFilterExt for LazyFrame {
    fn filter_init_time(mut self, init_time: NaiveDateTime) -> PolarsResult<LazyFrame> {
        let schema = self.collect_schema()?;
        if schema.get(COL_INIT_TIME).is_none() {
            return Ok(self);
        }
        Ok(self.filter(col(COL_INIT_TIME).eq(lit(init_time))))
    }

    fn filter_run_date(self, date: NaiveDate) -> PolarsResult<LazyFrame> {
        self.filter_init_time(date.and_time(NaiveTime::MIN))
    }

    fn project_display(self) -> LazyFrame {
        self.select(DISPLAY_COLUMNS.map(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::forecast_row::{
        COL_PRECIPITATION, COL_TEMPERATURE_F, COL_TIME_CT, COL_WIND_SPEED,
    };
    use polars::df;
    use polars::prelude::IntoLazy;

    fn run_init(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn valid_time(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn two_run_frame() -> LazyFrame {
        df!(
            COL_INIT_TIME => &[run_init(5), run_init(5), run_init(6)],
            COL_TIME_CT => &[valid_time(5, 6), valid_time(5, 12), valid_time(6, 6)],
            COL_TEMPERATURE_F => &[80.6_f64, 82.1, 79.3],
            COL_WIND_SPEED => &[5.0_f64, 6.2, 4.1],
            COL_PRECIPITATION => &[0.01_f64, 0.0, 0.002],
        )
        .unwrap()
        .lazy()
    }

    fn single_run_frame() -> LazyFrame {
        df!(
            COL_TIME_CT => &[valid_time(5, 6), valid_time(5, 12)],
            COL_TEMPERATURE_F => &[80.6_f64, 82.1],
            COL_WIND_SPEED => &[5.0_f64, 6.2],
            COL_PRECIPITATION => &[0.01_f64, 0.0],
        )
        .unwrap()
        .lazy()
    }

    #[test]
    fn filter_run_date_narrows_to_one_run() -> PolarsResult<()> {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        let df = two_run_frame().filter_run_date(date)?.collect()?;

        assert_eq!(df.height(), 2, "expected the two rows of the July 5 run");
        let temps = df.column(COL_TEMPERATURE_F)?.f64()?;
        assert_eq!(temps.get(0), Some(80.6));
        assert_eq!(temps.get(1), Some(82.1));
        Ok(())
    }

    #[test]
    fn filter_run_date_without_init_time_is_a_no_op() -> PolarsResult<()> {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        let before = single_run_frame().collect()?;
        let after = single_run_frame().filter_run_date(date)?.collect()?;

        assert_eq!(before.shape(), after.shape());
        assert!(before.equals(&after), "frame should pass through unchanged");
        Ok(())
    }

    #[test]
    fn filtering_twice_equals_filtering_once() -> PolarsResult<()> {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        let once = two_run_frame().filter_run_date(date)?.collect()?;
        let twice = two_run_frame()
            .filter_run_date(date)?
            .filter_run_date(date)?
            .collect()?;

        assert!(once.equals(&twice));
        Ok(())
    }

    #[test]
    fn filter_run_date_with_absent_run_yields_empty_frame() -> PolarsResult<()> {
        let date = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        let df = two_run_frame().filter_run_date(date)?.collect()?;

        assert_eq!(df.height(), 0);
        // Schema survives so downstream rendering still sees the columns.
        assert!(df.column(COL_WIND_SPEED).is_ok());
        Ok(())
    }

    #[test]
    fn project_display_keeps_table_columns_in_order() -> PolarsResult<()> {
        let df = two_run_frame().project_display().collect()?;

        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, DISPLAY_COLUMNS);
        Ok(())
    }
}
