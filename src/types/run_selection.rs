//! Selects which forecast model runs a warehouse query covers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Identifies the forecast model run(s) a query should return.
///
/// A model run is keyed by its `init_time`, the instant the forecast model
/// was initialized. Published runs start at day boundaries, so a calendar
/// date maps to the run initialized at midnight UTC of that date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use stormboard::RunSelection;
///
/// let run = RunSelection::run_on(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
/// assert!(!run.is_range());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSelection {
    /// Exactly one model run, keyed by its initialization instant.
    Run(DateTime<Utc>),
    /// Every model run initialized within the inclusive window.
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl RunSelection {
    /// The single run initialized at midnight UTC of `date`.
    pub fn run_on(date: NaiveDate) -> Self {
        RunSelection::Run(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Whether the selection can match more than one run.
    pub fn is_range(&self) -> bool {
        matches!(self, RunSelection::Range { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_on_maps_to_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap();
        assert_eq!(RunSelection::run_on(date), RunSelection::Run(expected));
    }

    #[test]
    fn range_selection_reports_as_range() {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 21, 0, 0, 0).unwrap();
        assert!(RunSelection::Range { start, end }.is_range());
        assert!(!RunSelection::Run(start).is_range());
    }
}
