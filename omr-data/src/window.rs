use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use log::info;
use omr_core::error::{OmrError, Result};
use omr_core::observation::Observation;
use omr_utils::dates::QUARTER_HOUR_MINUTES;

/// Which slice of the forecast window a summary covers.
///
/// `FirstFive`/`FirstFourteen` run from the window start to start + 5/14
/// days, matching the legacy `'five'`/`'fourteen'` summary ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Full,
    FirstFive,
    FirstFourteen,
}

impl SummaryPeriod {
    pub const ALL: [SummaryPeriod; 3] = [
        SummaryPeriod::Full,
        SummaryPeriod::FirstFive,
        SummaryPeriod::FirstFourteen,
    ];

    /// File-name fragment used for the corresponding report table.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryPeriod::Full => "full",
            SummaryPeriod::FirstFive => "five",
            SummaryPeriod::FirstFourteen => "fourteen",
        }
    }
}

/// The inclusive forecast date range on the 15-minute grid.
///
/// Simulation output covers the full run including the DSM2 warm-up period;
/// every derived table is restricted to this window first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ForecastWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(OmrError::Validation(format!(
                "Forecast start {start} is after forecast end {end}"
            )));
        }
        Ok(ForecastWindow { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Shrink the window to one summary period, anchored at the start.
    pub fn period(&self, period: SummaryPeriod) -> ForecastWindow {
        let end = match period {
            SummaryPeriod::Full => self.end,
            SummaryPeriod::FirstFive => self.start + TimeDelta::try_days(5).unwrap(),
            SummaryPeriod::FirstFourteen => self.start + TimeDelta::try_days(14).unwrap(),
        };
        ForecastWindow {
            start: self.start,
            end,
        }
    }

    /// Whether a timestamp lies on the window's 15-minute grid.
    ///
    /// Both bounds are midnight-inclusive, so the end date contributes only
    /// its 00:00 point, exactly like the legacy `pd.date_range` membership
    /// test.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        let first = self.start.and_hms_opt(0, 0, 0).unwrap();
        let last = self.end.and_hms_opt(0, 0, 0).unwrap();
        t >= first
            && t <= last
            && t.second() == 0
            && t.nanosecond() == 0
            && (t.minute() as i64) % QUARTER_HOUR_MINUTES == 0
    }

    /// Restrict an observation set to the window.
    ///
    /// Strictly a subset: grid points missing from the source stay missing.
    pub fn filter(&self, observations: &[Observation]) -> Vec<Observation> {
        let kept: Vec<Observation> = observations
            .iter()
            .filter(|obs| self.contains(obs.datetime))
            .cloned()
            .collect();
        info!(
            "Forecast window {}..{} reduced {} observations to {}",
            self.start,
            self.end,
            observations.len(),
            kept.len()
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use omr_core::channel::Channel;
    use omr_core::observation::{Observation, Variable};

    fn obs(datetime: NaiveDateTime) -> Observation {
        Observation {
            run_id: "r".to_string(),
            variable: Variable::Flow,
            scenario: "Baseline".to_string(),
            channel: Channel(12),
            datetime,
            value: 1.0,
        }
    }

    fn window() -> ForecastWindow {
        ForecastWindow::new(
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 16).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2021, 3, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        assert!(ForecastWindow::new(start, end).is_err());
    }

    #[test]
    fn test_contains_grid_points_only() {
        let w = window();
        let d = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        assert!(w.contains(d.and_hms_opt(0, 0, 0).unwrap()));
        assert!(w.contains(d.and_hms_opt(6, 45, 0).unwrap()));
        // off-grid minute and second
        assert!(!w.contains(d.and_hms_opt(6, 44, 0).unwrap()));
        assert!(!w.contains(d.and_hms_opt(6, 45, 30).unwrap()));
    }

    #[test]
    fn test_end_date_is_midnight_inclusive() {
        let w = window();
        let end = NaiveDate::from_ymd_opt(2021, 3, 16).unwrap();
        assert!(w.contains(end.and_hms_opt(0, 0, 0).unwrap()));
        assert!(!w.contains(end.and_hms_opt(0, 15, 0).unwrap()));
    }

    #[test]
    fn test_filter_is_subset_with_gaps_preserved() {
        let w = window();
        let d = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        let before = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let input = vec![
            obs(before.and_hms_opt(0, 0, 0).unwrap()),
            obs(d.and_hms_opt(0, 0, 0).unwrap()),
            // deliberate gap at 00:15; 00:30 present
            obs(d.and_hms_opt(0, 30, 0).unwrap()),
        ];
        let kept = w.filter(&input);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|o| w.contains(o.datetime)));
    }

    #[test]
    fn test_period_anchoring() {
        let w = ForecastWindow::new(
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            NaiveDate::from_ymd_opt(2021, 4, 30).unwrap(),
        )
        .unwrap();
        let five = w.period(SummaryPeriod::FirstFive);
        assert_eq!(five.start(), w.start());
        assert_eq!(five.end(), NaiveDate::from_ymd_opt(2021, 3, 20).unwrap());
        let fourteen = w.period(SummaryPeriod::FirstFourteen);
        assert_eq!(fourteen.end(), NaiveDate::from_ymd_opt(2021, 3, 29).unwrap());
        assert_eq!(w.period(SummaryPeriod::Full), w);
    }
}
