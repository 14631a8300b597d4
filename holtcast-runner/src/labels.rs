//! Calendar labels for history and forecast periods.
//!
//! The anchor is the last observed month. History period `i` of `n` is
//! `anchor - (n - 1 - i)` months; forecast offset `h` is `anchor + h` months.

use chrono::{Datelike, Months, NaiveDate};

/// Label format used in tables and exports, e.g. "March 2025".
pub const LABEL_FORMAT: &str = "%B %Y";

/// Month-granular calendar positions around an anchor month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCalendar {
    anchor: NaiveDate,
}

impl PeriodCalendar {
    /// Anchor on the month containing `date` (day is normalized to 1).
    pub fn new(date: NaiveDate) -> Self {
        let anchor = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
        Self { anchor }
    }

    /// Parse a `YYYY-MM` anchor.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")?;
        Ok(Self::new(date))
    }

    /// Anchor on the month before `today`: the last complete month.
    pub fn last_complete_month(today: NaiveDate) -> Self {
        let month_start = Self::new(today).anchor;
        Self::new(month_start - Months::new(1))
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// First day of the month `offset` months after the anchor.
    pub fn forecast_month(&self, offset: usize) -> NaiveDate {
        self.anchor + Months::new(offset as u32)
    }

    /// Labels for forecast offsets `1..=horizon`.
    pub fn forecast_labels(&self, horizon: usize) -> Vec<String> {
        (1..=horizon)
            .map(|h| self.forecast_month(h).format(LABEL_FORMAT).to_string())
            .collect()
    }

    /// Labels for `len` history periods ending at the anchor, oldest first.
    pub fn history_labels(&self, len: usize) -> Vec<String> {
        (0..len)
            .map(|i| {
                let back = (len - 1 - i) as u32;
                (self.anchor - Months::new(back))
                    .format(LABEL_FORMAT)
                    .to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn forecast_labels_roll_over_year() {
        let cal = PeriodCalendar::new(ymd(2024, 11, 17));
        assert_eq!(cal.anchor(), ymd(2024, 11, 1));
        assert_eq!(
            cal.forecast_labels(3),
            vec!["December 2024", "January 2025", "February 2025"]
        );
    }

    #[test]
    fn history_ends_at_anchor() {
        let cal = PeriodCalendar::parse("2024-12").unwrap();
        let labels = cal.history_labels(12);
        assert_eq!(labels.first().unwrap(), "January 2024");
        assert_eq!(labels.last().unwrap(), "December 2024");
    }

    #[test]
    fn last_complete_month() {
        let cal = PeriodCalendar::last_complete_month(ymd(2025, 1, 10));
        assert_eq!(cal.anchor(), ymd(2024, 12, 1));
    }

    #[test]
    fn bad_anchor_rejected() {
        assert!(PeriodCalendar::parse("2024-13").is_err());
        assert!(PeriodCalendar::parse("March").is_err());
    }
}
