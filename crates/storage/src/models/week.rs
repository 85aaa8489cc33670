use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// One ranking publication, identified by ISO year and calendar week.
///
/// Ordering is by year, then week; at most one snapshot per pair exists in
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankingWeek {
    pub year: i32,
    pub week: u32,
}

impl RankingWeek {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Display label like "KW 2 2026".
    pub fn label(&self) -> String {
        format!("KW {} {}", self.week, self.year)
    }

    /// Monday of this ISO week, used as the anchor for relative-duration
    /// math. `None` for a week number the year does not have.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// The ranking week containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Parse a week argument in the formats the original CLI accepted:
    /// "2026-KW02", "2026_KW02", "KW2", or a bare week number. Bare forms
    /// take the year from `default_year` so callers stay deterministic.
    pub fn parse(text: &str, default_year: i32) -> Result<Self> {
        let cleaned = text.trim().to_uppercase();

        let invalid =
            || StorageError::InvalidArgument(format!("cannot parse ranking week from '{text}'"));

        let (year, week_part) = match cleaned.split_once(['-', '_']) {
            Some((year_str, rest)) => {
                let year = year_str.parse::<i32>().map_err(|_| invalid())?;
                (year, rest)
            }
            None => (default_year, cleaned.as_str()),
        };

        let digits = week_part.strip_prefix("KW").unwrap_or(week_part).trim();
        let week = digits.parse::<u32>().map_err(|_| invalid())?;
        if week == 0 || week > 53 {
            return Err(invalid());
        }

        Ok(Self { year, week })
    }
}

impl fmt::Display for RankingWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_year_then_week() {
        let a = RankingWeek::new(2025, 42);
        let b = RankingWeek::new(2026, 2);
        assert!(a < b);
        assert!(RankingWeek::new(2026, 1) < RankingWeek::new(2026, 2));
    }

    #[test]
    fn parses_full_form() {
        assert_eq!(
            RankingWeek::parse("2026-KW02", 2020).unwrap(),
            RankingWeek::new(2026, 2)
        );
        assert_eq!(
            RankingWeek::parse("2026_KW02", 2020).unwrap(),
            RankingWeek::new(2026, 2)
        );
    }

    #[test]
    fn parses_short_forms_with_default_year() {
        assert_eq!(
            RankingWeek::parse("kw2", 2026).unwrap(),
            RankingWeek::new(2026, 2)
        );
        assert_eq!(
            RankingWeek::parse("7", 2026).unwrap(),
            RankingWeek::new(2026, 7)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(RankingWeek::parse("lastweek", 2026).is_err());
        assert!(RankingWeek::parse("2026-KW99", 2026).is_err());
        assert!(RankingWeek::parse("", 2026).is_err());
    }

    #[test]
    fn monday_of_iso_week() {
        let monday = RankingWeek::new(2026, 2).monday().unwrap();
        assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(RankingWeek::from_date(monday), RankingWeek::new(2026, 2));
    }
}
