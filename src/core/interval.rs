//! Half-open date ranges and calendar-month windows.
//!
//! Every range here is `[start, end)`: it includes `start`, excludes `end`,
//! and lasts `end - start` days. Dates are plain calendar dates with no time
//! zone attached.

use crate::domain::model::{Booking, BookingStatus};
use crate::utils::error::{Result, UsageError};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Days shared by `[start, end)` and `[window_start, window_end)`.
///
/// Returns 0 when the ranges are disjoint or when either range is empty or
/// inverted.
pub fn overlap_days(
    start: NaiveDate,
    end: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> i64 {
    let clamped_start = start.max(window_start);
    let clamped_end = end.min(window_end);
    (clamped_end - clamped_start).num_days().max(0)
}

/// One calendar month as `[first day, first day of next month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let label = format!("{:04}-{:02}", year, month);
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            UsageError::InvalidMonth {
                value: label.clone(),
                reason: "month must be between 1 and 12".to_string(),
            }
        })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
            UsageError::InvalidMonth {
                value: label,
                reason: "year is out of range".to_string(),
            }
        })?;

        Ok(Self { start, end })
    }

    /// The month `date` falls in.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), date.month())
    }

    /// The most recent month that has fully ended before `today`.
    pub fn previous_completed(today: NaiveDate) -> Result<Self> {
        Self::containing(today)?.previous()
    }

    pub fn previous(&self) -> Result<Self> {
        let (year, month) = if self.start.month() == 1 {
            (self.start.year() - 1, 12)
        } else {
            (self.start.year(), self.start.month() - 1)
        };
        Self::new(year, month)
    }

    /// Parses a `YYYY-MM` label.
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = |reason: &str| UsageError::InvalidMonth {
            value: label.to_string(),
            reason: reason.to_string(),
        };

        let (year, month) = label
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-MM"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid("expected YYYY-MM"));
        }
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;

        Self::new(year, month).map_err(|_| invalid("month must be between 1 and 12"))
    }

    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

impl fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.label(), self.start, self.end)
    }
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// True when the stay and the window share at least one night.
    pub fn intersects(&self, window: &MonthWindow) -> bool {
        self.start_date < window.end && self.end_date > window.start
    }

    pub fn overlap_days(&self, window: &MonthWindow) -> i64 {
        overlap_days(self.start_date, self.end_date, window.start, window.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(start: &str, end: &str) -> Booking {
        Booking {
            id: 1,
            house_id: 1,
            created_by: "user-1".to_string(),
            guest_count: 2,
            start_date: date(start),
            end_date: date(end),
            status: BookingStatus::Active,
            note: None,
        }
    }

    #[test]
    fn test_overlap_clamps_to_window_end() {
        let january = MonthWindow::new(2026, 1).unwrap();
        // nights of Jan 30 and Jan 31
        assert_eq!(booking("2026-01-30", "2026-02-02").overlap_days(&january), 2);
    }

    #[test]
    fn test_overlap_clamps_to_window_start() {
        let january = MonthWindow::new(2026, 1).unwrap();
        assert_eq!(booking("2025-12-28", "2026-01-03").overlap_days(&january), 2);
    }

    #[test]
    fn test_contained_booking_counts_every_night() {
        let january = MonthWindow::new(2026, 1).unwrap();
        let stay = booking("2026-01-10", "2026-01-15");
        assert_eq!(stay.overlap_days(&january), stay.nights());
        assert_eq!(stay.overlap_days(&january), 5);
    }

    #[test]
    fn test_disjoint_booking_counts_zero() {
        let january = MonthWindow::new(2026, 1).unwrap();
        assert_eq!(booking("2026-02-01", "2026-02-05").overlap_days(&january), 0);
        assert_eq!(booking("2025-12-20", "2026-01-01").overlap_days(&january), 0);
        assert!(!booking("2026-02-01", "2026-02-05").intersects(&january));
        assert!(!booking("2025-12-20", "2026-01-01").intersects(&january));
    }

    #[test]
    fn test_inverted_booking_counts_zero() {
        let january = MonthWindow::new(2026, 1).unwrap();
        assert_eq!(booking("2026-01-15", "2026-01-10").overlap_days(&january), 0);
        assert_eq!(booking("2026-01-15", "2026-01-15").overlap_days(&january), 0);
    }

    #[test]
    fn test_overlap_is_never_negative_or_longer_than_either_range() {
        let window_start = date("2026-03-01");
        let window_end = date("2026-04-01");
        let base = date("2026-02-15");

        for offset in 0..60 {
            for length in 0..10 {
                let start = base + chrono::Duration::days(offset);
                let end = start + chrono::Duration::days(length);
                let days = overlap_days(start, end, window_start, window_end);
                assert!(days >= 0);
                assert!(days <= length);
                assert!(days <= 31);
            }
        }
    }

    #[test]
    fn test_month_window_lengths() {
        assert_eq!(MonthWindow::new(2026, 1).unwrap().total_days(), 31);
        assert_eq!(MonthWindow::new(2026, 2).unwrap().total_days(), 28);
        assert_eq!(MonthWindow::new(2028, 2).unwrap().total_days(), 29);
        assert_eq!(MonthWindow::new(2026, 4).unwrap().total_days(), 30);

        let december = MonthWindow::new(2025, 12).unwrap();
        assert_eq!(december.end, date("2026-01-01"));
        assert_eq!(december.total_days(), 31);
    }

    #[test]
    fn test_previous_completed_month() {
        let window = MonthWindow::previous_completed(date("2026-01-15")).unwrap();
        assert_eq!(window.start, date("2025-12-01"));
        assert_eq!(window.end, date("2026-01-01"));

        let window = MonthWindow::previous_completed(date("2026-03-01")).unwrap();
        assert_eq!(window.label(), "2026-02");
    }

    #[test]
    fn test_parse_month_label() {
        let window = MonthWindow::parse("2026-02").unwrap();
        assert_eq!(window.start, date("2026-02-01"));
        assert_eq!(window.total_days(), 28);
        assert_eq!(window.label(), "2026-02");

        assert!(MonthWindow::parse("2026-13").is_err());
        assert!(MonthWindow::parse("2026-00").is_err());
        assert!(MonthWindow::parse("2026-1").is_err());
        assert!(MonthWindow::parse("january").is_err());
        assert!(MonthWindow::parse("").is_err());
    }
}
