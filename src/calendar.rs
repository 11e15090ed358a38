//! Trailing calendar window and the daily spine used for merging.

use chrono::{Days, NaiveDate};

/// Length of the aggregation window in days (the window itself holds one more
/// date than this, both ends are inclusive).
pub const WINDOW_DAYS: u64 = 365;

/// Inclusive date range `[end - days, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TrailingWindow {
    /// Window reaching `days` back from `today`.
    pub fn ending(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// The standard 365-day window ending `today`.
    pub fn year_to(today: NaiveDate) -> Self {
        Self::ending(today, WINDOW_DAYS)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar dates in the window.
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Every date of the window in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
