//! Per-channel daily mention counts.
//!
//! `aggregate` turns a channel's raw rows into one `ChannelCount` per calendar
//! date inside the trailing window. Rows whose date cannot be read are not an
//! error: they are dropped and tallied in the `AggregateReport` so the caller
//! can log them. Days without mentions are simply absent here; gap filling
//! happens in `merge`.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::calendar::TrailingWindow;
use crate::domain::{ChannelCount, ChannelSeries, ChannelSpec, RawRecord};

pub mod dates;

pub use dates::{parse_calendar_date, parse_date_text};

/// Counts for one channel plus what was discarded on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    pub channel: String,
    /// Rows handed to the aggregator (after de-duplication).
    pub records: usize,
    /// Exact-duplicate rows removed before counting.
    pub duplicates: usize,
    /// Rows without the date column at all.
    pub missing_field: usize,
    /// Rows whose date cell could not be coerced.
    pub unparseable: usize,
    /// Rows with a valid date outside the window.
    pub out_of_window: usize,
    /// Ascending by date, one entry per observed date.
    pub counts: Vec<ChannelCount>,
}

impl AggregateReport {
    /// Rows that ended up in `counts`.
    pub fn kept(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn series(&self) -> ChannelSeries {
        ChannelSeries {
            name: self.channel.clone(),
            counts: self.counts.clone(),
        }
    }
}

/// Count mentions per calendar date of `date_field` within `window`.
pub fn aggregate(
    records: &[RawRecord],
    date_field: &str,
    channel_name: &str,
    window: &TrailingWindow,
) -> AggregateReport {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut missing_field = 0usize;
    let mut unparseable = 0usize;
    let mut out_of_window = 0usize;

    for record in records {
        let Some(value) = record.get(date_field) else {
            missing_field += 1;
            continue;
        };
        let Some(date) = parse_calendar_date(value) else {
            unparseable += 1;
            continue;
        };
        if !window.contains(date) {
            out_of_window += 1;
            continue;
        }
        *per_day.entry(date).or_insert(0) += 1;
    }

    AggregateReport {
        channel: channel_name.to_string(),
        records: records.len(),
        duplicates: 0,
        missing_field,
        unparseable,
        out_of_window,
        counts: per_day
            .into_iter()
            .map(|(date, count)| ChannelCount { date, count })
            .collect(),
    }
}

/// Apply a channel's spec (optional de-duplication, date field) and aggregate.
pub fn aggregate_channel(
    records: Vec<RawRecord>,
    spec: &ChannelSpec,
    window: &TrailingWindow,
) -> AggregateReport {
    let (records, duplicates) = if spec.dedupe {
        dedupe_records(records)
    } else {
        (records, 0)
    };

    let mut report = aggregate(&records, &spec.date_field, &spec.name, window);
    report.duplicates = duplicates;
    report
}

/// Remove exact-duplicate rows, keeping the first occurrence.
///
/// Returns the surviving rows (original order) and the number removed.
pub fn dedupe_records(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<RawRecord> = HashSet::with_capacity(before);
    let mut out = Vec::with_capacity(before);
    for record in records {
        if seen.contains(&record) {
            continue;
        }
        seen.insert(record.clone());
        out.push(record);
    }
    let removed = before - out.len();
    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text_rows(field: &str, values: &[&str]) -> Vec<RawRecord> {
        values
            .iter()
            .map(|v| RawRecord::new().with(field, FieldValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn counts_same_day_timestamps_together() {
        let rows = text_rows(
            "date",
            &["2024-01-01T10:00:00Z", "2024-01-01T23:00:00Z", "2024-01-02T00:00:00Z"],
        );
        let window = TrailingWindow::year_to(ymd(2024, 6, 1));
        let report = aggregate(&rows, "date", "Twitter", &window);

        assert_eq!(
            report.counts,
            vec![
                ChannelCount { date: ymd(2024, 1, 1), count: 2 },
                ChannelCount { date: ymd(2024, 1, 2), count: 1 },
            ]
        );
        assert_eq!(report.channel, "Twitter");
        assert_eq!(report.kept(), 3);
        assert_eq!(report.missing_field + report.unparseable + report.out_of_window, 0);
    }

    #[test]
    fn unparseable_and_missing_dates_are_dropped_not_fatal() {
        let mut rows = text_rows("Date", &["2024-05-01", "not a date", ""]);
        rows.push(RawRecord::new().with("Date", FieldValue::Null));
        rows.push(RawRecord::new().with("other", FieldValue::Text("2024-05-01".into())));

        let window = TrailingWindow::year_to(ymd(2024, 6, 1));
        let report = aggregate(&rows, "Date", "News", &window);

        assert_eq!(report.counts, vec![ChannelCount { date: ymd(2024, 5, 1), count: 1 }]);
        assert_eq!(report.unparseable, 3);
        assert_eq!(report.missing_field, 1);
        assert_eq!(report.records, 5);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = ymd(2024, 6, 1);
        let window = TrailingWindow::year_to(today);
        let rows = text_rows(
            "Date",
            &["2023-06-01", "2023-06-02", "2024-06-01", "2024-06-02"],
        );
        let report = aggregate(&rows, "Date", "Blog", &window);

        let dates: Vec<_> = report.counts.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![ymd(2023, 6, 2), today]);
        assert_eq!(report.out_of_window, 2);
    }

    #[test]
    fn output_dates_are_unique_and_inside_window() {
        let window = TrailingWindow::year_to(ymd(2024, 6, 1));
        let values: Vec<String> = (0..500)
            .map(|i| {
                let d = ymd(2023, 1, 1) + chrono::Days::new(i % 600);
                format!("{d}T{:02}:00:00Z", i % 24)
            })
            .collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let report = aggregate(&text_rows("d", &refs), "d", "X", &window);

        assert!(report.counts.iter().all(|c| window.contains(c.date)));
        assert!(report.counts.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(report.kept() as usize + report.out_of_window, 500);
    }

    #[test]
    fn dedupe_keeps_first_of_identical_rows() {
        let a = RawRecord::new()
            .with("Date", FieldValue::Text("2024-05-01".into()))
            .with("url", FieldValue::Text("https://a".into()));
        let b = RawRecord::new()
            .with("Date", FieldValue::Text("2024-05-01".into()))
            .with("url", FieldValue::Text("https://b".into()));
        let rows = vec![a.clone(), b.clone(), a.clone()];

        let (unique, removed) = dedupe_records(rows);
        assert_eq!(unique, vec![a, b]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn aggregate_channel_honours_dedupe_flag() {
        let window = TrailingWindow::year_to(ymd(2024, 6, 1));
        let rows = text_rows("Date", &["2024-05-01", "2024-05-01"]);

        let plain = aggregate_channel(rows.clone(), &ChannelSpec::new("News", "news", "Date", false), &window);
        assert_eq!(plain.kept(), 2);

        let deduped = aggregate_channel(rows, &ChannelSpec::new("Blog", "web", "Date", true), &window);
        assert_eq!(deduped.kept(), 1);
        assert_eq!(deduped.duplicates, 1);
    }
}
