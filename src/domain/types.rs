//! Shared domain types.
//!
//! Raw rows are deliberately loose (a bag of named cells); everything derived
//! from them is strongly typed and keyed by `NaiveDate`.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;

/// A single cell of a warehouse row.
///
/// Sources type cells as precisely as they can (e.g. BigQuery `TIMESTAMP`
/// columns arrive as `Timestamp`); anything else stays `Text` and is coerced
/// during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

/// An opaque row from a named source.
///
/// Cells are kept in a `BTreeMap` so two rows with the same content compare
/// and hash equal regardless of column order (used for de-duplication).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Where a channel's mentions live and how to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Display name ("Twitter", "News", ...). Also the column name in exports.
    pub name: String,
    /// Warehouse table (or CSV file stem) holding one row per mention.
    pub table: String,
    /// Column carrying the mention date.
    pub date_field: String,
    /// Drop exact-duplicate rows before counting.
    pub dedupe: bool,
}

impl ChannelSpec {
    pub fn new(name: &str, table: &str, date_field: &str, dedupe: bool) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            date_field: date_field.to_string(),
            dedupe,
        }
    }

    /// The social/news/web channel set the dashboard ships with.
    pub fn defaults() -> Vec<ChannelSpec> {
        vec![
            ChannelSpec::new("Twitter", "twitter_data", "created_at", false),
            ChannelSpec::new("News", "news_data", "Date", false),
            ChannelSpec::new("Blog", "web_data", "Date", true),
        ]
    }
}

impl FromStr for ChannelSpec {
    type Err = String;

    /// Parse `NAME=TABLE:DATE_FIELD[:dedupe]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid channel '{s}'. Expected NAME=TABLE:DATE_FIELD[:dedupe]."))?;
        let mut parts = rest.split(':');
        let table = parts.next().unwrap_or("").trim();
        let date_field = parts.next().unwrap_or("").trim();
        let dedupe = match parts.next().map(str::trim) {
            None => false,
            Some(flag) if flag.eq_ignore_ascii_case("dedupe") => true,
            Some(other) => return Err(format!("Unknown channel flag '{other}' in '{s}'.")),
        };
        if parts.next().is_some() {
            return Err(format!("Too many ':' segments in channel '{s}'."));
        }

        let name = name.trim();
        if name.is_empty() || table.is_empty() || date_field.is_empty() {
            return Err(format!(
                "Invalid channel '{s}'. NAME, TABLE and DATE_FIELD must all be non-empty."
            ));
        }

        Ok(ChannelSpec::new(name, table, date_field, dedupe))
    }
}

/// Mentions observed on one calendar date for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// The aggregated counts of a single channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSeries {
    pub name: String,
    pub counts: Vec<ChannelCount>,
}

/// One calendar day of the merged table.
///
/// `counts[i]` belongs to `MentionTable::channels[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub counts: Vec<u64>,
}

impl CombinedRow {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Rows in ascending date order plus the channel names labelling each column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionTable {
    pub channels: Vec<String>,
    pub rows: Vec<CombinedRow>,
}

impl MentionTable {
    pub fn channel_index(&self, channel: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == channel)
    }

    /// Count for `channel` on `date`, `None` if either is not in the table.
    pub fn count(&self, date: NaiveDate, channel: &str) -> Option<u64> {
        let idx = self.channel_index(channel)?;
        let pos = self.rows.binary_search_by_key(&date, |r| r.date).ok()?;
        self.rows[pos].counts.get(idx).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Sum of every count in one channel column.
    pub fn channel_total(&self, idx: usize) -> u64 {
        self.rows.iter().filter_map(|r| r.counts.get(idx)).sum()
    }
}

/// How far back the view reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Year, TimeRange::Month, TimeRange::Week];

    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeRange::Week => "Week",
            TimeRange::Month => "Month",
            TimeRange::Year => "Year",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

/// Bucketing period applied before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    Daily,
    /// Calendar weeks starting Monday, labelled by that Monday.
    Weekly,
    /// Calendar months, labelled by the last day of the month.
    Monthly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Daily, Granularity::Weekly, Granularity::Monthly];

    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

/// Value-axis behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisMode {
    /// `[0, max + headroom]`, zoom and pan disabled.
    Fixed,
    /// Autoscale from zero over the visible window, zoom and pan enabled.
    Dynamic,
}

impl AxisMode {
    pub fn display_name(self) -> &'static str {
        match self {
            AxisMode::Fixed => "Fixed",
            AxisMode::Dynamic => "Dynamic",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AxisMode::Fixed => AxisMode::Dynamic,
            AxisMode::Dynamic => AxisMode::Fixed,
        }
    }

    pub fn allows_zoom(self) -> bool {
        matches!(self, AxisMode::Dynamic)
    }
}

/// User-selected presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub range: TimeRange,
    pub granularity: Granularity,
    pub axis: AxisMode,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            range: TimeRange::Year,
            granularity: Granularity::Daily,
            axis: AxisMode::Fixed,
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], cur: T, step: isize) -> T {
    let n = all.len() as isize;
    let idx = all.iter().position(|v| *v == cur).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(n) as usize]
}
