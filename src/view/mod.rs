//! Presentation prep: range filter, bucketing and value-axis bounds.
//!
//! Everything here is a pure function of the merged table plus the selected
//! `ViewOptions`, so the TUI, the ASCII plot and the exporters all see the
//! same numbers.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{AxisMode, CombinedRow, Granularity, MentionTable, TimeRange, ViewOptions};

/// Headroom added above the largest value in fixed-axis mode.
pub const FIXED_AXIS_HEADROOM: f64 = 5.0;
/// Relative headroom in dynamic mode.
const DYNAMIC_AXIS_PAD: f64 = 0.05;

/// A table ready to draw, with its value-axis bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub options: ViewOptions,
    pub table: MentionTable,
    pub y_bounds: [f64; 2],
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Zoom/pan is only offered with a dynamic axis.
    pub fn zoomable(&self) -> bool {
        self.options.axis.allows_zoom()
    }
}

/// Apply range, granularity and axis options.
pub fn prepare(table: &MentionTable, options: ViewOptions, now: NaiveDateTime) -> ChartView {
    let filtered = filter_range(table, options.range, now);
    let bucketed = bucket(&filtered, options.granularity);
    let y_bounds = value_bounds(&bucketed.rows, options.axis);
    ChartView {
        options,
        table: bucketed,
        y_bounds,
    }
}

/// Keep rows whose date, taken at midnight, is at or after `now - range`.
///
/// Unless `now` is exactly midnight this keeps `range.days()` rows ending today.
pub fn filter_range(table: &MentionTable, range: TimeRange, now: NaiveDateTime) -> MentionTable {
    let cutoff = now - chrono::Duration::days(range.days());
    MentionTable {
        channels: table.channels.clone(),
        rows: table
            .rows
            .iter()
            .filter(|r| r.date.and_time(NaiveTime::MIN) >= cutoff)
            .cloned()
            .collect(),
    }
}

/// Label of the period `date` falls into.
pub fn period_label(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => {
            let back = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(back)).unwrap_or(date)
        }
        Granularity::Monthly => month_end(date),
    }
}

fn month_end(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Sum rows into periods. Input must be ascending; output is ascending with
/// one row per period that contains at least one input row.
pub fn bucket(table: &MentionTable, granularity: Granularity) -> MentionTable {
    if granularity == Granularity::Daily {
        return table.clone();
    }

    let mut rows: Vec<CombinedRow> = Vec::new();
    for row in &table.rows {
        let label = period_label(row.date, granularity);
        if let Some(last) = rows.last_mut().filter(|last| last.date == label) {
            for (acc, v) in last.counts.iter_mut().zip(&row.counts) {
                *acc += v;
            }
            continue;
        }
        rows.push(CombinedRow {
            date: label,
            counts: row.counts.clone(),
        });
    }

    MentionTable {
        channels: table.channels.clone(),
        rows,
    }
}

/// Value-axis bounds for `rows`.
///
/// Fixed: `[0, max + FIXED_AXIS_HEADROOM]`. Dynamic: `[0, max]` padded a
/// little, never collapsing to an empty span.
pub fn value_bounds(rows: &[CombinedRow], axis: AxisMode) -> [f64; 2] {
    let max = rows.iter().map(CombinedRow::max).max().unwrap_or(0) as f64;
    match axis {
        AxisMode::Fixed => [0.0, max + FIXED_AXIS_HEADROOM],
        AxisMode::Dynamic => {
            let top = (max * (1.0 + DYNAMIC_AXIS_PAD)).ceil().max(1.0);
            [0.0, top]
        }
    }
}

/// Same as `value_bounds` but restricted to visible channels.
pub fn value_bounds_visible(rows: &[CombinedRow], axis: AxisMode, visible: &[bool]) -> [f64; 2] {
    let masked: Vec<CombinedRow> = rows
        .iter()
        .map(|r| CombinedRow {
            date: r.date,
            counts: r
                .counts
                .iter()
                .enumerate()
                .map(|(i, &v)| if visible.get(i).copied().unwrap_or(true) { v } else { 0 })
                .collect(),
        })
        .collect();
    value_bounds(&masked, axis)
}
