//! Merge per-channel counts onto the daily spine.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::calendar::TrailingWindow;
use crate::domain::{ChannelSeries, CombinedRow, MentionTable};

/// Left-join every channel onto the window's daily spine.
///
/// The result has exactly one row per date of `window`, ascending, and one
/// count per channel (in input order) on every row. Dates a channel did not
/// report are 0; counts dated outside the window are ignored. Should a series
/// list the same date twice, the counts are added.
pub fn merge(channels: &[ChannelSeries], window: &TrailingWindow) -> MentionTable {
    let lookups: Vec<HashMap<NaiveDate, u64>> = channels
        .iter()
        .map(|series| {
            let mut by_date = HashMap::with_capacity(series.counts.len());
            for c in &series.counts {
                *by_date.entry(c.date).or_insert(0) += c.count;
            }
            by_date
        })
        .collect();

    let rows = window
        .dates()
        .map(|date| CombinedRow {
            date,
            counts: lookups
                .iter()
                .map(|by_date| by_date.get(&date).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    MentionTable {
        channels: channels.iter().map(|s| s.name.clone()).collect(),
        rows,
    }
}
