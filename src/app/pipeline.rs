//! Shared "fetch -> aggregate -> merge" logic used by both CLI and TUI front-ends.
//!
//! The two halves are split so the TUI can keep fetched rows in memory and
//! rebuild the table (e.g. after midnight) without re-querying the warehouse.

use chrono::{NaiveDate, NaiveDateTime};

use crate::aggregate::{AggregateReport, aggregate_channel};
use crate::calendar::TrailingWindow;
use crate::data::DataSource;
use crate::domain::{ChannelSpec, MentionTable, RawRecord};
use crate::error::AppError;
use crate::merge::merge;

/// Raw rows for every configured channel, in channel order.
#[derive(Debug, Clone)]
pub struct FetchedChannels {
    pub channels: Vec<(ChannelSpec, Vec<RawRecord>)>,
    pub fetched_at: NaiveDateTime,
}

/// All computed outputs of a single dashboard build.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub window: TrailingWindow,
    pub reports: Vec<AggregateReport>,
    pub table: MentionTable,
    pub source: String,
    pub fetched_at: NaiveDateTime,
}

impl RunOutput {
    pub fn total_mentions(&self) -> u64 {
        self.reports.iter().map(AggregateReport::kept).sum()
    }
}

/// Fetch every channel's table. The first failure aborts the whole fetch.
pub fn fetch_channels(
    source: &dyn DataSource,
    channels: &[ChannelSpec],
    now: NaiveDateTime,
) -> Result<FetchedChannels, AppError> {
    let mut out = Vec::with_capacity(channels.len());
    for spec in channels {
        let rows = source.fetch(&spec.table)?;
        log::info!(
            "{}: fetched {} rows from {} ({})",
            spec.name,
            rows.len(),
            spec.table,
            source.describe()
        );
        out.push((spec.clone(), rows));
    }
    Ok(FetchedChannels {
        channels: out,
        fetched_at: now,
    })
}

/// Aggregate and merge already-fetched rows for the window ending `today`.
pub fn build_table(
    fetched: &FetchedChannels,
    today: NaiveDate,
    source: String,
) -> Result<RunOutput, AppError> {
    let window = TrailingWindow::year_to(today);

    let mut reports = Vec::with_capacity(fetched.channels.len());
    for (spec, rows) in &fetched.channels {
        let report = aggregate_channel(rows.clone(), spec, &window);

        if report.records > 0 && report.missing_field == report.records {
            return Err(AppError::config(format!(
                "Column `{}` not found in table `{}` (channel {}).",
                spec.date_field, spec.table, spec.name
            )));
        }

        log::info!(
            "{}: kept {} mentions on {} days (duplicates={}, unparseable={}, missing={}, outside window={})",
            report.channel,
            report.kept(),
            report.counts.len(),
            report.duplicates,
            report.unparseable,
            report.missing_field,
            report.out_of_window,
        );
        if report.unparseable > 0 {
            log::warn!(
                "{}: {} rows had an unreadable `{}` value and were skipped",
                report.channel,
                report.unparseable,
                spec.date_field
            );
        }
        reports.push(report);
    }

    let series: Vec<_> = reports.iter().map(AggregateReport::series).collect();
    let table = merge(&series, &window);
    log::debug!(
        "merged {} channels onto {} days ({} .. {})",
        table.channels.len(),
        table.rows.len(),
        window.start,
        window.end
    );

    Ok(RunOutput {
        window,
        reports,
        table,
        source,
        fetched_at: fetched.fetched_at,
    })
}

/// Execute the full pipeline against `source` as of `now`.
pub fn run(
    source: &dyn DataSource,
    channels: &[ChannelSpec],
    now: NaiveDateTime,
) -> Result<RunOutput, AppError> {
    let fetched = fetch_channels(source, channels, now)?;
    build_table(&fetched, now.date(), source.describe())
}
