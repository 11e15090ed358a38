//! Command-line parsing for the mentions dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{SourceKind, SourceSettings};
use crate::domain::{AxisMode, ChannelSpec, Granularity, TimeRange, ViewOptions};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mentions", version, about = "Daily mention counts across social, news and web channels")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DashArgs),
    /// Print the merged daily table and a per-channel ingest summary.
    Table(DashArgs),
    /// Render the selected view as an ASCII chart.
    Plot(PlotArgs),
    /// Write the selected view to CSV.
    Export(ExportArgs),
}

/// Options shared by every subcommand: where the rows come from and how to view them.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Where to read mention tables from.
    #[arg(long, value_enum, default_value_t = SourceKind::Bigquery)]
    pub source: SourceKind,

    /// BigQuery project (defaults to MENTIONS_BQ_PROJECT).
    #[arg(long)]
    pub project: Option<String>,

    /// BigQuery dataset (defaults to MENTIONS_BQ_DATASET).
    #[arg(long)]
    pub dataset: Option<String>,

    /// Directory of `<table>.csv` files for `--source csv`.
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Channel definition `NAME=TABLE:DATE_FIELD[:dedupe]` (repeatable).
    ///
    /// Defaults to Twitter=twitter_data:created_at, News=news_data:Date,
    /// Blog=web_data:Date:dedupe.
    #[arg(long = "channel", value_name = "SPEC")]
    pub channels: Vec<ChannelSpec>,

    /// Time range to show.
    #[arg(long, value_enum, default_value_t = TimeRange::Year)]
    pub range: TimeRange,

    /// Bucketing period.
    #[arg(long, value_enum, default_value_t = Granularity::Daily)]
    pub granularity: Granularity,

    /// Value-axis mode.
    #[arg(long, value_enum, default_value_t = AxisMode::Fixed)]
    pub axis: AxisMode,

    /// Log file used while the TUI owns the terminal.
    #[arg(long, value_name = "PATH", default_value = "mentions.log")]
    pub log_file: PathBuf,
}

impl DashArgs {
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            kind: self.source,
            project: self.project.clone(),
            dataset: self.dataset.clone(),
            csv_dir: self.csv_dir.clone(),
        }
    }

    /// Configured channels, or the default trio when none were given.
    ///
    /// Channel names key the merged table, so a repeated name is rejected.
    pub fn channel_specs(&self) -> Result<Vec<ChannelSpec>, AppError> {
        if self.channels.is_empty() {
            return Ok(ChannelSpec::defaults());
        }
        for (idx, spec) in self.channels.iter().enumerate() {
            if self.channels[..idx].iter().any(|prev| prev.name == spec.name) {
                return Err(AppError::config(format!(
                    "Channel `{}` is configured more than once.",
                    spec.name
                )));
            }
        }
        Ok(self.channels.clone())
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            range: self.range,
            granularity: self.granularity,
            axis: self.axis,
        }
    }
}

/// Options for the ASCII chart.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for CSV export.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Output CSV path.
    #[arg(long, short = 'o', value_name = "CSV")]
    pub out: PathBuf,
}
