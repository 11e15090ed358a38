//! Data sources for raw mention rows.
//!
//! The pipeline only needs `fetch(table) -> rows`; which warehouse (or local
//! export) answers that is chosen once at start-up and passed in explicitly.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::domain::RawRecord;
use crate::error::AppError;

pub mod bigquery;
pub mod csv_dir;

pub use bigquery::BigQueryClient;
pub use csv_dir::CsvDirSource;

/// Anything that can hand back every row of a named table.
pub trait DataSource {
    /// Short human-readable description (for logs and the TUI header).
    fn describe(&self) -> String;

    /// Fetch all rows of `table`. Any failure aborts the current render.
    fn fetch(&self, table: &str) -> Result<Vec<RawRecord>, AppError>;
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self, table: &str) -> Result<Vec<RawRecord>, AppError> {
        (**self).fetch(table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Google BigQuery over its REST API.
    Bigquery,
    /// A directory of `<table>.csv` exports.
    Csv,
}

/// Resolved source selection (CLI flags; credentials come from the environment).
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub project: Option<String>,
    pub dataset: Option<String>,
    pub csv_dir: Option<PathBuf>,
}

/// Construct the configured source.
pub fn open_source(settings: &SourceSettings) -> Result<Box<dyn DataSource>, AppError> {
    match settings.kind {
        SourceKind::Bigquery => {
            let client = BigQueryClient::from_env(settings.project.clone(), settings.dataset.clone())?;
            Ok(Box::new(client))
        }
        SourceKind::Csv => {
            let dir = settings
                .csv_dir
                .clone()
                .ok_or_else(|| AppError::config("`--source csv` requires `--csv-dir <DIR>`."))?;
            Ok(Box::new(CsvDirSource::new(dir)?))
        }
    }
}
