//! Read mention tables from local CSV exports (`<dir>/<table>.csv`).
//!
//! Every cell is kept as text; empty cells become `Null`. Date coercion is the
//! aggregator's job, exactly as for warehouse rows.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::data::DataSource;
use crate::domain::{FieldValue, RawRecord};
use crate::error::AppError;

pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: PathBuf) -> Result<Self, AppError> {
        if !dir.is_dir() {
            return Err(AppError::config(format!(
                "CSV directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

impl DataSource for CsvDirSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }

    fn fetch(&self, table: &str) -> Result<Vec<RawRecord>, AppError> {
        read_table(&self.table_path(table))
    }
}

fn read_table(path: &Path) -> Result<Vec<RawRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::config(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::config(format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .iter()
        // Spreadsheet exports sometimes prefix the first header with a BOM.
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::config(format!(
                "CSV parse error in '{}' at line {}: {e}",
                path.display(),
                idx + 2
            ))
        })?;

        let mut row = RawRecord::new();
        for (name, cell) in headers.iter().zip(record.iter()) {
            let value = if cell.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(cell.to_string())
            };
            row.insert(name.clone(), value);
        }
        out.push(row);
    }

    Ok(out)
}
