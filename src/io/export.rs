//! Export a prepared view to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one `date` column followed by one integer column per channel.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::view::ChartView;

/// Write the view rows to a CSV file.
pub fn write_view_csv(path: &Path, view: &ChartView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_view(file, view)
}

/// Write the view rows as CSV to any writer.
pub fn write_view<W: Write>(out: W, view: &ChartView) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = Vec::with_capacity(view.table.channels.len() + 1);
    header.push("Date");
    header.extend(view.table.channels.iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for row in &view.table.rows {
        let mut record = Vec::with_capacity(row.counts.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.extend(row.counts.iter().map(u64::to_string));
        writer
            .write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
