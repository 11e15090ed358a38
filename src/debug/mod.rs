//! Ingest report writer for inspecting what each channel contributed.
//!
//! Written on demand from the TUI (`d`) into `./debug/`, it lists per-channel
//! row accounting and the busiest days, so dropped or suspicious rows can be
//! chased back to the warehouse.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

const TOP_DAYS: usize = 10;

pub fn write_ingest_report(run: &RunOutput, dir: &Path) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::io(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("mentions_ingest_{}_{ts}.md", run.window.end.format("%Y%m%d")));

    let mut file =
        File::create(&path).map_err(|e| AppError::io(format!("Failed to create debug file: {e}")))?;
    write_report(&mut file, run).map_err(|e| AppError::io(format!("Failed to write debug report: {e}")))?;

    Ok(path)
}

fn write_report<W: Write>(out: &mut W, run: &RunOutput) -> std::io::Result<()> {
    writeln!(out, "# mentions ingest report")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- source: {}", run.source)?;
    writeln!(out, "- fetched_at: {}", run.fetched_at)?;
    writeln!(out, "- window: {} .. {} ({} days)", run.window.start, run.window.end, run.window.len())?;

    writeln!(out, "\n## Channels")?;
    writeln!(out, "| channel | rows | duplicates | unparseable | missing field | outside window | kept | active days |")?;
    writeln!(out, "| - | - | - | - | - | - | - | - |")?;
    for r in &run.reports {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            r.channel,
            r.records + r.duplicates,
            r.duplicates,
            r.unparseable,
            r.missing_field,
            r.out_of_window,
            r.kept(),
            r.counts.len()
        )?;
    }

    for (idx, channel) in run.table.channels.iter().enumerate() {
        writeln!(out, "\n## {channel}: busiest days")?;
        let mut days: Vec<_> = run
            .table
            .rows
            .iter()
            .filter_map(|row| row.counts.get(idx).map(|&c| (row.date, c)))
            .filter(|&(_, c)| c > 0)
            .collect();
        if days.is_empty() {
            writeln!(out, "_no mentions in window_")?;
            continue;
        }
        days.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        writeln!(out, "| date | mentions |")?;
        writeln!(out, "| - | - |")?;
        for (date, count) in days.into_iter().take(TOP_DAYS) {
            writeln!(out, "| {date} | {count} |")?;
        }
    }

    Ok(())
}
