//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::MentionTable;
use crate::view::ChartView;

/// Format the run summary: source, window and per-channel ingest counts.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== mentions - daily mention counts ===\n");
    out.push_str(&format!("Source: {}\n", run.source));
    out.push_str(&format!(
        "Window: {} .. {} ({} days)\n",
        run.window.start,
        run.window.end,
        run.window.len()
    ));
    out.push_str(&format!("Fetched at: {}\n", run.fetched_at.format("%Y-%m-%d %H:%M:%S")));

    out.push('\n');
    out.push_str(
        format!(
            "{:<12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            "channel", "rows", "dupes", "bad", "missing", "outside", "kept"
        )
        .trim_end(),
    );
    out.push('\n');
    for r in &run.reports {
        out.push_str(
            format!(
                "{:<12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
                truncate(&r.channel, 12),
                r.records + r.duplicates,
                r.duplicates,
                r.unparseable,
                r.missing_field,
                r.out_of_window,
                r.kept()
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a view as a date-by-channel table with a totals footer.
pub fn format_table(view: &ChartView) -> String {
    let table = &view.table;
    let mut out = String::new();

    out.push_str(&format!(
        "Range: {} | Granularity: {} | Axis: {} [{:.0}, {:.0}]\n",
        view.options.range.display_name(),
        view.options.granularity.display_name(),
        view.options.axis.display_name(),
        view.y_bounds[0],
        view.y_bounds[1],
    ));

    out.push_str(&header_line(table));
    out.push('\n');
    out.push_str(&rule_line(table));
    out.push('\n');

    for row in &table.rows {
        let mut line = format!("{:<10}", row.date.format("%Y-%m-%d"));
        for v in &row.counts {
            line.push_str(&format!(" {v:>10}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&rule_line(table));
    out.push('\n');
    let mut totals = format!("{:<10}", "total");
    for idx in 0..table.channels.len() {
        totals.push_str(&format!(" {:>10}", table.channel_total(idx)));
    }
    out.push_str(totals.trim_end());
    out.push('\n');

    out
}

fn header_line(table: &MentionTable) -> String {
    let mut line = format!("{:<10}", "date");
    for name in &table.channels {
        line.push_str(&format!(" {:>10}", truncate(name, 10)));
    }
    line.trim_end().to_string()
}

fn rule_line(table: &MentionTable) -> String {
    let mut line = format!("{:-<10}", "");
    for _ in &table.channels {
        line.push_str(&format!(" {:-<10}", ""));
    }
    line
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{CombinedRow, ViewOptions};

    #[test]
    fn table_golden_snapshot_small() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let view = ChartView {
            options: ViewOptions::default(),
            table: MentionTable {
                channels: vec!["Twitter".into(), "News".into()],
                rows: vec![
                    CombinedRow { date: d(1), counts: vec![2, 0] },
                    CombinedRow { date: d(2), counts: vec![0, 11] },
                ],
            },
            y_bounds: [0.0, 16.0],
        };

        let expected = concat!(
            "Range: Year | Granularity: Daily | Axis: Fixed [0, 16]\n",
            "date          Twitter       News\n",
            "---------- ---------- ----------\n",
            "2024-01-01          2          0\n",
            "2024-01-02          0         11\n",
            "---------- ---------- ----------\n",
            "total               2         11\n",
        );
        assert_eq!(format_table(&view), expected);
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Twitter", 10), "Twitter");
        assert_eq!(truncate("VeryLongChannelName", 10), "VeryLongC.");
    }
}
