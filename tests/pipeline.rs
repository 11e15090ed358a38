use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

use mentions_dashboard::app::pipeline;
use mentions_dashboard::data::{CsvDirSource, DataSource};
use mentions_dashboard::domain::{
    AxisMode, ChannelSpec, FieldValue, Granularity, RawRecord, TimeRange, ViewOptions,
};
use mentions_dashboard::error::{AppError, EXIT_CONFIG, EXIT_IO};
use mentions_dashboard::view;

/// Tables held in memory, keyed by table name.
struct MemorySource {
    tables: HashMap<String, Vec<RawRecord>>,
}

impl DataSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn fetch(&self, table: &str) -> Result<Vec<RawRecord>, AppError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| AppError::io(format!("no such table: {table}")))
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap()
}

fn text(field: &str, value: &str) -> RawRecord {
    RawRecord::new().with(field, FieldValue::Text(value.to_string()))
}

fn source() -> MemorySource {
    let ts = |y, m, d, h| FieldValue::Timestamp(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap());
    let twitter = vec![
        RawRecord::new().with("created_at", ts(2024, 5, 30, 9)),
        RawRecord::new().with("created_at", ts(2024, 5, 30, 23)),
        RawRecord::new().with("created_at", ts(2024, 6, 1, 1)),
        // Older than a year: dropped.
        RawRecord::new().with("created_at", ts(2022, 1, 1, 1)),
    ];
    let news = vec![
        text("Date", "2024-05-31"),
        text("Date", "not a date"),
        text("Date", "2023-06-02"),
    ];
    let blog = vec![
        text("Date", "2024-05-31").with("url", FieldValue::Text("a".into())),
        text("Date", "2024-05-31").with("url", FieldValue::Text("a".into())),
        text("Date", "2024-05-31").with("url", FieldValue::Text("b".into())),
    ];

    MemorySource {
        tables: HashMap::from([
            ("twitter_data".to_string(), twitter),
            ("news_data".to_string(), news),
            ("web_data".to_string(), blog),
        ]),
    }
}

#[test]
fn default_channels_merge_onto_a_full_year() {
    let run = pipeline::run(&source(), &ChannelSpec::defaults(), now()).unwrap();
    let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();

    assert_eq!(run.table.channels, vec!["Twitter", "News", "Blog"]);
    assert_eq!(run.table.rows.len(), 366);
    assert_eq!(run.table.first_date(), NaiveDate::from_ymd_opt(2023, 6, 2));
    assert_eq!(run.table.last_date(), Some(d(6, 1)));
    assert!(run.table.rows.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));

    assert_eq!(run.table.count(d(5, 30), "Twitter"), Some(2));
    assert_eq!(run.table.count(d(6, 1), "Twitter"), Some(1));
    assert_eq!(run.table.count(d(5, 31), "News"), Some(1));
    assert_eq!(run.table.count(NaiveDate::from_ymd_opt(2023, 6, 2).unwrap(), "News"), Some(1));
    // Blog rows are deduplicated before counting.
    assert_eq!(run.table.count(d(5, 31), "Blog"), Some(2));
    // Zero-filled elsewhere.
    assert_eq!(run.table.count(d(1, 15), "Blog"), Some(0));

    assert_eq!(run.total_mentions(), 7);
    let news = &run.reports[1];
    assert_eq!(news.unparseable, 1);
    assert_eq!(run.reports[0].out_of_window, 1);
    assert_eq!(run.reports[2].duplicates, 1);
}

#[test]
fn week_view_with_fixed_axis() {
    let run = pipeline::run(&source(), &ChannelSpec::defaults(), now()).unwrap();
    let options = ViewOptions {
        range: TimeRange::Week,
        granularity: Granularity::Daily,
        axis: AxisMode::Fixed,
    };
    let view = view::prepare(&run.table, options, now());

    assert_eq!(view.table.rows.len(), 7);
    assert_eq!(view.table.first_date(), NaiveDate::from_ymd_opt(2024, 5, 26));
    assert_eq!(view.y_bounds, [0.0, 7.0]);
    assert!(!view.zoomable());
}

#[test]
fn monthly_buckets_cover_the_year() {
    let run = pipeline::run(&source(), &ChannelSpec::defaults(), now()).unwrap();
    let options = ViewOptions {
        range: TimeRange::Year,
        granularity: Granularity::Monthly,
        axis: AxisMode::Dynamic,
    };
    let view = view::prepare(&run.table, options, now());

    // June 2023 .. June 2024.
    assert_eq!(view.table.rows.len(), 13);
    let may = view
        .table
        .rows
        .iter()
        .find(|r| r.date == NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
        .unwrap();
    assert_eq!(may.counts, vec![2, 1, 2]);
    assert!(view.zoomable());
}

#[test]
fn missing_table_aborts_the_run() {
    let mut src = source();
    src.tables.remove("news_data");
    let err = pipeline::run(&src, &ChannelSpec::defaults(), now()).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_IO);
}

#[test]
fn missing_date_column_is_a_config_error() {
    let specs = vec![ChannelSpec::new("News", "news_data", "published", false)];
    let err = pipeline::run(&source(), &specs, now()).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_CONFIG);
    assert!(err.message().contains("published"));
}

#[test]
fn csv_directory_feeds_the_same_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("news_data.csv"),
        "Date,Title\n2024-05-31,a\n2024-05-31,b\n,c\n",
    )
    .unwrap();

    let src = CsvDirSource::new(dir.path().to_path_buf()).unwrap();
    let specs = vec![ChannelSpec::new("News", "news_data", "Date", false)];
    let run = pipeline::run(&src, &specs, now()).unwrap();

    assert_eq!(run.table.count(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), "News"), Some(2));
    // Empty cells are null, which counts as unreadable rather than missing.
    assert_eq!(run.reports[0].unparseable, 1);

    let view = view::prepare(&run.table, ViewOptions::default(), now());
    let mut buf = Vec::new();
    mentions_dashboard::io::write_view(&mut buf, &view).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert!(csv.starts_with("Date,News\n"));
    assert!(csv.contains("2024-05-31,2\n"));
}
