//! Terminal reporting: ingest summaries and the daily/bucketed table.

pub mod format;

pub use format::{format_run_summary, format_table};
