//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - fetches and aggregates the channel tables
//! - prints tables/plots or writes the CSV export

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, DashArgs, ExportArgs, PlotArgs};
use crate::error::AppError;
use crate::logging::{self, LogTarget};
use crate::view::{self, ChartView};

pub mod pipeline;

/// Entry point for the `mentions` binary.
pub fn run() -> Result<(), AppError> {
    // `mentions` and `mentions --range week` behave like `mentions tui ...`.
    //
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Table(args) => handle_table(args),
        Command::Plot(args) => handle_plot(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    logging::init(LogTarget::File(&args.log_file))?;
    crate::tui::run(&args)
}

fn handle_table(args: DashArgs) -> Result<(), AppError> {
    let (run, view) = build_view(&args)?;
    println!("{}", crate::report::format_run_summary(&run));
    println!("{}", crate::report::format_table(&view));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let (_, view) = build_view(&args.dash)?;
    if view.is_empty() {
        return Err(AppError::no_data("No rows in the selected range."));
    }
    println!("{}", crate::plot::render_ascii_plot(&view, args.width, args.height));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let (_, view) = build_view(&args.dash)?;
    crate::io::write_view_csv(&args.out, &view)?;
    log::info!("wrote {} rows to {}", view.table.rows.len(), args.out.display());
    Ok(())
}

/// Shared path for the one-shot commands: fetch, aggregate, merge, prepare.
fn build_view(args: &DashArgs) -> Result<(pipeline::RunOutput, ChartView), AppError> {
    logging::init(LogTarget::Stderr)?;

    let source = crate::data::open_source(&args.source_settings())?;
    let now = Local::now().naive_local();
    let run = pipeline::run(source.as_ref(), &args.channel_specs()?, now)?;
    if run.total_mentions() == 0 {
        log::warn!("no mentions in {} .. {}", run.window.start, run.window.end);
    }

    let view = view::prepare(&run.table, args.view_options(), now);
    Ok((run, view))
}

/// Rewrite argv so `mentions` defaults to `mentions tui`.
///
/// Rules:
/// - `mentions`                     -> `mentions tui`
/// - `mentions --range week ...`    -> `mentions tui --range week ...`
/// - `mentions --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "table" | "plot" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_binary_opens_tui() {
        assert_eq!(rewrite_args(args(&["mentions"])), args(&["mentions", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["mentions", "--range", "week"])),
            args(&["mentions", "tui", "--range", "week"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["mentions", "table", "--axis", "dynamic"]),
            args(&["mentions", "--help"]),
            args(&["mentions", "-V"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }
}
