//! `mentions-dashboard` library crate.
//!
//! The binary (`mentions`) is a thin wrapper around this library so that:
//!
//! - aggregation and merge logic is testable without spawning processes
//! - the warehouse client can be swapped for an in-memory source in tests
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod calendar;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;
