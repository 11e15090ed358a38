//! Input/output helpers.
//!
//! - view exports (CSV) (`export`)

pub mod export;

pub use export::*;
