//! Plain-text charts.

pub mod ascii;

pub use ascii::render_ascii_plot;
