//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw warehouse rows (`RawRecord`, `FieldValue`)
//! - per-channel inputs and outputs (`ChannelSpec`, `ChannelCount`, `ChannelSeries`)
//! - the merged daily table (`MentionTable`, `CombinedRow`)
//! - presentation options (`TimeRange`, `Granularity`, `AxisMode`, `ViewOptions`)

pub mod types;

pub use types::*;
