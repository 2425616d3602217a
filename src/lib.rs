//! CBBC Matrix Engine Library
//!
//! Aggregation core for Callable Bull/Bear Contract dashboards: decodes
//! upstream grouped records, builds dense two-sided [range][date] matrices,
//! and derives the orderings and summaries the presentation layer renders.
//! Fetching, rendering, and storage belong to the host application.

pub mod calendar;
pub mod decode;
pub mod format;
pub mod matrix;
pub mod models;

// Re-export the pipeline surface at the crate root
pub use decode::{decode_groups, DecodeError, DecodeStats};
pub use matrix::{
    build_matrices, build_single_date_matrices, collect_issuers, derive_window, summarize_sides,
    DisplayWindow, MatrixResult, SideSummary, SingleDateMatrices,
};
pub use models::{AggregatedCell, CbbcEntry, Direction, RecordGroup};
