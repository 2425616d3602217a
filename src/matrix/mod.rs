//! Matrix Aggregation Engine
//!
//! Turns per-day, per-range CBBC record groups into two-sided Bull/Bear
//! matrices indexed by [range][date], plus the ordered range and date lists
//! a dashboard renders them with.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    build_matrices                        │
//! │  (dense pre-allocation, date window, direction folding)  │
//! └──────────────────────────────────────────────────────────┘
//!            │                │                  │
//!            ▼                ▼                  ▼
//!   ┌──────────────┐  ┌──────────────┐  ┌────────────────┐
//!   │ IssuerFilter │  │ Accumulator  │  │ RangeClassifier │
//!   │ (predicate)  │  │ (cell fold)  │  │ (Bear/Bull cut) │
//!   └──────────────┘  └──────────────┘  └────────────────┘
//!                             │
//!                             ▼
//!   ┌──────────────┐  ┌──────────────┐  ┌────────────────┐
//!   │ DateWindow   │  │ SideSummary  │  │ SingleDate      │
//!   │ (display)    │  │ (totals)     │  │ (variant build) │
//!   └──────────────┘  └──────────────┘  └────────────────┘
//! ```
//!
//! # Purity Guarantees
//!
//! - Every build is a pure function of its arguments; no caches, no globals
//! - Every build allocates fresh cells; a result handed to a caller is never
//!   touched by a later build
//! - Anomalous input degrades to fewer/zero results, never to a panic

pub mod builder;
pub mod classify;
pub mod filter;
// Single-date dashboards key buckets by exact call level instead of range
pub mod single_date;
pub mod summary;
pub mod window;


// Re-exports for convenience
pub use builder::{build_matrices, MatrixResult, SideMatrix};
pub use classify::{classify_ranges, parse_range_start, RangeSides, REF_PRICE_FALLBACK};
pub use filter::{collect_issuers, filter_by_issuer, issuer_selected};
pub use single_date::{build_single_date_matrices, SingleDateMatrices};
pub use summary::{
    column_maxima, display_ranges, summarize_sides, ColumnMaxima, SideSummary,
    DEFAULT_DISPLAY_RANGE_LIMIT,
};
pub use window::{derive_window, DisplayWindow};
