//! Range-side classification.
//!
//! Splits call-level ranges into a Bear side (start at or above the
//! reference price) and a Bull side (start below it), ordered the way the
//! dashboard ladder renders them: both sub-sequences sorted ascending by
//! start and then reversed, which lays the full ladder out in descending
//! start order with the reference price sitting between the two sides.
//!
//! # Reference Price Resolution
//!
//! The reference price is the underlying price recorded for the target
//! date. When no entry on that date carried a valid price, classification
//! falls back to [`REF_PRICE_FALLBACK`] so the ordering stays deterministic
//! instead of collapsing.

use std::cmp::Ordering;
use tracing::debug;

/// Fallback reference price when no entry carries a valid underlying price.
pub const REF_PRICE_FALLBACK: f64 = 30.0;

/// Delimiter between the start and end of a range key.
pub const RANGE_DELIMITER: &str = " - ";

/// Ordered range keys per side. `bear` then `bull` is the full ladder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSides {
    pub bear: Vec<String>,
    pub bull: Vec<String>,
}

impl RangeSides {
    /// Concatenate into the render order: Bear ladder first, Bull below.
    pub fn into_ladder(self) -> Vec<String> {
        let mut ladder = self.bear;
        ladder.extend(self.bull);
        ladder
    }

    pub fn is_empty(&self) -> bool {
        self.bear.is_empty() && self.bull.is_empty()
    }
}

/// Extract the numeric start of a range key.
///
/// `"18000 - 18199"` parses to `18000.0`; a bare call-level key like
/// `"18050"` parses whole. Returns `None` for keys with no leading number
/// and for non-finite values.
#[inline]
pub fn parse_range_start(range: &str) -> Option<f64> {
    let start = range.split(RANGE_DELIMITER).next().unwrap_or(range);
    start.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classify range keys against `ref_price`.
///
/// Keys that fail numeric parsing are dropped from both sides; the caller's
/// matrices never emit cells for them. Equal starts keep their relative
/// input order (stable sort).
pub fn classify_ranges(ranges: &[String], ref_price: f64) -> RangeSides {
    let mut parsed: Vec<(&String, f64)> = Vec::with_capacity(ranges.len());
    let mut dropped = 0usize;
    for range in ranges {
        match parse_range_start(range) {
            Some(start) => parsed.push((range, start)),
            None => {
                dropped += 1;
                debug!(range = %range, "dropping range key with unparseable start");
            }
        }
    }
    if dropped > 0 {
        debug!(dropped, "range keys excluded from classification");
    }

    parsed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut bear: Vec<String> = parsed
        .iter()
        .filter(|(_, start)| *start >= ref_price)
        .map(|(range, _)| (*range).clone())
        .collect();
    bear.reverse();

    let mut bull: Vec<String> = parsed
        .iter()
        .filter(|(_, start)| *start < ref_price)
        .map(|(range, _)| (*range).clone())
        .collect();
    bull.reverse();

    RangeSides { bear, bull }
}
