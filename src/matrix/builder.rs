//! Two-sided matrix assembly.
//!
//! # Canonical Build Rule
//!
//! Ranges and dates are collected from every group, including groups that
//! the requested date window later excludes, and a zero cell is allocated
//! for every (range, date) pair on both sides before any folding happens.
//! The matrix is therefore dense for any window the caller asks for:
//! consumers index `[range][date]` without existence checks.
//!
//! Entries fold into the side named by their own direction tag. Which side
//! a *range* belongs to is a separate question answered once per build by
//! the classifier, using the underlying price on the target date.
//!
//! # Purity
//!
//! Every call allocates fresh maps and cells. Nothing here reads clocks,
//! caches, or globals; identical inputs give identical outputs.

use crate::matrix::classify::{classify_ranges, REF_PRICE_FALLBACK};
use crate::matrix::filter::issuer_selected;
use crate::models::{AggregatedCell, Direction, RecordGroup};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One side of the matrix: range key → date → cell.
pub type SideMatrix = HashMap<String, HashMap<String, AggregatedCell>>;

/// Output of a matrix build.
///
/// `range_list` orders the ladder (Bear side descending, then Bull side
/// descending); `date_list` is descending ISO order. Both matrices cover
/// exactly `range_list` × `date_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixResult {
    pub bull: SideMatrix,
    pub bear: SideMatrix,
    pub range_list: Vec<String>,
    pub date_list: Vec<String>,
    pub price_by_date: HashMap<String, f64>,
}

impl MatrixResult {
    /// The all-empty shape returned for empty input.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.range_list.is_empty() && self.date_list.is_empty()
    }

    pub fn bull_cell(&self, range: &str, date: &str) -> Option<&AggregatedCell> {
        self.bull.get(range).and_then(|row| row.get(date))
    }

    pub fn bear_cell(&self, range: &str, date: &str) -> Option<&AggregatedCell> {
        self.bear.get(range).and_then(|row| row.get(date))
    }
}

/// Range keys, date keys, and per-date underlying prices across all groups.
///
/// Keys keep first-seen order. A date's price comes from the first entry
/// carrying a finite, positive `ul_price`; once set it is never overwritten.
pub(crate) fn collect_axes(
    groups: &[RecordGroup],
) -> (Vec<String>, Vec<String>, HashMap<String, f64>) {
    let mut ranges = Vec::new();
    let mut seen_ranges = HashSet::new();
    let mut dates = Vec::new();
    let mut seen_dates = HashSet::new();
    let mut price_by_date = HashMap::new();

    for group in groups {
        if seen_ranges.insert(group.range.clone()) {
            ranges.push(group.range.clone());
        }
        if seen_dates.insert(group.date.clone()) {
            dates.push(group.date.clone());
        }
        if !price_by_date.contains_key(&group.date) {
            if let Some(price) = group
                .entries
                .iter()
                .map(|e| e.ul_price)
                .find(|p| p.is_finite() && *p > 0.0)
            {
                price_by_date.insert(group.date.clone(), price);
            }
        }
    }

    (ranges, dates, price_by_date)
}

/// Allocate a zero cell for every (range, date) pair.
pub(crate) fn allocate_dense(ranges: &[String], dates: &[String]) -> SideMatrix {
    let mut matrix = SideMatrix::with_capacity(ranges.len());
    for range in ranges {
        let mut row = HashMap::with_capacity(dates.len());
        for date in dates {
            row.insert(date.clone(), AggregatedCell::new());
        }
        matrix.insert(range.clone(), row);
    }
    matrix
}

/// Build the two-sided matrix over `groups`.
///
/// Groups outside `[from_date, to_date]` (inclusive, ISO string compare,
/// missing `from_date` means no lower bound) still shape the matrix but
/// contribute nothing. A missing `to_date` or an empty `groups` slice
/// yields [`MatrixResult::empty`].
pub fn build_matrices(
    groups: &[RecordGroup],
    selected_issuers: &[String],
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> MatrixResult {
    let to_date = match to_date {
        Some(to) if !to.is_empty() => to,
        _ => return MatrixResult::empty(),
    };
    if groups.is_empty() {
        return MatrixResult::empty();
    }

    let (ranges, mut dates, price_by_date) = collect_axes(groups);

    let mut bull = allocate_dense(&ranges, &dates);
    let mut bear = allocate_dense(&ranges, &dates);

    for group in groups {
        let in_window = from_date.map_or(true, |from| group.date.as_str() >= from)
            && group.date.as_str() <= to_date;
        if !in_window {
            continue;
        }

        for entry in &group.entries {
            if !issuer_selected(selected_issuers, &entry.issuer) {
                continue;
            }
            let side = match entry.bull_bear {
                Direction::Bull => &mut bull,
                Direction::Bear => &mut bear,
            };
            if let Some(cell) = side
                .get_mut(&group.range)
                .and_then(|row| row.get_mut(&group.date))
            {
                cell.absorb(entry, &group.date);
            }
        }
    }

    dates.sort_by(|a, b| b.cmp(a));

    let ref_price = price_by_date
        .get(to_date)
        .copied()
        .unwrap_or(REF_PRICE_FALLBACK);
    let range_list = classify_ranges(&ranges, ref_price).into_ladder();

    // Keep only rows that classified; unparseable range keys disappear here.
    let bull = take_rows(bull, &range_list);
    let bear = take_rows(bear, &range_list);

    debug!(
        ranges = range_list.len(),
        dates = dates.len(),
        ref_price,
        "built two-sided matrix"
    );

    MatrixResult {
        bull,
        bear,
        range_list,
        date_list: dates,
        price_by_date,
    }
}

fn take_rows(mut matrix: SideMatrix, range_list: &[String]) -> SideMatrix {
    let mut kept = SideMatrix::with_capacity(range_list.len());
    for range in range_list {
        if let Some(row) = matrix.remove(range) {
            kept.insert(range.clone(), row);
        }
    }
    kept
}
