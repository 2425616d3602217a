//! Single-date matrix variant.
//!
//! Single-date dashboards deliver per-contract rows whose bucket key is the
//! exact call level (`"18050"`) instead of a range, and the view shows only
//! buckets that actually hold contracts. Two rules differ from the grouped
//! build:
//!
//! - placement is strict: a Bull-tagged entry lands only in a bull-side
//!   bucket (call level below the reference price) and a Bear-tagged entry
//!   only in a bear-side bucket; mismatches are dropped from both sides
//! - buckets with no surviving data are pruned from the ladder and from
//!   both matrices
//!
//! The reference price is the price on the most recent date present.

use crate::matrix::builder::{allocate_dense, collect_axes, MatrixResult};
use crate::matrix::classify::{classify_ranges, parse_range_start, REF_PRICE_FALLBACK};
use crate::matrix::filter::issuer_selected;
use crate::matrix::window::derive_window;
use crate::models::{Direction, RecordGroup};
use serde::Serialize;
use tracing::debug;

/// Grouped-build output plus the display window for the single-date view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SingleDateMatrices {
    pub result: MatrixResult,
    pub display_dates: Vec<String>,
    pub prev_date: Option<String>,
}

impl SingleDateMatrices {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Build the single-date matrices over call-level-keyed groups.
pub fn build_single_date_matrices(
    groups: &[RecordGroup],
    selected_issuers: &[String],
) -> SingleDateMatrices {
    if groups.is_empty() {
        return SingleDateMatrices::empty();
    }

    let (ranges, mut dates, price_by_date) = collect_axes(groups);
    dates.sort_by(|a, b| b.cmp(a));

    let active_date = match dates.first() {
        Some(date) => date.clone(),
        None => return SingleDateMatrices::empty(),
    };
    let ref_price = price_by_date
        .get(&active_date)
        .copied()
        .unwrap_or(REF_PRICE_FALLBACK);

    let ladder = classify_ranges(&ranges, ref_price).into_ladder();
    let mut bull = allocate_dense(&ladder, &dates);
    let mut bear = allocate_dense(&ladder, &dates);

    let mut mismatched = 0usize;
    for group in groups {
        let level_at_or_above = match parse_range_start(&group.range) {
            Some(start) => start >= ref_price,
            None => continue,
        };

        for entry in &group.entries {
            if !issuer_selected(selected_issuers, &entry.issuer) {
                continue;
            }
            let side = match entry.bull_bear {
                Direction::Bull if !level_at_or_above => &mut bull,
                Direction::Bear if level_at_or_above => &mut bear,
                _ => {
                    mismatched += 1;
                    continue;
                }
            };
            if let Some(cell) = side
                .get_mut(&group.range)
                .and_then(|row| row.get_mut(&group.date))
            {
                cell.absorb(entry, &group.date);
            }
        }
    }
    if mismatched > 0 {
        debug!(
            mismatched,
            ref_price, "entries dropped for direction/side mismatch"
        );
    }

    // Prune buckets nothing landed in, on either side, on any date.
    let range_list: Vec<String> = ladder
        .into_iter()
        .filter(|range| {
            dates.iter().any(|date| {
                let bull_hit = bull
                    .get(range)
                    .and_then(|row| row.get(date))
                    .map_or(false, |c| c.has_data());
                let bear_hit = bear
                    .get(range)
                    .and_then(|row| row.get(date))
                    .map_or(false, |c| c.has_data());
                bull_hit || bear_hit
            })
        })
        .collect();

    bull.retain(|range, _| range_list.contains(range));
    bear.retain(|range, _| range_list.contains(range));

    let window = derive_window(&dates, &active_date);

    SingleDateMatrices {
        result: MatrixResult {
            bull,
            bear,
            range_list,
            date_list: dates,
            price_by_date,
        },
        display_dates: window.display_dates,
        prev_date: window.prev_date,
    }
}
