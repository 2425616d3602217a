//! Side totals and render-scaling helpers for the mid-summary strip.

use crate::matrix::builder::{MatrixResult, SideMatrix};
use crate::matrix::classify::parse_range_start;
use crate::models::Direction;
use serde::Serialize;

/// Rows a side may show before the ladder is capped near the price.
pub const DEFAULT_DISPLAY_RANGE_LIMIT: usize = 15;

/// Bull/Bear standing on the active date.
///
/// `ratio` is `None` when the Bear side totals zero; the view renders that
/// as "∞".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideSummary {
    pub current_price: f64,
    pub bear_ranges: Vec<String>,
    pub bull_ranges: Vec<String>,
    pub bear_total: f64,
    pub bull_total: f64,
    pub bear_percent: f64,
    pub bull_percent: f64,
    pub ratio: Option<f64>,
}

/// Per-column maxima used to scale the notional/shares bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColumnMaxima {
    pub notional: f64,
    pub shares: f64,
}

/// Summarize both sides of a build on `active_date`.
///
/// The current price falls back to 0.0 when the active date carries no
/// price, which pushes every range to the Bear split. This fallback is
/// distinct from the classifier's 30.0 build-time fallback.
pub fn summarize_sides(result: &MatrixResult, active_date: &str) -> SideSummary {
    let current_price = result
        .price_by_date
        .get(active_date)
        .copied()
        .unwrap_or(0.0);

    let bear_ranges: Vec<String> = result
        .range_list
        .iter()
        .filter(|r| parse_range_start(r).map_or(false, |s| s >= current_price))
        .cloned()
        .collect();
    let bull_ranges: Vec<String> = result
        .range_list
        .iter()
        .filter(|r| parse_range_start(r).map_or(false, |s| s < current_price))
        .cloned()
        .collect();

    let bear_total = column_total(&result.bear, &bear_ranges, active_date);
    let bull_total = column_total(&result.bull, &bull_ranges, active_date);

    let combined = bear_total + bull_total;
    let (bear_percent, bull_percent) = if combined > 0.0 {
        (
            round1(bear_total / combined * 100.0),
            round1(bull_total / combined * 100.0),
        )
    } else {
        (0.0, 0.0)
    };

    let ratio = if bear_total == 0.0 {
        None
    } else {
        Some(bull_total / bear_total)
    };

    SideSummary {
        current_price,
        bear_ranges,
        bull_ranges,
        bear_total,
        bull_total,
        bear_percent,
        bull_percent,
        ratio,
    }
}

/// Cap a side's ladder at the `limit` rows nearest the price.
///
/// The Bear side lists extremes first, so it keeps its tail; the Bull side
/// lists closest first, so it keeps its head.
pub fn display_ranges<'a>(side: Direction, ranges: &'a [String], limit: usize) -> &'a [String] {
    if ranges.len() <= limit {
        return ranges;
    }
    match side {
        Direction::Bear => &ranges[ranges.len() - limit..],
        Direction::Bull => &ranges[..limit],
    }
}

/// Largest cell notional/shares at `date` across both sides.
pub fn column_maxima(result: &MatrixResult, date: &str) -> ColumnMaxima {
    let mut maxima = ColumnMaxima::default();
    for side in [&result.bull, &result.bear] {
        for range in &result.range_list {
            if let Some(cell) = side.get(range).and_then(|row| row.get(date)) {
                maxima.notional = maxima.notional.max(cell.notional);
                maxima.shares = maxima.shares.max(cell.shares);
            }
        }
    }
    maxima
}

fn column_total(side: &SideMatrix, ranges: &[String], date: &str) -> f64 {
    ranges
        .iter()
        .filter_map(|range| side.get(range).and_then(|row| row.get(date)))
        .map(|cell| cell.notional)
        .sum()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::builder::build_matrices;
    use crate::models::{CbbcEntry, RecordGroup};

    fn entry(dir: Direction, notional: f64, shares: f64, ul_price: f64) -> CbbcEntry {
        CbbcEntry {
            code: "61234".to_string(),
            call_level: 0.0,
            quantity: 1.0,
            notional,
            shares_number: shares,
            ul_price,
            issuer: "UBS".to_string(),
            bull_bear: dir,
            date: String::new(),
            os_percent: 0.0,
            last_price: 0.0,
        }
    }

    fn group(date: &str, range: &str, entries: Vec<CbbcEntry>) -> RecordGroup {
        RecordGroup {
            date: date.to_string(),
            range: range.to_string(),
            outstanding_quantity: 0.0,
            calculated_notional: 0.0,
            entries,
        }
    }

    fn sample() -> MatrixResult {
        let groups = vec![
            group(
                "2025-06-20",
                "18200 - 18399",
                vec![entry(Direction::Bear, 3_000_000.0, 30.0, 18100.0)],
            ),
            group(
                "2025-06-20",
                "18000 - 18199",
                vec![entry(Direction::Bull, 1_000_000.0, 10.0, 18100.0)],
            ),
        ];
        build_matrices(&groups, &[], None, Some("2025-06-20"))
    }

    #[test]
    fn totals_and_percents_on_active_date() {
        let summary = summarize_sides(&sample(), "2025-06-20");
        assert_eq!(summary.current_price, 18100.0);
        assert_eq!(summary.bear_ranges, vec!["18200 - 18399"]);
        assert_eq!(summary.bull_ranges, vec!["18000 - 18199"]);
        assert_eq!(summary.bear_total, 3_000_000.0);
        assert_eq!(summary.bull_total, 1_000_000.0);
        assert_eq!(summary.bear_percent, 75.0);
        assert_eq!(summary.bull_percent, 25.0);
        assert_eq!(summary.ratio, Some(1.0 / 3.0));
    }

    #[test]
    fn zero_bear_total_has_no_ratio() {
        let groups = vec![group(
            "2025-06-20",
            "18000 - 18199",
            vec![entry(Direction::Bull, 1_000_000.0, 10.0, 18100.0)],
        )];
        let result = build_matrices(&groups, &[], None, Some("2025-06-20"));
        let summary = summarize_sides(&result, "2025-06-20");
        assert_eq!(summary.bear_total, 0.0);
        assert_eq!(summary.ratio, None);
        assert_eq!(summary.bull_percent, 100.0);
    }

    #[test]
    fn missing_price_pushes_everything_bear_side() {
        let groups = vec![group(
            "2025-06-20",
            "18000 - 18199",
            vec![entry(Direction::Bull, 1_000_000.0, 10.0, 0.0)],
        )];
        let result = build_matrices(&groups, &[], None, Some("2025-06-20"));
        let summary = summarize_sides(&result, "2025-06-20");
        assert_eq!(summary.current_price, 0.0);
        assert_eq!(summary.bear_ranges, vec!["18000 - 18199"]);
        assert!(summary.bull_ranges.is_empty());
    }

    #[test]
    fn display_cap_keeps_rows_nearest_the_price() {
        let limit = DEFAULT_DISPLAY_RANGE_LIMIT;
        let bear: Vec<String> = (0..20).map(|i| format!("{} - {}", 400 - i, 419 - i)).collect();
        let kept = display_ranges(Direction::Bear, &bear, limit);
        assert_eq!(kept.len(), limit);
        assert_eq!(kept[0], bear[5]);
        assert_eq!(kept[14], bear[19]);

        let bull: Vec<String> = (0..20).map(|i| format!("{} - {}", 300 - i, 319 - i)).collect();
        let kept = display_ranges(Direction::Bull, &bull, limit);
        assert_eq!(kept.len(), limit);
        assert_eq!(kept[0], bull[0]);
        assert_eq!(kept[14], bull[14]);

        let short = vec!["10 - 19".to_string()];
        assert_eq!(display_ranges(Direction::Bull, &short, limit), short.as_slice());
    }

    #[test]
    fn column_maxima_spans_both_sides() {
        let maxima = column_maxima(&sample(), "2025-06-20");
        assert_eq!(maxima.notional, 3_000_000.0);
        assert_eq!(maxima.shares, 30.0);

        let absent = column_maxima(&sample(), "2025-06-19");
        assert_eq!(absent.notional, 0.0);
        assert_eq!(absent.shares, 0.0);
    }
}
