//! Display date window derivation.

use serde::Serialize;

/// Dates the matrix view renders, plus the previous-date pointer used for
/// period-over-period deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayWindow {
    pub display_dates: Vec<String>,
    pub prev_date: Option<String>,
}

/// Derive the display window from the descending date list.
///
/// The active date is deliberately duplicated in the first two slots: the
/// view reserves slot one for the detail breakdown and slot two for the
/// trend column, both anchored on the same date. Dates more recent than the
/// active date are dropped. When the active date is not in the list at all,
/// the list passes through unchanged and there is no previous date.
pub fn derive_window(sorted_dates_desc: &[String], active_date: &str) -> DisplayWindow {
    let idx = match sorted_dates_desc.iter().position(|d| d == active_date) {
        Some(idx) => idx,
        None => {
            return DisplayWindow {
                display_dates: sorted_dates_desc.to_vec(),
                prev_date: None,
            }
        }
    };

    let mut display_dates = Vec::with_capacity(sorted_dates_desc.len() - idx + 1);
    display_dates.push(active_date.to_string());
    display_dates.push(active_date.to_string());
    display_dates.extend(sorted_dates_desc[idx + 1..].iter().cloned());

    DisplayWindow {
        display_dates,
        prev_date: sorted_dates_desc.get(idx + 1).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_active_and_points_at_previous() {
        let window = derive_window(
            &dates(&["2025-06-23", "2025-06-20", "2025-06-18"]),
            "2025-06-20",
        );
        assert_eq!(
            window.display_dates,
            dates(&["2025-06-20", "2025-06-20", "2025-06-18"])
        );
        assert_eq!(window.prev_date.as_deref(), Some("2025-06-18"));
    }

    #[test]
    fn active_at_head_keeps_all_older_dates() {
        let window = derive_window(
            &dates(&["2025-06-23", "2025-06-20", "2025-06-18"]),
            "2025-06-23",
        );
        assert_eq!(
            window.display_dates,
            dates(&["2025-06-23", "2025-06-23", "2025-06-20", "2025-06-18"])
        );
        assert_eq!(window.prev_date.as_deref(), Some("2025-06-20"));
    }

    #[test]
    fn oldest_active_date_has_no_previous() {
        let window = derive_window(&dates(&["2025-06-20", "2025-06-18"]), "2025-06-18");
        assert_eq!(window.display_dates, dates(&["2025-06-18", "2025-06-18"]));
        assert_eq!(window.prev_date, None);
    }

    #[test]
    fn unknown_active_date_passes_list_through() {
        let all = dates(&["2025-06-20", "2025-06-18"]);
        let window = derive_window(&all, "2025-06-19");
        assert_eq!(window.display_dates, all);
        assert_eq!(window.prev_date, None);
    }

    #[test]
    fn empty_list_stays_empty() {
        let window = derive_window(&[], "2025-06-20");
        assert!(window.display_dates.is_empty());
        assert_eq!(window.prev_date, None);
    }

    #[test]
    fn first_two_slots_always_equal_active_when_present() {
        let all = dates(&["2025-06-23", "2025-06-20", "2025-06-18", "2025-06-17"]);
        for active in &all {
            let window = derive_window(&all, active);
            assert_eq!(&window.display_dates[0], active);
            assert_eq!(&window.display_dates[1], active);
        }
    }
}
