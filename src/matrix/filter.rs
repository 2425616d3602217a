//! Issuer filtering and issuer directory extraction.

use crate::models::{CbbcEntry, RecordGroup};
use std::collections::BTreeSet;

/// Whether an entry from `issuer` survives the current selection.
/// An empty selection means no filtering: every issuer shows.
#[inline]
pub fn issuer_selected(selected: &[String], issuer: &str) -> bool {
    selected.is_empty() || selected.iter().any(|s| s == issuer)
}

/// Reduce entries to the selected issuers, preserving order.
///
/// Filtering a group down to nothing is not an error; the matrix cell for
/// that (range, date) still exists downstream with zero values.
pub fn filter_by_issuer<'a>(entries: &'a [CbbcEntry], selected: &[String]) -> Vec<&'a CbbcEntry> {
    entries
        .iter()
        .filter(|e| issuer_selected(selected, &e.issuer))
        .collect()
}

/// Unique issuers across all entries, sorted ascending. Blank issuer fields
/// (defaulted at decode) are not selectable and are left out.
pub fn collect_issuers(groups: &[RecordGroup]) -> Vec<String> {
    let mut issuers = BTreeSet::new();
    for group in groups {
        for entry in &group.entries {
            if !entry.issuer.is_empty() {
                issuers.insert(entry.issuer.clone());
            }
        }
    }
    issuers.into_iter().collect()
}
