use serde::{Deserialize, Serialize};

/// Contract direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bull,
    Bear,
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Bull => "Bull",
            Direction::Bear => "Bear",
        }
    }

    /// Parse a wire direction tag. Trims surrounding whitespace; anything
    /// other than exactly "Bull" or "Bear" after trimming is rejected.
    pub fn parse(tag: &str) -> Option<Direction> {
        match tag.trim() {
            "Bull" => Some(Direction::Bull),
            "Bear" => Some(Direction::Bear),
            _ => None,
        }
    }
}

/// A single outstanding-CBBC record as validated at the decode boundary.
///
/// `date` is empty until the matrix builder stamps the owning group's date
/// onto the copy it stores in a cell's `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbbcEntry {
    pub code: String,
    pub call_level: f64,
    pub quantity: f64,
    pub notional: f64,
    pub shares_number: f64,
    pub ul_price: f64,
    pub issuer: String,
    pub bull_bear: Direction,
    pub date: String,
    pub os_percent: f64,
    pub last_price: f64,
}

/// One upstream row per (date, range) pair.
///
/// `range` encodes a call-level bucket as `"<start> - <end>"`; the start is
/// recovered by parsing the substring before the `" - "` delimiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordGroup {
    pub date: String,
    pub range: String,
    pub outstanding_quantity: f64,
    pub calculated_notional: f64,
    pub entries: Vec<CbbcEntry>,
}

/// Aggregate of all entries that landed in one (range, date, side) cell.
///
/// Built fresh for every build; a cell exists for every (range, date) pair
/// even when nothing accumulated into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCell {
    pub notional: f64,
    pub quantity: f64,
    pub shares: f64,
    pub codes: Vec<String>,
    pub items: Vec<CbbcEntry>,
}

impl AggregatedCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entry into this cell, stamping `date` onto the stored item.
    ///
    /// Share contributions are rounded to 2 decimals per entry, before
    /// accumulation, so drift does not build up across many small contracts.
    pub fn absorb(&mut self, entry: &CbbcEntry, date: &str) {
        self.notional += entry.notional;
        self.quantity += entry.quantity;
        self.shares += (entry.shares_number * 100.0).round() / 100.0;
        self.codes.push(entry.code.clone());

        let mut item = entry.clone();
        item.date = date.to_string();
        self.items.push(item);
    }

    /// True when anything accumulated here.
    pub fn has_data(&self) -> bool {
        self.notional > 0.0 || self.quantity > 0.0 || self.shares > 0.0
    }
}
