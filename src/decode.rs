//! Upstream Decode Layer
//!
//! Parsers for the grouped-CBBC JSON payloads delivered by the data-retrieval
//! collaborator, with validation into the typed record model. Malformed
//! entries are rejected and counted, never fatal: partial results beat a
//! hard failure when third-party data is noisy.

use crate::models::{CbbcEntry, Direction, RecordGroup};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Raw grouped row as it arrives on the wire. One row per (date, range).
///
/// Single-date payloads reuse this shape with the bucket keyed by the exact
/// call level (`call_level` aliases `range`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawGroupedRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(
        default,
        alias = "call_level",
        deserialize_with = "deserialize_key_string"
    )]
    pub range: String,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub outstanding_quantity: f64,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub calculated_notional: f64,
    #[serde(default, alias = "entries")]
    pub cbcc_list: Option<Vec<RawCbbcRecord>>,
}

/// Raw per-contract record. Numeric fields may arrive as JSON numbers or
/// as decimal strings; `code` may arrive as a bare number.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCbbcRecord {
    #[serde(default, deserialize_with = "deserialize_key_string")]
    pub code: String,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub call_level: f64,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub notional: f64,
    #[serde(default, deserialize_with = "deserialize_opt_number_or_string")]
    pub shares_number: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub ul_price: f64,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub bull_bear: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub os_percent: f64,
    #[serde(default, deserialize_with = "deserialize_number_or_string")]
    pub last_price: f64,
}

/// Deserialize a number that may come as a string or number. Missing is
/// handled by `#[serde(default)]`; JSON null is treated as 0. A string that
/// fails to parse becomes NaN for the validation pass to deal with, so one
/// junk field never fails the whole payload.
fn deserialize_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_opt_number_or_string(deserializer)?.unwrap_or(0.0))
}

fn deserialize_opt_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(f64),
    }

    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        Some(StringOrNumber::Number(n)) => Some(n),
        None => None,
    })
}

/// Deserialize a key that may come as a string or a bare number
/// (contract codes and call-level bucket keys both do). Null becomes the
/// empty string, which downstream validation treats as a missing key.
fn deserialize_key_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
        StringOrNumber::Null => String::new(),
    })
}

/// Decode integrity counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecodeStats {
    pub total_groups: u64,
    pub accepted_groups: u64,
    pub rejected_groups: u64,
    pub total_entries: u64,
    pub accepted_entries: u64,
    pub rejected_direction: u64,
    pub rejected_numeric: u64,
}

impl DecodeStats {
    pub fn rejected_entries(&self) -> u64 {
        self.rejected_direction + self.rejected_numeric
    }
}

/// Decode failure. Only a payload that is not the expected JSON shape at the
/// top level is an error; malformed individual rows degrade to rejects.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "payload is not a grouped-CBBC JSON array: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e)
    }
}

/// Decode a JSON payload into validated record groups.
///
/// Rows missing a date or range key are dropped whole; entries with an
/// unrecognized direction tag or a numeric field that is non-finite or
/// unparseable are dropped individually. Everything dropped shows up in the
/// returned stats.
pub fn decode_groups(payload: &str) -> Result<(Vec<RecordGroup>, DecodeStats), DecodeError> {
    let raw: Vec<RawGroupedRecord> = serde_json::from_str(payload)?;
    Ok(validate_groups(raw))
}

/// Validate already-deserialized raw rows into the typed model.
pub fn validate_groups(raw: Vec<RawGroupedRecord>) -> (Vec<RecordGroup>, DecodeStats) {
    let mut stats = DecodeStats::default();
    let mut groups = Vec::with_capacity(raw.len());

    for row in raw {
        stats.total_groups += 1;

        let date = row.date.unwrap_or_default();
        if date.is_empty() || row.range.is_empty() {
            stats.rejected_groups += 1;
            debug!(
                date = %date,
                range = %row.range,
                "dropping group row without date/range key"
            );
            continue;
        }

        let raw_entries = row.cbcc_list.unwrap_or_default();
        let mut entries = Vec::with_capacity(raw_entries.len());
        for rec in raw_entries {
            stats.total_entries += 1;
            match validate_entry(rec) {
                Ok(entry) => {
                    stats.accepted_entries += 1;
                    entries.push(entry);
                }
                Err(reason) => match reason {
                    EntryReject::Direction(tag) => {
                        stats.rejected_direction += 1;
                        debug!(tag = %tag, date = %date, range = %row.range,
                            "dropping entry with invalid direction tag");
                    }
                    EntryReject::NonFinite(field) => {
                        stats.rejected_numeric += 1;
                        debug!(field, date = %date, range = %row.range,
                            "dropping entry with non-finite numeric field");
                    }
                },
            }
        }

        stats.accepted_groups += 1;
        groups.push(RecordGroup {
            date,
            range: row.range,
            outstanding_quantity: finite_or_zero(row.outstanding_quantity),
            calculated_notional: finite_or_zero(row.calculated_notional),
            entries,
        });
    }

    if stats.rejected_entries() > 0 || stats.rejected_groups > 0 {
        warn!(
            groups = stats.accepted_groups,
            entries = stats.accepted_entries,
            rejected_groups = stats.rejected_groups,
            rejected_entries = stats.rejected_entries(),
            "decoded grouped-CBBC payload with rejects"
        );
    } else {
        debug!(
            groups = stats.accepted_groups,
            entries = stats.accepted_entries,
            "decoded grouped-CBBC payload"
        );
    }

    (groups, stats)
}

enum EntryReject {
    Direction(String),
    NonFinite(&'static str),
}

/// Group-level numerics never abort anything; junk degrades like a missing
/// field.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn validate_entry(rec: RawCbbcRecord) -> Result<CbbcEntry, EntryReject> {
    let tag = rec.bull_bear.unwrap_or_default();
    let bull_bear = match Direction::parse(&tag) {
        Some(direction) => direction,
        None => return Err(EntryReject::Direction(tag)),
    };

    let shares_number = rec.shares_number.unwrap_or(0.0);
    let numerics = [
        ("call_level", rec.call_level),
        ("quantity", rec.quantity),
        ("notional", rec.notional),
        ("shares_number", shares_number),
        ("ul_price", rec.ul_price),
        ("os_percent", rec.os_percent),
        ("last_price", rec.last_price),
    ];
    for (field, value) in numerics {
        if !value.is_finite() {
            return Err(EntryReject::NonFinite(field));
        }
    }

    Ok(CbbcEntry {
        code: rec.code,
        call_level: rec.call_level,
        quantity: rec.quantity,
        notional: rec.notional,
        shares_number,
        ul_price: rec.ul_price,
        issuer: rec.issuer.unwrap_or_default(),
        bull_bear,
        date: String::new(),
        os_percent: rec.os_percent,
        last_price: rec.last_price,
    })
}
