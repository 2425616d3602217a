//! Display formatting for notional values, deltas, and underlying codes.

use anyhow::Context;
use serde::Serialize;

/// Fixed HKD→USD conversion rate for the secondary display leg.
pub const HKD_TO_USD_RATE: f64 = 0.1273;

/// Underlyings whose contract notional is denominated in index points.
pub const INDEX_CODES: [&str; 4] = ["HSI", "HSCEI", "HSTEC", "HSTECH"];

/// Points-to-currency divisor applied to index-underlying notional before
/// any rate conversion.
pub const INDEX_NOTIONAL_DIVISOR: f64 = 50.0;

/// Both display legs of one amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyPair {
    pub hkd: String,
    pub usd: String,
}

/// Conversion parameters for the currency pair.
///
/// Defaults pin the dashboard's constants; hosts that track a different
/// rate or multiplier set can override through the environment.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    pub rate: f64,
    pub index_divisor: f64,
    pub index_codes: Vec<String>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self {
            rate: HKD_TO_USD_RATE,
            index_divisor: INDEX_NOTIONAL_DIVISOR,
            index_codes: INDEX_CODES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CurrencyConverter {
    /// Load overrides from the environment. An unset variable keeps its
    /// default; a variable set to something unparseable is an error rather
    /// than a silent fallback.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let rate = match std::env::var("CBBC_USD_RATE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("CBBC_USD_RATE is not a number: {:?}", raw))?,
            Err(_) => HKD_TO_USD_RATE,
        };

        let index_divisor = match std::env::var("CBBC_INDEX_DIVISOR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("CBBC_INDEX_DIVISOR is not a number: {:?}", raw))?,
            Err(_) => INDEX_NOTIONAL_DIVISOR,
        };

        let index_codes = std::env::var("CBBC_INDEX_CODES")
            .unwrap_or_else(|_| INDEX_CODES.join(","))
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            rate,
            index_divisor,
            index_codes,
        })
    }

    pub fn is_index_code(&self, code: &str) -> bool {
        self.index_codes.iter().any(|c| c == code)
    }

    /// Format one amount as both display legs.
    ///
    /// Index-underlying amounts are rescaled from points before the rate
    /// applies; the native leg shows the amount as delivered. Zero and
    /// non-finite amounts render as "0" on both legs.
    pub fn pair(&self, amount: f64, underlying_code: &str) -> CurrencyPair {
        if !amount.is_finite() || amount == 0.0 {
            return CurrencyPair {
                hkd: "0".to_string(),
                usd: "0".to_string(),
            };
        }
        let scaled = if self.is_index_code(underlying_code) {
            amount / self.index_divisor
        } else {
            amount
        };
        CurrencyPair {
            hkd: abbreviate_number(amount),
            usd: abbreviate_number(scaled * self.rate),
        }
    }
}

/// Format with the default converter.
pub fn format_currency_pair(amount: f64, underlying_code: &str) -> CurrencyPair {
    CurrencyConverter::default().pair(amount, underlying_code)
}

/// Whether `code` is in the default index allow-list.
pub fn is_index_code(code: &str) -> bool {
    INDEX_CODES.contains(&code)
}

/// Abbreviate to K/M/B at one decimal place. Values under 1K print plain;
/// non-finite values print "0".
pub fn abbreviate_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        value.to_string()
    }
}

/// Signed abbreviation for period-over-period deltas. Exact zero carries no
/// sign; magnitudes under 1K print with one decimal.
pub fn format_diff(diff: f64) -> String {
    if !diff.is_finite() {
        return "0".to_string();
    }
    let sign = if diff > 0.0 {
        "+"
    } else if diff < 0.0 {
        "-"
    } else {
        ""
    };
    let abs = diff.abs();
    let body = if abs >= 1e6 {
        format!("{:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", abs / 1e3)
    } else {
        format!("{:.1}", abs)
    };
    format!("{}{}", sign, body)
}

/// Numeric underlying codes display zero-padded to five digits; ticker
/// symbols (anything with an uppercase letter) pass through.
pub fn format_underlying_code(code: &str) -> String {
    if code.chars().any(|c| c.is_ascii_uppercase()) {
        code.to_string()
    } else {
        format!("{:0>5}", code)
    }
}

/// Order underlying codes for the selector: priority codes first, in
/// priority order, then the rest ascending.
pub fn sort_underlyings(codes: &[String], priority: &[String]) -> Vec<String> {
    let mut sorted = codes.to_vec();
    sorted.sort_by(|a, b| {
        let pa = priority.iter().position(|p| p == a);
        let pb = priority.iter().position(|p| p == b);
        match (pa, pb) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(abbreviate_number(2_500_000_000.0), "2.5B");
        assert_eq!(abbreviate_number(100_000_000.0), "100.0M");
        assert_eq!(abbreviate_number(254_600.0), "254.6K");
        assert_eq!(abbreviate_number(1_000.0), "1.0K");
        assert_eq!(abbreviate_number(999.0), "999");
        assert_eq!(abbreviate_number(0.5), "0.5");
        assert_eq!(abbreviate_number(0.0), "0");
        assert_eq!(abbreviate_number(f64::NAN), "0");
        assert_eq!(abbreviate_number(-5_000.0), "-5000");
    }

    #[test]
    fn index_amounts_rescale_before_conversion() {
        let pair = format_currency_pair(100_000_000.0, "HSI");
        assert_eq!(pair.hkd, "100.0M");
        // 100M / 50 * 0.1273 = 254,600
        assert_eq!(pair.usd, "254.6K");
    }

    #[test]
    fn stock_amounts_convert_without_rescaling() {
        let pair = format_currency_pair(100_000_000.0, "00700");
        assert_eq!(pair.hkd, "100.0M");
        // 100M * 0.1273 = 12.73M
        assert_eq!(pair.usd, "12.7M");
    }

    #[test]
    fn degenerate_amounts_format_as_zero_pair() {
        let zero = format_currency_pair(0.0, "HSI");
        assert_eq!(zero.hkd, "0");
        assert_eq!(zero.usd, "0");

        let nan = format_currency_pair(f64::NAN, "HSI");
        assert_eq!(nan.hkd, "0");
        assert_eq!(nan.usd, "0");
    }

    #[test]
    fn every_default_index_code_rescales() {
        for code in INDEX_CODES {
            assert!(is_index_code(code));
            let pair = format_currency_pair(50_000_000.0, code);
            // 50M / 50 * 0.1273 = 127,300
            assert_eq!(pair.usd, "127.3K");
        }
        assert!(!is_index_code("00700"));
        assert!(!is_index_code("hsi"));
    }

    #[test]
    fn converter_override_changes_divisor_set() {
        let converter = CurrencyConverter {
            rate: 0.5,
            index_divisor: 10.0,
            index_codes: vec!["XYZ".to_string()],
        };
        assert_eq!(converter.pair(1_000_000.0, "XYZ").usd, "50.0K");
        assert_eq!(converter.pair(1_000_000.0, "HSI").usd, "500.0K");
    }

    #[test]
    fn diff_carries_sign_and_magnitude() {
        assert_eq!(format_diff(2_400_000.0), "+2.4M");
        assert_eq!(format_diff(-2_400_000.0), "-2.4M");
        assert_eq!(format_diff(1_500.0), "+1.5K");
        assert_eq!(format_diff(-42.26), "-42.3");
        assert_eq!(format_diff(0.0), "0.0");
        assert_eq!(format_diff(f64::NAN), "0");
    }

    #[test]
    fn numeric_codes_pad_to_five() {
        assert_eq!(format_underlying_code("700"), "00700");
        assert_eq!(format_underlying_code("9988"), "09988");
        assert_eq!(format_underlying_code("123456"), "123456");
        assert_eq!(format_underlying_code("HSI"), "HSI");
        assert_eq!(format_underlying_code("HSTECH"), "HSTECH");
    }

    #[test]
    fn priority_codes_sort_ahead_of_the_rest() {
        let codes: Vec<String> = ["00700", "HSCEI", "09988", "HSI"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let priority: Vec<String> = ["HSI", "HSCEI"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            sort_underlyings(&codes, &priority),
            vec!["HSI", "HSCEI", "00700", "09988"]
        );
    }
}
