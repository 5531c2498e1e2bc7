//! Shared rounding and currency-formatting rules.
//!
//! Every monetary figure the engine produces goes through one of the two
//! rounding functions here. `f64::round` rounds half away from zero, which
//! is the behavior all figures must agree on (no banker's rounding).

use serde::{Deserialize, Serialize};

/// Round to one decimal place: `round(x * 10) / 10`.
///
/// Used wherever an aggregate JPY figure is finalized.
pub fn round_to_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to whole yen. Used for single-holding display values.
pub fn round_to_integer(x: f64) -> f64 {
    x.round()
}

/// Rounding precision chosen by the caller at the valuation boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// One decimal place (aggregate paths)
    #[default]
    Tenth,
    /// Whole units (single-holding display paths)
    Integer,
}

impl Rounding {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Rounding::Tenth => round_to_tenth(x),
            Rounding::Integer => round_to_integer(x),
        }
    }
}

/// Format an amount for display.
///
/// - `JPY`: `¥1,234` (no fractional digits)
/// - `USD` / `EUR` / `GBP`: `$1,234.56`, `€…`, `£…`
/// - anything else: `"<CODE> 1,234.56"`
///
/// Negative amounts put the sign before the symbol (`-¥500`, `-$1.50`).
/// Non-finite amounts render as `NaN` or `∞` rather than a number.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let symbol = match code.as_str() {
        "JPY" => Some("¥"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    };

    let negative = amount < 0.0;
    let digits = if amount.is_nan() {
        "NaN".to_string()
    } else if amount.is_infinite() {
        "∞".to_string()
    } else if code == "JPY" {
        format_whole(amount.abs())
    } else {
        format_two_decimals(amount.abs())
    };

    // -0 after rounding is not negative
    let sign = if negative && (amount.is_infinite() || digits.chars().any(|c| matches!(c, '1'..='9'))) {
        "-"
    } else {
        ""
    };

    match symbol {
        Some(s) => format!("{sign}{s}{digits}"),
        None => format!("{code} {sign}{digits}"),
    }
}

fn format_whole(magnitude: f64) -> String {
    group_thousands(&format!("{:.0}", round_to_integer(magnitude)))
}

fn format_two_decimals(magnitude: f64) -> String {
    let cents = format!("{:03.0}", (magnitude * 100.0).round());
    let (units, fraction) = cents.split_at(cents.len() - 2);
    format!("{}.{fraction}", group_thousands(units))
}

fn group_thousands(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
