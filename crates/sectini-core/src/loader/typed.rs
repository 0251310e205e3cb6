//! Coercion of raw string values to typed results.
//!
//! Every function takes the raw lookup result and a caller default.  Absent
//! or empty raw values always yield the default.
//!
//! # Malformed numbers
//!
//! Text that does not parse as a whole (`"12abc"`, `"fast"`) yields the
//! default rather than a partial or zero value.  For floats, results that are
//! not finite (`"NaN"`, `"inf"`) also yield the default, so callers never see
//! a NaN that came from a config file.
//!
//! # Booleans
//!
//! Only the exact text `"1"` is `true`.  Any other non-empty value, including
//! `"true"`, `"yes"` and `"0"`, is `false`.  This is deliberately narrow and
//! must not be widened: existing files rely on `flag=true` meaning off.

use std::str::FromStr;

/// Returns `raw` when it is present and non-empty.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.is_empty())
}

/// Raw string, or `default` when absent or empty.
pub fn coerce_string(raw: Option<&str>, default: &str) -> String {
    present(raw).unwrap_or(default).to_string()
}

/// Parses `raw` with [`FromStr`], falling back to `default` when absent,
/// empty, or unparsable.
pub fn coerce_parsed<T: FromStr>(raw: Option<&str>, default: T) -> T {
    present(raw)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Base-10 signed integer.
pub fn coerce_int(raw: Option<&str>, default: i64) -> i64 {
    coerce_parsed(raw, default)
}

/// Decimal floating point.  Non-finite results fall back to `default`.
pub fn coerce_float(raw: Option<&str>, default: f64) -> f64 {
    present(raw)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .unwrap_or(default)
}

/// `true` only for the exact text `"1"`; `default` when absent or empty.
pub fn coerce_bool(raw: Option<&str>, default: bool) -> bool {
    match present(raw) {
        Some(v) => v == "1",
        None => default,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
