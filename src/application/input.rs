//! Coercion of user-typed numbers
//!
//! Malformed numeric input is never an error: whatever cannot be read as a
//! number becomes zero.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
});

/// Read the leading number of `raw`, falling back to `0.0`.
///
/// Surrounding whitespace, a leading currency sign and thousands separators
/// are ignored, so `"$ 1,250.5"` reads as 1250.5. Trailing garbage is
/// dropped (`"12abc"` is 12); no leading number at all gives 0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .trim_start()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
