//! Numeric cell normalization.
//!
//! Index composition exports carry weights and incomes as display strings
//! (`"$1,234"`, `"6.5%"`, `"(500)"`). These helpers turn such cells into
//! numbers without ever failing: anything unparseable becomes a missing value.

use regex::Regex;
use std::sync::LazyLock;

/// Accounting-style negative: `(123)` is `-123`.
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*)\)").expect("static pattern is valid"));

/// Characters stripped before parsing.
const FORMATTING_CHARS: [char; 3] = ['$', ',', '%'];

/// Normalize a formatted numeric cell.
///
/// Strips `$`, `,` and `%`, rewrites a parenthesized amount `(X)` to `-X`,
/// then parses what is left as `f64`. Returns `None` for empty, unparseable
/// or non-finite input.
///
/// # Examples
///
/// ```
/// use hobart_metrics::normalize_numeric_field;
///
/// assert_eq!(normalize_numeric_field("$1,234"), Some(1234.0));
/// assert_eq!(normalize_numeric_field("(500)"), Some(-500.0));
/// assert_eq!(normalize_numeric_field("12%"), Some(12.0));
/// assert_eq!(normalize_numeric_field("N/A"), None);
/// ```
pub fn normalize_numeric_field(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| !FORMATTING_CHARS.contains(c)).collect();
    let rewritten = PARENTHESIZED.replace(&stripped, "-$1");
    let candidate = rewritten.trim();

    if candidate.is_empty() {
        return None;
    }

    candidate.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize an optional cell, falling back to `0.0` when it is absent or
/// malformed.
pub fn numeric_or_zero(raw: Option<&str>) -> f64 {
    match raw.and_then(normalize_numeric_field) {
        Some(value) => value,
        None => {
            if let Some(cell) = raw.filter(|c| !c.trim().is_empty()) {
                tracing::debug!(cell, "unparseable numeric cell defaulted to 0");
            }
            0.0
        }
    }
}
