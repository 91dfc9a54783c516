//! Numeric value, error and unit extraction from raw strings.
//!
//! Interpretation functions receive values the way they were written:
//! `"89-91"`, `"150±5"`, `"100°C"`. These helpers split such strings into
//! the parsed numeric form the serialized record retains alongside the raw
//! text. Dimensional analysis is out of scope; the unit is kept verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Quantity;

/// Leading numeric part (value, range or value-with-error) and trailing unit.
static VALUE_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<value>[+-]?\d+(?:\.\d+)?(?:\s*(?:[-–—]|to)\s*[+-]?\d+(?:\.\d+)?)?(?:\s*±\s*\d+(?:\.\d+)?)?)\s*(?P<unit>[^\s\d].*)?$")
        .expect("value/unit pattern is valid")
});

/// A numeric range written with a dash or the word "to".
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<low>[+-]?\d+(?:\.\d+)?)\s*(?:[-–—]|to)\s*(?P<high>[+-]?\d+(?:\.\d+)?)$")
        .expect("range pattern is valid")
});

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?\d+(?:\.\d+)?").expect("number pattern is valid"));

/// Extract the numeric values from a string: one element for a single value,
/// two for a range.
///
/// ```ignore
/// assert_eq!(extract_values("89-91"), vec![89.0, 91.0]);
/// assert_eq!(extract_values("150±5"), vec![150.0]);
/// ```
pub fn extract_values(raw: &str) -> Vec<f64> {
    let value_part = strip_error(raw);
    if let Some(caps) = RANGE_RE.captures(value_part.trim()) {
        let low = caps["low"].parse::<f64>();
        let high = caps["high"].parse::<f64>();
        if let (Ok(low), Ok(high)) = (low, high) {
            return vec![low, high];
        }
    }
    NUMBER_RE
        .find_iter(value_part)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .take(1)
        .collect()
}

/// Extract the error term from a string like `"150±5"`.
pub fn extract_error(raw: &str) -> Option<f64> {
    let (_, error) = raw.split_once('±')?;
    NUMBER_RE
        .find(error)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn strip_error(raw: &str) -> &str {
    match raw.split_once('±') {
        Some((value, _)) => value,
        None => raw,
    }
}

/// Split a raw string into its numeric part and trailing unit text.
///
/// Returns `None` when the string does not start with a number.
pub fn split_value_unit(raw: &str) -> Option<(&str, Option<&str>)> {
    let caps = VALUE_UNIT_RE.captures(raw)?;
    let value = caps.name("value")?;
    let unit = caps.name("unit").map(|m| m.as_str().trim());
    // Offsets of `value` are within `raw`, so reborrow from the input.
    Some((
        &raw[value.start()..value.end()],
        unit.filter(|u| !u.is_empty()),
    ))
}

/// Parse a raw value string into a [`Quantity`], keeping the raw form.
///
/// Returns `None` when no numeric value can be read — interpretation
/// functions treat that as a semantically implausible match and yield
/// nothing.
pub fn parse_quantity(raw: &str) -> Option<Quantity> {
    let (value_part, unit) = split_value_unit(raw)?;
    let values = extract_values(value_part);
    if values.is_empty() {
        return None;
    }
    Some(Quantity {
        raw: raw.trim().to_string(),
        values,
        error: extract_error(value_part),
        unit: unit.map(str::to_string),
    })
}
