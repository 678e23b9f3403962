//! Lenient numeric coercion for values typed into calculator forms.
//!
//! Form fields arrive as free text. Anything that does not start with a decimal
//! literal becomes 0 rather than an error, so a half-filled form still evaluates.

use serde::{Deserialize, Deserializer};

/// Parse the longest leading decimal literal, falling back to 0.
///
/// `"12.5k"` yields 12.5, `"  -3e2"` yields -300, `""`, `"abc"`, and overflowing
/// literals yield 0.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let end = numeric_prefix_len(trimmed.as_bytes());
    if end == 0 {
        return 0.0;
    }

    match trimmed[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Coerce to a non-negative whole count, truncating any fraction.
pub fn coerce_count(raw: &str) -> u32 {
    count_from(coerce_number(raw))
}

fn count_from(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        // saturating float-to-int cast
        value.trunc() as u32
    }
}

fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut index = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        index += 1;
    }

    let integer_start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    let mut digits = index - integer_start;

    if index < bytes.len() && bytes[index] == b'.' {
        let fraction_start = index + 1;
        let mut cursor = fraction_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        let fraction_digits = cursor - fraction_start;
        if digits + fraction_digits > 0 {
            index = cursor;
            digits += fraction_digits;
        }
    }

    if digits == 0 {
        return 0;
    }

    if index < bytes.len() && matches!(bytes[index], b'e' | b'E') {
        let mut cursor = index + 1;
        if cursor < bytes.len() && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            index = cursor;
        }
    }

    index
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn coerce(self) -> f64 {
        match self {
            RawNumber::Number(value) if value.is_finite() => value,
            RawNumber::Number(_) => 0.0,
            RawNumber::Text(text) => coerce_number(&text),
        }
    }
}

/// `deserialize_with` helper accepting a JSON number, a numeric string, or null.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.map(RawNumber::coerce).unwrap_or(0.0))
}

/// `deserialize_with` helper for whole counts such as citation totals.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.map(|value| count_from(value.coerce())).unwrap_or(0))
}

/// `deserialize_with` helper for a list of form values.
pub fn lenient_f64_list<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<RawNumber>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| value.map(RawNumber::coerce).unwrap_or(0.0))
        .collect())
}
