//! Loose value coercions applied to request fields.
//!
//! Request bodies arrive as arbitrary JSON (or form strings). Presence is
//! judged by truthiness and numeric fields are read with integer-prefix
//! parsing, so `"20"`, `"20 years"` and `20.9` all become `20`. Input with no
//! integer prefix becomes `None`, which is stored and serialized as `null`.

use serde_json::Value;

/// Returns false for `null`, `false`, `0`, and `""`; true otherwise.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the field value if present and truthy.
pub fn truthy<'a>(fields: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| is_truthy(v))
}

/// Renders a value as text the way string concatenation would.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

/// Reads an integer from any JSON value.
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().and_then(parse_int_f64)
            }
        }
        other => parse_int_str(&to_text(other)),
    }
}

/// Reads the leading integer of a string.
///
/// Leading whitespace and a sign are accepted, as is a `0x` prefix for
/// hexadecimal. Parsing stops at the first non-digit. Values that do not fit
/// in an `i64` are treated as unparseable.
pub fn parse_int_str(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = if s.starts_with("0x") || s.starts_with("0X") {
        (16, &s[2..])
    } else {
        (10, s)
    };

    let digits: &str = {
        let end = s
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

fn parse_int_f64(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let abs = f.abs();
    // Very large and very small magnitudes render in exponent form, whose
    // integer prefix is the leading significant digit.
    if abs >= 1e21 || (abs != 0.0 && abs < 1e-6) {
        let leading = format!("{:e}", abs)
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(i64::from)?;
        return Some(if f < 0.0 { -leading } else { leading });
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}
