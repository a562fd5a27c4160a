//! Parsing helpers for paint configuration strings such as
//! `5,[1,0,0,0,1],[1,1,1,1,1],90`.

use crate::error::{JdrError, JdrResult};
use crate::handle::DoubleRange;

pub(crate) fn invalid(spec: &str, reason: impl Into<String>) -> JdrError {
    JdrError::InvalidConfig {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

/// Split off `n` comma-separated fields. The remainder follows the comma
/// after the last field, or is empty.
pub(crate) fn take_fields(spec: &str, n: usize) -> JdrResult<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(n);
    let mut rest = spec;
    for i in 0..n {
        match rest.find(',') {
            Some(pos) => {
                fields.push(rest[..pos].trim());
                rest = &rest[pos + 1..];
            }
            None if i + 1 == n && !rest.trim().is_empty() => {
                fields.push(rest.trim());
                rest = "";
            }
            None => {
                return Err(invalid(spec, format!("expected {n} fields, found {i}")));
            }
        }
    }
    Ok((fields, rest))
}

/// Split off a `[...]` group, returning its contents and the remainder
/// after the closing bracket and an optional comma.
pub(crate) fn take_bracketed(spec: &str) -> JdrResult<(&str, &str)> {
    let trimmed = spec.trim_start();
    if !trimmed.starts_with('[') {
        return Err(invalid(spec, "expected '['"));
    }
    let mut depth = 0usize;
    for (i, c) in trimmed.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &trimmed[1..i];
                    let after = &trimmed[i + 1..];
                    let after = after.strip_prefix(',').unwrap_or(after);
                    return Ok((inner, after));
                }
            }
            _ => {}
        }
    }
    Err(invalid(spec, "unbalanced '['"))
}

pub(crate) fn parse_double(spec: &str, field: &str, name: &str, range: DoubleRange) -> JdrResult<f64> {
    let value: f64 = field
        .parse()
        .map_err(|_| invalid(spec, format!("{name} '{field}' is not a number")))?;
    if range.contains(value) {
        Ok(value)
    } else {
        Err(invalid(spec, format!("{name} {value} out of range")))
    }
}

pub(crate) fn parse_int(spec: &str, field: &str, name: &str) -> JdrResult<i32> {
    field
        .parse()
        .map_err(|_| invalid(spec, format!("{name} '{field}' is not an integer")))
}
