//! Shape checks for the homework status payload

use serde_json::Value;

use crate::error::{json_type_name, ShapeError};

pub const HOMEWORKS: &str = "homeworks";
pub const CURRENT_DATE: &str = "current_date";

/// Validate the payload and return its `homeworks` list unchanged.
///
/// Records inside the list are not inspected here.
pub fn check_response(response: &Value, require_current_date: bool) -> crate::Result<&Vec<Value>> {
    tracing::debug!("Checking API response shape");

    let object = response.as_object().ok_or(ShapeError::NotAnObject {
        found: json_type_name(response),
    })?;

    let mut missing = Vec::new();
    if !object.contains_key(HOMEWORKS) {
        missing.push(HOMEWORKS.to_string());
    }
    if require_current_date && !object.contains_key(CURRENT_DATE) {
        missing.push(CURRENT_DATE.to_string());
    }
    if !missing.is_empty() {
        return Err(ShapeError::MissingKeys { keys: missing }.into());
    }

    let homeworks = &object[HOMEWORKS];
    let list = homeworks.as_array().ok_or_else(|| ShapeError::WrongType {
        field: HOMEWORKS.to_string(),
        expected: "array",
        found: json_type_name(homeworks),
    })?;

    tracing::debug!("API response has {} homework record(s)", list.len());
    Ok(list)
}

/// The server-reported cursor, if the payload carries a usable one.
///
/// Fractional timestamps are truncated. Anything that is not a number is
/// ignored with a warning so the cursor stays where it is.
pub fn current_date(response: &Value) -> Option<i64> {
    match response.get(CURRENT_DATE) {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(date) => Some(date),
            None => match value.as_f64() {
                Some(date) if date.is_finite() => Some(date.trunc() as i64),
                _ => {
                    tracing::warn!(
                        "Ignoring {} of type {}: {}",
                        CURRENT_DATE,
                        json_type_name(value),
                        value
                    );
                    None
                }
            },
        },
    }
}
