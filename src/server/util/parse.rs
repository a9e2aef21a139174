use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::str::FromStr;

use crate::server::error::{internal::InternalError, AppError};

/// Returns the trimmed value unless the client sent a placeholder for "nothing".
///
/// Frontends serialize missing values as `""`, `"null"` or `"undefined"`; all three are
/// treated as absent.
///
/// # Arguments
/// - `value` - Raw query or body value
///
/// # Returns
/// - `Some(String)` - Meaningful value
/// - `None` - Value missing or a placeholder
pub fn present(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        match trimmed {
            "" | "null" | "undefined" => None,
            _ => Some(trimmed.to_string()),
        }
    })
}

/// Builds a `LIKE` pattern matching `search` anywhere in a column.
///
/// Wildcards in `search` are escaped with a backslash, which the query must declare as
/// its `ESCAPE` character.
pub fn like_contains(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Parses a positive number, ignoring placeholders and garbage.
pub fn number(value: Option<String>) -> Option<u64> {
    present(value).and_then(|v| v.parse::<u64>().ok())
}

/// Parses `"true"` / `"false"`, ignoring anything else.
pub fn boolean(value: Option<String>) -> Option<bool> {
    present(value).and_then(|v| v.parse::<bool>().ok())
}

/// Parses an optional enum value from client input.
///
/// # Arguments
/// - `value` - Raw value
/// - `error` - Message returned when a value is present but unknown
///
/// # Returns
/// - `Ok(Some(T))` - Parsed value
/// - `Ok(None)` - No value given
/// - `Err(AppError::BadRequest)` - Value present but not a known variant
pub fn variant<T: FromStr>(value: Option<String>, error: &str) -> Result<Option<T>, AppError> {
    match present(value) {
        Some(v) => T::from_str(&v)
            .map(Some)
            .map_err(|_| AppError::bad_request(error)),
        None => Ok(None),
    }
}

/// Parses a date sent by a client.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` without offset (read as UTC)
/// and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn date(value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| AppError::bad_request("Invalid date"))
}

/// Parses an enum column read from the database.
///
/// # Arguments
/// - `column` - Table and column name, for the error message
/// - `value` - Stored string
///
/// # Returns
/// - `Ok(T)` - Parsed value
/// - `Err(InternalError::InvalidStoredValue)` - Stored data does not match any variant
pub fn stored<T: FromStr>(column: &'static str, value: &str) -> Result<T, InternalError> {
    T::from_str(value).map_err(|_| InternalError::InvalidStoredValue {
        column,
        value: value.to_string(),
    })
}
