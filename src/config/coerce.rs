//! String to typed value coercion for configuration sources.
//!
//! Environment files and variables only carry strings; these helpers turn
//! them into the types declared on [`Settings`](crate::config::Settings).

use std::str::FromStr;

const TRUTHY: &[&str] = &["1", "true", "yes", "on", "y", "t"];
const FALSY: &[&str] = &["0", "false", "no", "off", "n", "f"];

/// Parse a boolean from the fixed truthy/falsy token set (case-insensitive).
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    let token = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        Ok(true)
    } else if FALSY.contains(&token.as_str()) {
        Ok(false)
    } else {
        Err(format!(
            "expected one of {} or {}",
            TRUTHY.join("/"),
            FALSY.join("/")
        ))
    }
}

/// Parse a list of strings.
///
/// Values starting with `[` must be a JSON array of strings. Anything else
/// is split on commas; entries are trimmed and empty entries dropped.
pub fn parse_list(raw: &str) -> Result<Vec<String>, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|e| format!("invalid JSON list: {}", e));
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse any `FromStr` value, trimming surrounding whitespace.
pub fn parse_value<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}
