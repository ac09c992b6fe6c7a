//! Helpers for reading typed settings out of the process environment.
//!
//! Every reader takes a lookup closure instead of touching `std::env`
//! directly so configuration can be built from a plain map in tests.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// An environment setting whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct InvalidSetting {
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl InvalidSetting {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Read a variable from the process environment. Blank values count as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Read and parse a setting, returning `None` when it is absent.
pub fn parsed<T, L>(lookup: &L, key: &str) -> Result<Option<T>, InvalidSetting>
where
    T: FromStr,
    T::Err: Display,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| InvalidSetting::new(key, raw, e.to_string())),
        None => Ok(None),
    }
}

/// Read a duration expressed in whole milliseconds.
pub fn millis<L>(lookup: &L, key: &str) -> Result<Option<Duration>, InvalidSetting>
where
    L: Fn(&str) -> Option<String>,
{
    Ok(parsed::<u64, L>(lookup, key)?.map(Duration::from_millis))
}

/// Read a boolean flag (`true`/`false`, case-insensitive).
pub fn flag<L>(lookup: &L, key: &str) -> Result<Option<bool>, InvalidSetting>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(InvalidSetting::new(key, raw, "expected true or false")),
        },
        None => Ok(None),
    }
}

/// Parse a `key=value,key2=value2` list, as used by the OTLP header and
/// resource attribute variables.
pub fn key_value_list<L>(lookup: &L, key: &str) -> Result<Vec<(String, String)>, InvalidSetting>
where
    L: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
            _ => Err(InvalidSetting::new(key, raw.clone(), format!("malformed pair {pair:?}"))),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn map_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}
