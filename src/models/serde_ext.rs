//! Serde helpers for loosely filled fields: form inputs, query strings and documents written by
//! the browser app, where "nothing selected" arrives as an empty string.

use serde::de::{Deserialize, Deserializer, Error};
use std::fmt::Display;
use std::str::FromStr;

/// Missing, null, or blank (after trimming) becomes None; anything else is parsed.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map(Some).map_err(D::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Like [`empty_as_none`], falling back to `T::default()`.
pub fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    Ok(empty_as_none(deserializer)?.unwrap_or_default())
}
