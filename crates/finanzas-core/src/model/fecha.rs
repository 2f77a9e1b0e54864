//! Lenient date handling for backend timestamps.
//!
//! The backend emits `2024-03-01T10:15:00`, `2024-03-01T10:15:00.123Z`,
//! `2024-03-01T10:15:00+01:00` or a bare `2024-03-01`. All of them map to a
//! naive UTC timestamp. Serialization always uses [`FORMAT`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

/// Wire format used when sending dates
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse any of the accepted timestamp shapes
#[must_use]
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serialize a timestamp in [`FORMAT`]
///
/// # Errors
/// Propagates serializer failures.
pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(FORMAT).to_string())
}

/// Deserialize a timestamp in any accepted shape
///
/// # Errors
/// Fails on strings none of the formats accept.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("fecha inválida: {raw}")))
}

/// Same as the parent module for `Option<NaiveDateTime>`; `null` maps to `None`
pub mod option {
    use super::{parse, FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serialize an optional timestamp
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp
    ///
    /// # Errors
    /// Fails on strings none of the formats accept.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("fecha inválida: {raw}"))),
            None => Ok(None),
        }
    }
}
