//! Serde adapters for the datetime formats exchanged with the backend.
//!
//! Dates typed by users come from `datetime-local` inputs and carry no offset
//! (`2023-11-21T14:21`, seconds optional). Server-side timestamps are RFC 3339,
//! but older records were stored without an offset and are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const LOCAL_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a wall-clock datetime with or without seconds.
pub fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

/// Parse an RFC 3339 timestamp, falling back to an offset-less one taken as UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_local(raw).map(|naive| naive.and_utc()))
}

/// `NaiveDateTime` fields entered by a user.
pub mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(super::LOCAL_OUTPUT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_local(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid local datetime '{}'", raw)))
    }
}

/// Optional variant of [`local_datetime`]; empty strings read as `None`.
pub mod local_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::local_datetime::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_local(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid local datetime '{}'", raw))),
        }
    }
}

/// Server-assigned UTC timestamps.
pub mod utc_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
