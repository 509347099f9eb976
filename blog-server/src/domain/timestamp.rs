use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serializer;

use super::error::DomainError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 timestamp. Values without an offset are taken as UTC,
/// a bare date means midnight UTC.
pub(crate) fn parse_timestamp(
    field: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, DomainError> {
    let raw = raw.trim();

    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Ok(value.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(value.and_utc());
        }
    }

    if let Some(value) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(value.and_utc());
    }

    Err(DomainError::Validation {
        field,
        message: "must be an ISO-8601 timestamp",
    })
}

/// Postgres keeps microseconds, so everything is stored at that precision.
pub(crate) fn to_storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(6)
}

pub(crate) fn serialize_micros<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}
