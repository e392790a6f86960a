//! Second-precision ISO-8601 UTC timestamps (`2024-01-01T08:30:00Z`)

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(d)?;
  DateTime::parse_from_rfc3339(&raw)
    .map(|ts| ts.with_timezone(&Utc))
    .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

/// Current instant with the sub-second part dropped
pub fn now() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(0)
}

/// Sort key for a record created at `instant`
///
/// Builds of one run finish within the same second; shifting each by its
/// major keeps the newer runtime generation ahead of the older one.
pub fn stamp(instant: DateTime<Utc>, major: u64) -> DateTime<Utc> {
  i64::try_from(major)
    .ok()
    .and_then(TimeDelta::try_seconds)
    .and_then(|offset| instant.checked_add_signed(offset))
    .unwrap_or(instant)
}
