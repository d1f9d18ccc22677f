//! Field decoding that accepts the shapes the backend actually sends.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Date or date-time exactly as the backend sent it.
///
/// The raw value is written back unchanged, so a read-modify-write cycle
/// never reformats it. Parsing accepts RFC 3339, SQL `YYYY-MM-DD HH:MM:SS`
/// and bare dates; naive values are read as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Value);

impl Timestamp {
  pub fn raw(&self) -> &Value {
    &self.0
  }

  pub fn date_time(&self) -> Option<DateTime<Utc>> {
    let raw = self.0.as_str()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
      return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
      .iter()
      .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
      .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
          .ok()
          .and_then(|date| date.and_hms_opt(0, 0, 0))
      })
      .map(|naive| naive.and_utc())
  }

  pub fn date(&self) -> Option<NaiveDate> {
    self.date_time().map(|at| at.date_naive())
  }
}

impl From<DateTime<Utc>> for Timestamp {
  fn from(at: DateTime<Utc>) -> Self {
    Self(Value::String(at.to_rfc3339()))
  }
}

impl From<NaiveDate> for Timestamp {
  fn from(date: NaiveDate) -> Self {
    Self(Value::String(date.format("%Y-%m-%d").to_string()))
  }
}

/// Numeric id, also accepted as a numeric string. Null and "" mean unset.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(None),
    Value::Number(n) => n
      .as_u64()
      .map(Some)
      .ok_or_else(|| D::Error::custom(format!("invalid id {}", n))),
    Value::String(s) if s.trim().is_empty() => Ok(None),
    Value::String(s) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| D::Error::custom(format!("invalid id '{}'", s))),
    other => Err(D::Error::custom(format!("invalid id {}", other))),
  }
}

/// Free text; null is unset and scalars are kept as their text form.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(None),
    Value::String(s) => Ok(Some(s)),
    Value::Number(n) => Ok(Some(n.to_string())),
    Value::Bool(b) => Ok(Some(b.to_string())),
    other => Err(D::Error::custom(format!("expected text, got {}", other))),
  }
}
