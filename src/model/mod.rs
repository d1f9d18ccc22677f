//! Typed records for the project-management backend.
//!
//! Field names follow the backend's JSON (`Task_ID`, `Task_Title`, ...).
//! Fields the records don't model are kept in `extra` so a read-modify-write
//! cycle sends them back untouched. Text may arrive as null, ids as numeric
//! strings and dates in SQL or RFC 3339 form; all of them decode.

mod fields;
mod records;

pub use fields::Timestamp;
pub use records::{Backlog, Comment, Media, Organisation, Project, Task, Team, TimeEntry};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Re-serialize a value through JSON to convert between compatible types.
pub fn reserialize<T: DeserializeOwned>(value: impl Serialize) -> serde_json::Result<T> {
  serde_json::from_value(serde_json::to_value(value)?)
}

/// Overlay `fields` onto a record and decode the result.
pub fn apply_fields<T>(record: &T, fields: &Map<String, Value>) -> serde_json::Result<T>
where
  T: Serialize + DeserializeOwned,
{
  let mut object: Map<String, Value> = reserialize(record)?;
  for (key, value) in fields {
    object.insert(key.clone(), value.clone());
  }
  serde_json::from_value(Value::Object(object))
}
