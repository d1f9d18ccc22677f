//! Typed decoding of transport bodies.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a single record. Bodies that are not a `T` are logged and dropped.
pub fn decode_item<T: DeserializeOwned>(path: &str, body: Value) -> Option<T> {
  match serde_json::from_value(body) {
    Ok(item) => Some(item),
    Err(e) => {
      warn!(path, error = %e, "response is not a valid record");
      None
    }
  }
}

/// Decode a list body row by row.
///
/// Rows that do not decode are logged and skipped; the rest keep their
/// order. A body that is not an array is not a list at all.
pub fn decode_list<T: DeserializeOwned>(path: &str, body: Value) -> Option<Vec<T>> {
  let Value::Array(rows) = body else {
    warn!(path, "expected a JSON array");
    return None;
  };

  let items = rows
    .into_iter()
    .enumerate()
    .filter_map(|(index, row)| match serde_json::from_value(row) {
      Ok(item) => Some(item),
      Err(e) => {
        warn!(path, index, error = %e, "skipping row that is not a valid record");
        None
      }
    })
    .collect();
  Some(items)
}
