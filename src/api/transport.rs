//! Call/return contract between resource adapters and the network.

use async_trait::async_trait;
use serde_json::Value;

/// Authenticated JSON transport.
///
/// Paths are relative to the API base URL (e.g., `backlogs/42/tasks`).
/// Failures never propagate: reads and writes report `None`, deletes `false`.
/// A successful response without a body is `Some(Value::Null)`.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get(&self, path: &str) -> Option<Value>;

  async fn post(&self, path: &str, body: &Value) -> Option<Value>;

  async fn put(&self, path: &str, body: &Value) -> Option<Value>;

  async fn delete(&self, path: &str) -> bool;
}
