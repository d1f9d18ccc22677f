use thiserror::Error;

/// Failure modes of an HTTP request.
///
/// These stay inside the transport: the `Transport` trait logs them and
/// reports a falsy result instead.
#[derive(Debug, Error)]
pub enum TransportError {
  /// Connection refused, DNS failure, timeout, etc.
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  /// Path could not be joined onto the base URL.
  #[error("Invalid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// The backend answered with a non-2xx status.
  #[error("HTTP {status}: {body}")]
  Status { status: u16, body: String },

  /// The response body was not JSON.
  #[error("Failed to decode response body: {0}")]
  Decode(#[from] serde_json::Error),

  /// The bearer token could not be read from session storage.
  #[error("Session lookup failed: {0}")]
  Session(String),
}

impl TransportError {
  /// Returns `true` for a 404 answer.
  pub fn is_not_found(&self) -> bool {
    match self {
      Self::Status { status, .. } => *status == 404,
      Self::Http(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
      _ => false,
    }
  }
}
