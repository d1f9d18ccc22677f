use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::TransportError;
use super::transport::Transport;
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// REST transport backed by reqwest.
///
/// Every request carries the bearer token currently held by the session
/// store, so a token change is picked up without rebuilding the transport.
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  base_url: Url,
  session: Arc<dyn SessionStore>,
}

impl HttpTransport {
  pub fn new(config: &ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")))
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self::with_client(client, config.base_url()?, session))
  }

  /// Build a transport around an existing reqwest client.
  pub fn with_client(client: reqwest::Client, base_url: Url, session: Arc<dyn SessionStore>) -> Self {
    Self {
      client,
      base_url,
      session,
    }
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Issue a request and decode the JSON answer.
  ///
  /// Empty 2xx bodies decode to `Value::Null`.
  pub async fn request(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> std::result::Result<Value, TransportError> {
    let url = self.base_url.join(path.trim_start_matches('/'))?;
    debug!(%method, %url, "api request");

    let mut request = self.client.request(method, url);

    let token = self
      .session
      .token()
      .map_err(|e| TransportError::Session(e.to_string()))?;
    if let Some(token) = token {
      request = request.bearer_auth(token);
    }

    if let Some(body) = body {
      request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
      return Err(TransportError::Status {
        status: status.as_u16(),
        body: text,
      });
    }

    if text.trim().is_empty() {
      return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&text)?)
  }

  async fn request_or_log(&self, method: Method, path: &str, body: Option<&Value>) -> Option<Value> {
    match self.request(method.clone(), path, body).await {
      Ok(value) => Some(value),
      Err(e) if e.is_not_found() => {
        debug!(%method, path, "not found");
        None
      }
      Err(e) => {
        warn!(%method, path, error = %e, "api request failed");
        None
      }
    }
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get(&self, path: &str) -> Option<Value> {
    self.request_or_log(Method::GET, path, None).await
  }

  async fn post(&self, path: &str, body: &Value) -> Option<Value> {
    self.request_or_log(Method::POST, path, Some(body)).await
  }

  async fn put(&self, path: &str, body: &Value) -> Option<Value> {
    self.request_or_log(Method::PUT, path, Some(body)).await
  }

  async fn delete(&self, path: &str) -> bool {
    self.request_or_log(Method::DELETE, path, None).await.is_some()
  }
}
