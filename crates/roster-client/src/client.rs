//! Async HTTP client for the upstream user list.

use std::time::Duration;

use reqwest::Client;
use roster_core::User;
use tracing::debug;

use crate::{
  error::{FetchError, Result},
  fetch::UserSource,
};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  DEFAULT_TIMEOUT,
    }
  }
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /users`
  pub async fn list_users(&self) -> Result<Vec<User>, FetchError> {
    let url = self.url("/users");
    debug!(%url, "fetching users");

    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status_code: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
      });
    }

    resp
      .json()
      .await
      .map_err(|e| FetchError::Decode(e.to_string()))
  }
}

impl UserSource for ApiClient {
  async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
    self.list_users().await
  }
}
