use std::time::Duration;

use crate::error::ClientError;

/// Connection settings for the studio REST API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `https://studio.example.com/api`.
    pub base_url: String,
    /// Bearer token sent on every request, when present.
    pub api_token: Option<String>,
    /// Per-request timeout (default: `60` seconds).
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `STUDIO_API_URL`       | `http://localhost:3000`  |
    /// | `STUDIO_API_TOKEN`     | unset                    |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                     |
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("STUDIO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let api_token = std::env::var("STUDIO_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| {
                ClientError::Config("REQUEST_TIMEOUT_SECS must be a valid u64".to_string())
            })?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
