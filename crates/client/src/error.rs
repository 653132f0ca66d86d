use atelier_core::services::ServiceError;

/// Errors raised while setting up the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Map a transport-level `reqwest` failure onto the collaborator error.
///
/// Body decode failures become [`ServiceError::Decode`]; everything else
/// (connect, timeout, TLS, redirect loops) is a transport failure.
pub(crate) fn from_reqwest(err: reqwest::Error) -> ServiceError {
    if err.is_decode() {
        ServiceError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        ServiceError::Status {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        ServiceError::Transport(err.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// The studio API answers with `{"error": "..."}` or `{"message": "..."}`;
/// anything else is passed through as raw text.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error").or_else(|| v.get("message")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "<empty body>".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
