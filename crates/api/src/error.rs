use thiserror::Error;

/// Failures surfaced by the backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid configuration value for {name}: '{value}'")]
    InvalidConfig { name: &'static str, value: String },

    #[error("could not build the HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("network error: {0}. Hint: check that the backend is running and reachable")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON in response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status code when the server answered with a failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
