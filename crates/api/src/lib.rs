//! CFFC backend client.
//!
//! This crate is the boundary between the admin client and the REST backend.
//! It focuses on:
//!
//! - Resolving the backend location and request timeout from the environment
//! - Validating the base URL before any request is issued
//! - Building requests with consistent `User-Agent` and `Accept` headers
//! - Executing one [`ResourceRequest`](cffc_types::ResourceRequest) and
//!   decoding the JSON answer ([`RemoteResource`])
//!
//! # Example
//!
//! ```ignore
//! use cffc_api::{ClientConfig, CffcClient, HttpResource, RemoteResource};
//! use cffc_types::ResourceRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cffc_api::ApiError> {
//!     let client = CffcClient::new(ClientConfig::from_env()?)?;
//!     let strains = HttpResource::new(client).execute(&ResourceRequest::get("/strains")).await?;
//!     println!("{strains}");
//!     Ok(())
//! }
//! ```

mod error;
mod resource;

use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url, header};
use tracing::{debug, warn};

pub use error::ApiError;
pub use resource::{HttpResource, RemoteResource};

/// Environment variable holding a complete base URL; wins over host/port.
pub const API_BASE_ENV: &str = "CFFC_API_BASE";
/// Environment variable holding the backend host.
pub const HOST_ENV: &str = "CFFC_HTTP_HOST";
/// Environment variable holding the backend port.
pub const PORT_ENV: &str = "CFFC_HTTP_PORT";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "CFFC_HTTP_TIMEOUT_SECS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hostnames that may be reached over plain HTTP without a warning.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "::1"];

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the environment.
    ///
    /// Resolution order for the base URL:
    /// - `CFFC_API_BASE`
    /// - `http://{CFFC_HTTP_HOST}:{CFFC_HTTP_PORT}`, each defaulting to the
    ///   backend's own defaults (`127.0.0.1`, `8080`)
    ///
    /// The timeout comes from `CFFC_HTTP_TIMEOUT_SECS` (default 30).
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = match env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => base.trim().to_string(),
            _ => {
                let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
                let port = match env::var(PORT_ENV) {
                    Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ApiError::InvalidConfig {
                        name: PORT_ENV,
                        value: raw.clone(),
                    })?,
                    Err(_) => DEFAULT_PORT,
                };
                format!("http://{}:{}", host.trim(), port)
            }
        };

        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => {
                let seconds = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|seconds| *seconds > 0)
                    .ok_or_else(|| ApiError::InvalidConfig {
                        name: TIMEOUT_ENV,
                        value: raw.clone(),
                    })?;
                Duration::from_secs(seconds)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, timeout })
    }

    /// Overrides the base URL, e.g. from a command line flag.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin wrapper around a configured `reqwest::Client`.
///
/// The client pre-configures default headers and a request timeout, and
/// builds requests against a validated base URL.
#[derive(Debug, Clone)]
pub struct CffcClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl CffcClient {
    /// Validates the configuration and builds the underlying HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("cffc-admin/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        debug!(%url, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - it must parse and carry a host
/// - the scheme must be `http` or `https`
/// - plain `http` to a non-loopback host is allowed but logged, since the
///   backend is commonly served on a LAN without TLS
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("missing host".to_string()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            if !LOOPBACK_HOSTS.iter().any(|allowed| host.eq_ignore_ascii_case(allowed)) {
                warn!(%host, "backend reached over plain http");
            }
            Ok(())
        }
        other => Err(invalid(format!("unsupported scheme '{other}://'"))),
    }
}
