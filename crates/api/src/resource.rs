use std::time::Instant;

use async_trait::async_trait;
use cffc_types::{CallOutcome, RemoteCall, RequestMethod, ResourceRequest};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ApiError, CffcClient};

/// Anything that can answer a [`ResourceRequest`] with JSON.
///
/// The production implementation is [`HttpResource`]; tests substitute a
/// scripted backend.
#[async_trait]
pub trait RemoteResource: Send + Sync {
    /// Executes one request and returns the decoded body. An empty body
    /// decodes to `Value::Null`.
    async fn execute(&self, request: &ResourceRequest) -> Result<Value, ApiError>;

    /// Executes a ticketed call and folds any failure into the outcome.
    async fn call(&self, call: RemoteCall) -> CallOutcome {
        match self.execute(&call.request).await {
            Ok(value) => CallOutcome::ok(call.ticket, value),
            Err(error) => CallOutcome::err(call.ticket, error.to_string()),
        }
    }
}

/// [`RemoteResource`] backed by the CFFC REST API.
#[derive(Debug, Clone)]
pub struct HttpResource {
    client: CffcClient,
}

impl HttpResource {
    pub fn new(client: CffcClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CffcClient {
        &self.client
    }
}

fn to_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Post => Method::POST,
        RequestMethod::Patch => Method::PATCH,
        RequestMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl RemoteResource for HttpResource {
    async fn execute(&self, request: &ResourceRequest) -> Result<Value, ApiError> {
        let start = Instant::now();
        let method = to_method(request.method);
        let path = request.path.as_str();
        debug!(
            method = %method,
            path = %path,
            has_body = request.body.is_some(),
            "http request started"
        );

        let mut builder = self.client.request(method.clone(), path);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|error| {
            warn!(
                method = %method,
                path = %path,
                error = %error,
                duration_ms = start.elapsed().as_millis(),
                "http request could not be sent"
            );
            ApiError::Transport(error)
        })?;

        let status = response.status();
        let body_text = response.text().await.map_err(ApiError::Transport)?;

        if !status.is_success() {
            warn!(
                method = %method,
                path = %path,
                status = %status,
                duration_ms = start.elapsed().as_millis(),
                "http request failed"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: failure_message(&body_text, status.canonical_reason()),
            });
        }

        if body_text.trim().is_empty() {
            debug!(
                method = %method,
                path = %path,
                status = %status,
                duration_ms = start.elapsed().as_millis(),
                "http request completed with empty response"
            );
            return Ok(Value::Null);
        }

        let parsed = serde_json::from_str::<Value>(&body_text).map_err(|error| {
            warn!(
                method = %method,
                path = %path,
                status = %status,
                body_len = body_text.len(),
                duration_ms = start.elapsed().as_millis(),
                error = %error,
                "http response JSON parse failed"
            );
            ApiError::Decode(error)
        })?;
        debug!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "http request completed"
        );
        Ok(parsed)
    }
}

/// Picks the most useful text out of a failed response body. The backend
/// answers errors as plain text or as `{"error": "..."}` / `{"message": "..."}`.
fn failure_message(body_text: &str, reason: Option<&str>) -> String {
    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("request failed").to_string();
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl RemoteResource for Failing {
        async fn execute(&self, _request: &ResourceRequest) -> Result<Value, ApiError> {
            Err(ApiError::Status {
                status: 404,
                body: "no such strain".into(),
            })
        }
    }

    struct Echo;

    #[async_trait]
    impl RemoteResource for Echo {
        async fn execute(&self, request: &ResourceRequest) -> Result<Value, ApiError> {
            Ok(request.body.clone().unwrap_or(Value::Null))
        }
    }

    #[tokio::test]
    async fn call_keeps_ticket_on_success() {
        let call = RemoteCall::new(ResourceRequest::post("/vendor", json!({"name": "Myco Supply"})));
        let ticket = call.ticket;
        let outcome = Echo.call(call).await;
        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.result, Ok(json!({"name": "Myco Supply"})));
    }

    #[tokio::test]
    async fn call_flattens_failures_to_text() {
        let call = RemoteCall::new(ResourceRequest::get("/strain/9"));
        let outcome = Failing.call(call).await;
        assert_eq!(outcome.result, Err("HTTP 404: no such strain".to_string()));
    }

    #[test]
    fn failure_message_prefers_error_field() {
        assert_eq!(failure_message(r#"{"error":"name required"}"#, Some("Bad Request")), "name required");
        assert_eq!(failure_message("  boom \n", None), "boom");
        assert_eq!(failure_message("", Some("Bad Request")), "Bad Request");
    }
}
