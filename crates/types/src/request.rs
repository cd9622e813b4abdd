//! Descriptors for a single request/response exchange with the backend.
//!
//! The engine never performs I/O itself. Table operations hand back a
//! [`RemoteCall`] describing what to send; the runtime executes it and feeds
//! the [`CallOutcome`] back carrying the same [`Ticket`], which is how the
//! originating table recognises (or discards) the answer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Allocates the next ticket. Tickets are never reused.
    pub fn next() -> Self {
        Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The subset of HTTP verbs the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Patch => "PATCH",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method, API-relative path and optional JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub method: RequestMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ResourceRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: RequestMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: RequestMethod::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Delete,
            path: path.into(),
            body: None,
        }
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A request tagged with the ticket its answer must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub ticket: Ticket,
    pub request: ResourceRequest,
}

impl RemoteCall {
    pub fn new(request: ResourceRequest) -> Self {
        Self {
            ticket: Ticket::next(),
            request,
        }
    }
}

/// The answer to a [`RemoteCall`]. Transport and status failures are
/// flattened into a display string; the engine only needs to know that the
/// exchange failed and what to tell the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub ticket: Ticket,
    pub result: Result<Value, String>,
}

impl CallOutcome {
    pub fn ok(ticket: Ticket, value: Value) -> Self {
        Self {
            ticket,
            result: Ok(value),
        }
    }

    pub fn err(ticket: Ticket, message: impl Into<String>) -> Self {
        Self {
            ticket,
            result: Err(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tickets_are_monotonic() {
        let first = Ticket::next();
        let second = Ticket::next();
        assert!(second > first);
    }

    #[test]
    fn remote_calls_get_distinct_tickets() {
        let a = RemoteCall::new(ResourceRequest::get("/strains"));
        let b = RemoteCall::new(ResourceRequest::get("/strains"));
        assert_ne!(a.ticket, b.ticket);
        assert_eq!(a.request, b.request);
    }

    #[test]
    fn request_display_names_method_and_path() {
        let request = ResourceRequest::patch("/vendor/42", json!({"name": "Fun Guys"}));
        assert_eq!(request.to_string(), "PATCH /vendor/42");
    }

    #[test]
    fn body_is_omitted_from_json_when_absent() {
        let encoded = serde_json::to_value(ResourceRequest::delete("/stage/1")).expect("encode");
        assert!(encoded.get("body").is_none());
        assert_eq!(encoded["method"], json!("Delete"));
    }
}
