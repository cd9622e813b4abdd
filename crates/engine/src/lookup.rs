//! Read-through cache for the option lists choice cells draw from.
//!
//! Entries are keyed by resource name (`vendors`, `eventtypes`, ...). A
//! section invalidates and re-fetches the lists it needs when it becomes
//! active, so rows are never built against options that are missing.

use std::collections::HashMap;

use cffc_types::{CallOutcome, RemoteCall, ResourceRequest, Ticket};
use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::scalar_text;

/// One selectable option.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: String,
    pub label: String,
    /// The full record the option was built from.
    pub record: Value,
}

impl Choice {
    /// An option whose id and label are the same literal, such as a fixed
    /// substrate type.
    pub fn literal(text: &str) -> Self {
        Self {
            id: text.to_string(),
            label: text.to_string(),
            record: Value::String(text.to_string()),
        }
    }
}

/// Where an option list comes from and how its entries are labelled.
#[derive(Debug, Clone, Copy)]
pub struct LookupSource {
    pub name: &'static str,
    pub path: &'static str,
    pub label: fn(&Value) -> String,
}

impl LookupSource {
    pub fn choice(&self, record: &Value) -> Choice {
        match record {
            Value::String(text) => Choice::literal(text),
            _ => Choice {
                id: record.get("id").map(scalar_text).unwrap_or_default(),
                label: (self.label)(record),
                record: record.clone(),
            },
        }
    }
}

fn name_or_id(record: &Value) -> String {
    let name = record.get("name").map(scalar_text).unwrap_or_default();
    if name.is_empty() {
        record.get("id").map(scalar_text).unwrap_or_default()
    } else {
        name
    }
}

fn substrate_label(record: &Value) -> String {
    let vendor = record.pointer("/vendor/name").map(scalar_text).unwrap_or_default();
    format!("{} | Vendor: {}", name_or_id(record), vendor)
}

pub const VENDORS: LookupSource = LookupSource {
    name: "vendors",
    path: "/vendors",
    label: name_or_id,
};

pub const INGREDIENTS: LookupSource = LookupSource {
    name: "ingredients",
    path: "/ingredients",
    label: name_or_id,
};

pub const EVENT_TYPES: LookupSource = LookupSource {
    name: "eventtypes",
    path: "/eventtypes",
    label: name_or_id,
};

pub const SUBSTRATES: LookupSource = LookupSource {
    name: "substrates",
    path: "/substrates",
    label: substrate_label,
};

pub const STRAINS: LookupSource = LookupSource {
    name: "strains",
    path: "/strains",
    label: name_or_id,
};

pub const STRAIN_ATTRIBUTE_NAMES: LookupSource = LookupSource {
    name: "strainattributenames",
    path: "/strainattributenames",
    label: name_or_id,
};

/// How a lookup fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Loaded,
    Failed,
    /// A newer fetch for the same list was issued; the answer was dropped.
    Superseded,
}

/// A lookup fetch that finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupResolved {
    pub name: &'static str,
    pub status: LookupStatus,
}

#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<&'static str, Vec<Choice>>,
    in_flight: HashMap<Ticket, LookupSource>,
    /// The most recent outstanding fetch per list.
    latest: HashMap<&'static str, Ticket>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for `name`, empty when the list is not loaded.
    pub fn get(&self, name: &str) -> &[Choice] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn invalidate(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// Replaces the options for `source` with choices built from `records`.
    pub fn store(&mut self, source: &LookupSource, records: &[Value]) {
        let choices = records.iter().map(|record| source.choice(record)).collect();
        self.entries.insert(source.name, choices);
    }

    /// Drops the cached list and issues a fetch for it.
    pub fn fetch(&mut self, source: LookupSource) -> RemoteCall {
        self.invalidate(source.name);
        let call = RemoteCall::new(ResourceRequest::get(source.path));
        debug!(lookup = source.name, ticket = %call.ticket, "lookup fetch issued");
        self.in_flight.insert(call.ticket, source);
        self.latest.insert(source.name, call.ticket);
        call
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        self.in_flight.contains_key(&ticket)
    }

    /// Applies a fetch result. Returns `None` when the ticket is not a
    /// lookup fetch. A failed fetch leaves the list empty; an answer to a
    /// fetch that a newer one replaced is dropped.
    pub fn complete(&mut self, outcome: &CallOutcome) -> Option<LookupResolved> {
        let source = self.in_flight.remove(&outcome.ticket)?;
        if self.latest.get(source.name) != Some(&outcome.ticket) {
            debug!(lookup = source.name, ticket = %outcome.ticket, "discarding superseded lookup response");
            return Some(LookupResolved {
                name: source.name,
                status: LookupStatus::Superseded,
            });
        }
        self.latest.remove(source.name);
        let status = match &outcome.result {
            Ok(Value::Array(records)) => {
                self.store(&source, records);
                LookupStatus::Loaded
            }
            Ok(Value::Null) => {
                self.store(&source, &[]);
                LookupStatus::Loaded
            }
            Ok(other) => {
                warn!(lookup = source.name, kind = %json_kind(other), "lookup response is not a list");
                self.store(&source, &[]);
                LookupStatus::Failed
            }
            Err(error) => {
                warn!(lookup = source.name, error = %error, "lookup fetch failed");
                LookupStatus::Failed
            }
        };
        Some(LookupResolved {
            name: source.name,
            status,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
