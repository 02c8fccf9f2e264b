//! Response sink and the finalized wire triple.
//!
//! # Responsibilities
//! - Accumulate status and headers while an action runs
//! - Finalize exactly once into `(status, headers, body)`
//! - Default `Content-Type: text/plain` when nothing else was negotiated
//!
//! # Design Decisions
//! - `finalize` consumes the sink, so ownership enforces the
//!   finalized-exactly-once contract

use std::collections::BTreeMap;

/// The finalized `(status, headers, body)` triple handed back to the
/// transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Response {
    /// Plain-text response with the given status.
    pub fn plain(status: u16, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The fixed unmatched-route response.
    pub fn not_found() -> Self {
        Self::plain(404, "Not Found")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Per-request response state, mutated by at most one action and finalized
/// by the dispatcher.
#[derive(Debug)]
pub struct ResponseParts {
    status: u16,
    headers: BTreeMap<String, String>,
}

impl ResponseParts {
    pub(crate) fn new() -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
        }
    }

    /// Override the default 200 status.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Consume the sink, attach the body, and fill in the plain-text
    /// content type if negotiation never set one.
    pub(crate) fn finalize(mut self, body: String) -> Response {
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "text/plain".to_string());
        Response {
            status: self.status,
            headers: self.headers,
            body,
        }
    }
}
