//! Registered output formats and the selection policy.
//!
//! # Responsibilities
//! - Hold the formats one request's handling code registered
//! - Pick the format for the client's parsed `Accept` ranges
//!
//! # Design Decisions
//! - Selection is order-based: accepted ranges in header order against
//!   formats in registration order, exact `type/subtype` match; weights are
//!   carried but never re-rank
//! - No match falls back to the first registered format (a deliberate
//!   conservative default, not an error path)
//! - Producers are `FnOnce`, deferred until selection, run at most once

use std::fmt;

use crate::negotiation::accept::MediaRange;

/// One registered output format: a media type to match, the header value to
/// emit, and a deferred body producer.
pub struct Format {
    accept: String,
    content_type: String,
    producer: Box<dyn FnOnce() -> String + Send>,
}

impl Format {
    /// Register a producer under a canonical media type. The emitted
    /// `Content-Type` defaults to the accept string.
    pub fn new(
        accept: impl Into<String>,
        producer: impl FnOnce() -> String + Send + 'static,
    ) -> Self {
        let accept = accept.into().to_ascii_lowercase();
        Self {
            content_type: accept.clone(),
            accept,
            producer: Box::new(producer),
        }
    }

    /// Emit a different `Content-Type` than the matched accept string
    /// (e.g. match `application/json` but emit a charset-qualified value).
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = value.into();
        self
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    fn matches(&self, range: &MediaRange) -> bool {
        self.accept == range.essence()
    }

    /// Run the producer; selection is final once this happens.
    pub(crate) fn produce(self) -> (String, String) {
        (self.content_type, (self.producer)())
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("accept", &self.accept)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Per-request format set. The constructor takes the fallback format, so a
/// negotiator can always answer; `offer` appends further candidates in
/// registration order.
#[derive(Debug)]
pub struct Negotiator {
    formats: Vec<Format>,
}

impl Negotiator {
    pub fn new(fallback: Format) -> Self {
        Self {
            formats: vec![fallback],
        }
    }

    pub fn offer(mut self, format: Format) -> Self {
        self.formats.push(format);
        self
    }

    /// Select the format for the client's accepted ranges.
    ///
    /// Walks `accepted` in header order; the first registered format whose
    /// accept string exactly equals that range wins. Nothing matching (or an
    /// empty list, i.e. no/unparseable `Accept` header) selects the first
    /// registered format.
    pub fn select(mut self, accepted: &[MediaRange]) -> Format {
        for range in accepted {
            if let Some(position) = self.formats.iter().position(|f| f.matches(range)) {
                return self.formats.swap_remove(position);
            }
        }
        self.formats.remove(0)
    }
}
