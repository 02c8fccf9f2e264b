//! Error types shared across the dispatch core.

use thiserror::Error;

/// Errors surfaced by [`crate::routing::Dispatcher::dispatch`] and the
/// pieces it drives.
///
/// Structural mismatches are not errors: a clause that does not fire is a
/// normal "keep searching" signal, and an exhausted search renders a 404
/// response instead of returning `Err`. Only the variants below escape.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The raw request method is outside the closed GET/PUT/PATCH/POST/DELETE set.
    #[error("unsupported HTTP method `{0}`")]
    UnsupportedMethod(String),

    /// A resolved action declared a required parameter the request did not carry.
    #[error("action `{action}` is missing required parameter `{param}`")]
    InvalidArguments { action: String, param: String },

    /// The data-access collaborator failed; propagated untranslated to the
    /// caller of `dispatch`, which owns the wire mapping.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Failures reported by the external data-access collaborator.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// `find` was given an id with no backing record.
    #[error("record `{id}` not found")]
    Missing { id: String },

    /// Any other lookup or destroy failure.
    #[error("lookup failed: {reason}")]
    Failed { reason: String },
}
