//! Request context and the top-level dispatch entry point.
//!
//! # Data Flow
//! ```text
//! raw Request
//!     → Transaction (route computed once, response sink attached)
//!     → App::resolve (flat registry, then resources, first match wins)
//!     → Action/Resource runs (params bound, negotiation on demand)
//!     → sink finalized into (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - A dispatch is fully synchronous; nothing per-request outlives the call
//! - 404 and 422 are rendered here; upstream failures propagate to the
//!   caller, which owns their wire mapping

use std::cell::OnceCell;

use crate::error::DispatchError;
use crate::http::{Params, Request, Response, ResponseParts};
use crate::negotiation::accept::{parse_accept, MediaRange};
use crate::negotiation::format::Negotiator;
use crate::routing::app::App;
use crate::routing::route::Route;

/// One request paired with its derived route and response sink.
///
/// The route is computed at construction (once per request); the parsed
/// `Accept` ranges materialize on first use and are then cached for the
/// transaction's lifetime.
pub struct Transaction {
    request: Request,
    route: Route,
    accepted: OnceCell<Vec<MediaRange>>,
    response: ResponseParts,
}

impl Transaction {
    pub fn new(request: Request) -> Result<Self, DispatchError> {
        let route = Route::from_request(&request)?;
        Ok(Self {
            request,
            route,
            accepted: OnceCell::new(),
            response: ResponseParts::new(),
        })
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn params(&self) -> &Params {
        &self.request.params
    }

    /// Parsed `Accept` ranges, in header order. Absent or malformed headers
    /// read as an empty list.
    pub fn accepted(&self) -> &[MediaRange] {
        self.accepted
            .get_or_init(|| parse_accept(self.request.accept.as_deref().unwrap_or("")))
    }

    pub fn set_status(&mut self, status: u16) {
        self.response.set_status(status);
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response.set_header(name, value);
    }

    /// Negotiate a response format against this request's `Accept` ranges.
    ///
    /// The selected format's producer runs exactly once; its content type is
    /// written to the response headers and the produced body is returned for
    /// the action to hand back.
    pub fn negotiate(&mut self, negotiator: Negotiator) -> String {
        let format = negotiator.select(self.accepted());
        let (content_type, body) = format.produce();
        self.response.set_header("Content-Type", content_type);
        body
    }

    fn finish(self, body: String) -> Response {
        self.response.finalize(body)
    }
}

/// Top-level dispatch surface handed to the transport adapter.
///
/// Owns the frozen [`App`]: construction consumes the registration-time
/// value, so no further registration can happen once dispatching begins.
#[derive(Debug)]
pub struct Dispatcher {
    app: App,
}

impl Dispatcher {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// Route, bind, and invoke the matching action for one request.
    ///
    /// Unmatched routes render the fixed 404; a missing required parameter
    /// renders 422. Unsupported methods and upstream failures return `Err`
    /// for the caller to translate.
    pub fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let mut txn = Transaction::new(request)?;

        let Some(matched) = self.app.resolve(txn.route()) else {
            tracing::warn!(
                method = %txn.route().method(),
                path = %txn.request().path,
                "no route matched"
            );
            return Ok(Response::not_found());
        };

        tracing::debug!(
            method = %txn.route().method(),
            path = %txn.request().path,
            action = %matched.label(),
            "dispatching"
        );

        match matched.run(&mut txn) {
            Ok(body) => Ok(txn.finish(body)),
            Err(err @ DispatchError::InvalidArguments { .. }) => {
                tracing::warn!(error = %err, "rejecting request");
                Ok(Response::plain(422, err.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}
