//! HTTP surface of the dispatch core.
//!
//! # Data Flow
//! ```text
//! Inbound hyper request
//!     → server.rs (axum adapter: query/form params, host, Accept)
//!     → request.rs (raw request shape consumed by the core)
//!     → [routing layer resolves and invokes an action]
//!     → response.rs (write-once sink, finalized triple)
//!     → server.rs renders (status, headers, body) back to the wire
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{ParamValue, Params, Request};
pub use response::{Response, ResponseParts};
pub use server::HttpServer;
