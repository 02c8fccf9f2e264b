//! Pattern-matching request router, dispatcher, and content negotiator.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  CROSSBAR                     │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ routing  │───▶│ action  │  │
//!                      │  │ adapter │    │ dispatch │    │ invoke  │  │
//!                      │  └─────────┘    └────┬─────┘    └────┬────┘  │
//!                      │                      │               │       │
//!                      │                      ▼               ▼       │
//!                      │               ┌────────────┐  ┌────────────┐ │
//!                      │               │ resources  │  │negotiation │ │
//!                      │               │ (recursive)│  │ (Accept)   │ │
//!                      │               └─────┬──────┘  └─────┬──────┘ │
//!                      │                     │               │        │
//!   Client Response    │  ┌─────────┐   ┌────▼──────────────▼─────┐  │
//!   ◀──────────────────┼──│response │◀──│ (status, headers, body) │  │
//!                      │  │ render  │   └─────────────────────────┘  │
//!                      │  └─────────┘                                 │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  config · observability · lifecycle      │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! The core is transport-blind: the `http::server` adapter feeds it a raw
//! request shape and renders the finalized triple; persistence sits behind
//! the `routing::Repository` trait. Registration happens once at definition
//! time; dispatch is synchronous and shares the frozen tables across
//! requests.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod negotiation;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use error::{DispatchError, UpstreamError};
pub use http::{HttpServer, ParamValue, Params, Request, Response};
pub use lifecycle::Shutdown;
pub use negotiation::{parse_accept, Format, MediaRange, Negotiator};
pub use routing::{
    App, Dispatcher, Method, ParamSpec, Record, Repository, Resource, Route, Transaction,
};
