//! Routing subsystem: structural matching and dispatch.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, host, params)
//!     → route.rs (derive the structural descriptor)
//!     → app.rs (ordered resolution: flat registry, then resources)
//!     → registry.rs (exact (method, name) lookup, parameter binding)
//!     → resource.rs (recursive collection/member clause walk)
//!     → dispatcher.rs (invoke, finalize the response)
//! ```
//!
//! # Design Decisions
//! - Tables are frozen before the first dispatch; dispatch reads are
//!   lock-free and shareable
//! - First structural match wins; clause order is fixed, never re-ranked
//! - No clause firing is a signal, not an error; it becomes 404 only at
//!   the top level

pub mod app;
pub mod dispatcher;
pub mod registry;
pub mod resource;
pub mod route;

pub use app::{App, Matched};
pub use dispatcher::{Dispatcher, Transaction};
pub use registry::{Action, ActionRegistry, ParamSpec};
pub use resource::{Record, Repository, Resource, ResourceMatch};
pub use route::{Method, Route};
