//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Ctrl-C or Shutdown::trigger
//!     → server stops accepting
//!     → in-flight dispatches drain
//!     → run() returns
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
