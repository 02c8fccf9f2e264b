//! Flat action table: `(method, name)` bindings to handler functions.
//!
//! # Responsibilities
//! - Store actions in registration order
//! - Exact-key lookup (no wildcard or prefix matching here)
//! - Check declared parameters against bound request params
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Duplicate registration panics at definition time; dispatch never panics

use std::fmt;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::http::Params;
use crate::routing::dispatcher::Transaction;
use crate::routing::route::Method;

/// Handler function invoked once an action is resolved and bound.
pub type ActionFn =
    Arc<dyn Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync>;

/// One declared parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    name: String,
    required: bool,
}

impl ParamSpec {
    /// A parameter the request must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// A parameter with a declared default; may be omitted.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A named, method-scoped handler with its declared parameter shape.
#[derive(Clone)]
pub struct Action {
    method: Method,
    name: String,
    params: Vec<ParamSpec>,
    handler: ActionFn,
}

impl Action {
    pub fn new(
        method: Method,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            method,
            name: name.into(),
            params,
            handler: Arc::new(handler),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the request's params against the declared shape.
    ///
    /// Extra keys are ignored; a missing required parameter is a
    /// caller-visible error, never silently defaulted.
    pub fn bind(&self, params: &Params) -> Result<(), DispatchError> {
        for spec in &self.params {
            if spec.is_required() && !params.contains(spec.name()) {
                return Err(DispatchError::InvalidArguments {
                    action: self.name.clone(),
                    param: spec.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Bind and run the handler.
    pub fn invoke(&self, txn: &mut Transaction) -> Result<String, DispatchError> {
        self.bind(txn.params())?;
        (self.handler)(txn)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("method", &self.method)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Ordered action storage with exact `(method, name)` lookup.
///
/// Registration happens at definition time; once the owning application is
/// handed to a dispatcher only shared reads remain.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one binding. Panics on a duplicate `(method, name)` pair, a
    /// definition-time programming error.
    pub fn register(&mut self, action: Action) {
        assert!(
            self.lookup(action.method(), action.name()).is_none(),
            "duplicate action registration: {} {}",
            action.method(),
            action.name()
        );
        self.actions.push(action);
    }

    pub fn lookup(&self, method: Method, name: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|action| action.method() == method && action.name() == name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
