//! Resource controllers: collection and member routing over a data scope.
//!
//! # Responsibilities
//! - Match `[collection]` and `[collection, id, ...tail]` path shapes
//! - Re-dispatch member tails against show/edit/destroy, custom member
//!   actions, and nested child resources
//! - Drive the external data-access collaborator for the built-in actions
//!
//! # Design Decisions
//! - Clauses are an explicit ordered list; first structural match wins and
//!   the order is never re-ranked
//! - Ids bind positionally with no validation; a bad id surfaces from the
//!   data scope as an upstream error, not from routing
//! - No clause firing is a plain `None`, which the dispatcher turns into
//!   404 only once every candidate is exhausted

use std::fmt;
use std::sync::Arc;

use crate::error::{DispatchError, UpstreamError};
use crate::routing::dispatcher::Transaction;
use crate::routing::route::{Method, Route};

/// One record handed back by a data scope.
pub trait Record: Send + Sync {
    /// Body text for this record.
    fn render(&self) -> String;

    /// Remove the record from its scope.
    fn destroy(&self) -> Result<(), UpstreamError>;
}

/// The external data-access collaborator a resource is wired over.
///
/// Existence checking belongs here: routing accepts any id string and
/// propagates whatever this trait reports.
pub trait Repository: Send + Sync {
    fn find(&self, id: &str) -> Result<Box<dyn Record>, UpstreamError>;
    fn all(&self) -> Result<Vec<Box<dyn Record>>, UpstreamError>;
}

/// Handler for a custom member action, invoked with the resource's scope
/// and the positional id.
pub type MemberFn = Arc<
    dyn Fn(&dyn Repository, &str, &mut Transaction) -> Result<String, DispatchError>
        + Send
        + Sync,
>;

struct MemberAction {
    method: Method,
    name: String,
    handler: MemberFn,
}

impl fmt::Debug for MemberAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAction")
            .field("method", &self.method)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The resolved clause for one request, produced by matching and consumed
/// by [`Resource::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceMatch {
    Index,
    Show { id: String },
    Edit { id: String },
    Destroy { id: String },
    Custom { id: String, action: usize },
    Nested { id: String, child: usize, inner: Box<ResourceMatch> },
}

impl ResourceMatch {
    /// Short clause name for log labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceMatch::Index => "index",
            ResourceMatch::Show { .. } => "show",
            ResourceMatch::Edit { .. } => "edit",
            ResourceMatch::Destroy { .. } => "destroy",
            ResourceMatch::Custom { .. } => "member",
            ResourceMatch::Nested { inner, .. } => inner.kind(),
        }
    }
}

/// A collection (index) plus per-member actions over a data scope, with
/// optional nested child resources under each member.
pub struct Resource {
    path: String,
    scope: Arc<dyn Repository>,
    members: Vec<MemberAction>,
    nested: Vec<Resource>,
}

impl Resource {
    pub fn new(path: impl Into<String>, scope: Arc<dyn Repository>) -> Self {
        Self {
            path: path.into(),
            scope,
            members: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Register a custom member action, matched against the first tail
    /// segment after the built-in show/edit/destroy clauses.
    pub fn member_action(
        mut self,
        method: Method,
        name: impl Into<String>,
        handler: impl Fn(&dyn Repository, &str, &mut Transaction) -> Result<String, DispatchError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.members.push(MemberAction {
            method,
            name: name.into(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Mount a child resource under this resource's members.
    pub fn nest(mut self, child: Resource) -> Self {
        self.nested.push(child);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Structural match against a full route.
    pub fn matches(&self, route: &Route) -> Option<ResourceMatch> {
        self.match_segments(route.path_segments(), route.method())
    }

    /// Clause walk over the remaining path segments, in fixed order:
    /// exact collection first, then member-with-tail.
    fn match_segments(&self, segments: &[String], method: Method) -> Option<ResourceMatch> {
        if segments.len() == 1 && segments[0] == self.path && method == Method::Get {
            return Some(ResourceMatch::Index);
        }
        if segments.len() >= 2 && segments[0] == self.path {
            return self.match_member(&segments[1], &segments[2..], method);
        }
        None
    }

    /// Member clauses, evaluated against `[id, ...tail]`. Built-ins first,
    /// then custom member actions, then nested resources; segments past a
    /// matched action name are accepted.
    fn match_member(&self, id: &str, tail: &[String], method: Method) -> Option<ResourceMatch> {
        match (tail.first().map(String::as_str), method) {
            (None, Method::Get) => return Some(ResourceMatch::Show { id: id.to_string() }),
            (Some("edit"), Method::Get) => {
                return Some(ResourceMatch::Edit { id: id.to_string() })
            }
            (None, Method::Delete) => {
                return Some(ResourceMatch::Destroy { id: id.to_string() })
            }
            _ => {}
        }

        if let Some(first) = tail.first() {
            if let Some(action) = self
                .members
                .iter()
                .position(|a| a.method == method && a.name == *first)
            {
                return Some(ResourceMatch::Custom {
                    id: id.to_string(),
                    action,
                });
            }
            for (child, resource) in self.nested.iter().enumerate() {
                if let Some(inner) = resource.match_segments(tail, method) {
                    return Some(ResourceMatch::Nested {
                        id: id.to_string(),
                        child,
                        inner: Box::new(inner),
                    });
                }
            }
        }

        None
    }

    /// Run the resolved clause. Upstream failures propagate untranslated.
    pub fn run(
        &self,
        matched: ResourceMatch,
        txn: &mut Transaction,
    ) -> Result<String, DispatchError> {
        match matched {
            ResourceMatch::Index => {
                let records = self.scope.all()?;
                Ok(records
                    .iter()
                    .map(|record| record.render())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            ResourceMatch::Show { id } => Ok(self.scope.find(&id)?.render()),
            ResourceMatch::Edit { id } => {
                let record = self.scope.find(&id)?;
                Ok(format!("Editing {}", record.render()))
            }
            ResourceMatch::Destroy { id } => {
                let record = self.scope.find(&id)?;
                record.destroy()?;
                tracing::debug!(resource = %self.path, id = %id, "record destroyed");
                Ok(format!("Destroyed {id}"))
            }
            ResourceMatch::Custom { id, action } => {
                let action = &self.members[action];
                (action.handler)(self.scope.as_ref(), &id, txn)
            }
            ResourceMatch::Nested { child, inner, .. } => self.nested[child].run(*inner, txn),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("members", &self.members)
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}
