//! Application container: flat actions plus mounted resources.
//!
//! # Responsibilities
//! - Registration surface used at definition time
//! - Ordered resolution at dispatch time: flat registry first, then
//!   resources in mount order
//!
//! # Design Decisions
//! - Registration needs `&mut App`; `Dispatcher::new` takes the `App` by
//!   value, so the table is frozen before the first dispatch by ownership

use crate::error::DispatchError;
use crate::routing::dispatcher::Transaction;
use crate::routing::registry::{Action, ActionRegistry, ParamSpec};
use crate::routing::resource::{Resource, ResourceMatch};
use crate::routing::route::{Method, Route};

/// One application's routing table.
#[derive(Debug, Default)]
pub struct App {
    registry: ActionRegistry,
    resources: Vec<Resource>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one flat action.
    pub fn action(
        &mut self,
        method: Method,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.registry.register(Action::new(method, name, params, handler));
        self
    }

    pub fn get(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.action(Method::Get, name, params, handler)
    }

    pub fn put(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.action(Method::Put, name, params, handler)
    }

    pub fn patch(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.action(Method::Patch, name, params, handler)
    }

    pub fn post(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.action(Method::Post, name, params, handler)
    }

    pub fn delete(
        &mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl Fn(&mut Transaction) -> Result<String, DispatchError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.action(Method::Delete, name, params, handler)
    }

    /// Mount a resource controller.
    pub fn resource(&mut self, resource: Resource) -> &mut Self {
        self.resources.push(resource);
        self
    }

    /// Resolve the first structural match for a route: exact registry
    /// lookup on `(method, first segment)`, then each mounted resource's
    /// clause walk, in mount order.
    pub fn resolve<'a>(&'a self, route: &Route) -> Option<Matched<'a>> {
        if let Some(name) = route.first_segment() {
            if let Some(action) = self.registry.lookup(route.method(), name) {
                return Some(Matched::Flat(action));
            }
        }
        for resource in &self.resources {
            if let Some(matched) = resource.matches(route) {
                return Some(Matched::Resource(resource, matched));
            }
        }
        None
    }
}

/// A resolved routing target, ready to run against a transaction.
#[derive(Debug)]
pub enum Matched<'a> {
    Flat(&'a Action),
    Resource(&'a Resource, ResourceMatch),
}

impl Matched<'_> {
    /// Log label: the action name, or `collection#clause` for resources.
    pub fn label(&self) -> String {
        match self {
            Matched::Flat(action) => action.name().to_string(),
            Matched::Resource(resource, matched) => {
                format!("{}#{}", resource.path(), matched.kind())
            }
        }
    }

    pub fn run(self, txn: &mut Transaction) -> Result<String, DispatchError> {
        match self {
            Matched::Flat(action) => action.invoke(txn),
            Matched::Resource(resource, matched) => resource.run(matched, txn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use crate::http::Request;
    use crate::routing::resource::{Record, Repository};
    use std::sync::Arc;

    struct EmptyRepo;

    impl Repository for EmptyRepo {
        fn find(&self, id: &str) -> Result<Box<dyn Record>, UpstreamError> {
            Err(UpstreamError::Missing { id: id.to_string() })
        }

        fn all(&self) -> Result<Vec<Box<dyn Record>>, UpstreamError> {
            Ok(Vec::new())
        }
    }

    fn route(method: &str, path: &str) -> Route {
        Route::from_request(&Request::new(method, path)).unwrap()
    }

    #[test]
    fn flat_registry_is_consulted_before_resources() {
        let mut app = App::new();
        app.get("people", vec![], |_| Ok("flat wins".to_string()));
        app.resource(Resource::new("people", Arc::new(EmptyRepo)));

        let matched = app.resolve(&route("GET", "/people")).unwrap();
        assert_eq!(matched.label(), "people");
    }

    #[test]
    fn resources_match_in_mount_order() {
        let mut app = App::new();
        app.resource(Resource::new("people", Arc::new(EmptyRepo)));
        app.resource(Resource::new("animals", Arc::new(EmptyRepo)));

        let matched = app.resolve(&route("GET", "/animals")).unwrap();
        assert_eq!(matched.label(), "animals#index");
    }

    #[test]
    fn no_candidate_resolves_to_none() {
        let app = App::new();
        assert!(app.resolve(&route("GET", "/anything")).is_none());
    }

    #[test]
    fn resource_labels_name_the_clause() {
        let mut app = App::new();
        app.resource(Resource::new("people", Arc::new(EmptyRepo)));
        let matched = app.resolve(&route("DELETE", "/people/7")).unwrap();
        assert_eq!(matched.label(), "people#destroy");
    }
}
