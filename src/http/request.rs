//! Raw request shape consumed by the dispatch core.
//!
//! # Responsibilities
//! - Carry the routing-relevant facts of one inbound request
//!   (method, path, host, query/body parameters, `Accept` header)
//! - Normalize parameter keys and fold repeated list keys
//!
//! # Design Decisions
//! - The transport adapter builds this; the core never touches sockets
//! - `key[]=a&key[]=b` binds a list; a repeated plain key keeps the last value

use std::collections::BTreeMap;

/// One bound parameter value: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

/// String-keyed parameters sourced from the query string and form body.
///
/// Keys are normalized at insertion: surrounding whitespace is trimmed and
/// a trailing `[]` marks the value as a list under the bare key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one raw key/value pair.
    ///
    /// A `[]`-suffixed key appends to the list under the bare key,
    /// replacing any earlier single-value binding. A plain key replaces
    /// whatever was bound before (last value wins).
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.trim();
        match key.strip_suffix("[]") {
            Some(name) => match self.values.get_mut(name) {
                Some(ParamValue::Many(items)) => items.push(value.into()),
                _ => {
                    self.values
                        .insert(name.to_string(), ParamValue::Many(vec![value.into()]));
                }
            },
            None => {
                self.values
                    .insert(key.to_string(), ParamValue::One(value.into()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Single-value view: a list binding yields its first element.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            ParamValue::One(value) => Some(value),
            ParamValue::Many(items) => items.first().map(String::as_str),
        }
    }

    /// List view: a single-value binding reads as a one-element list.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key)? {
            ParamValue::One(value) => Some(std::slice::from_ref(value)),
            ParamValue::Many(items) => Some(items),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key.as_ref(), value);
        }
        params
    }
}

/// A raw inbound request as handed over by the transport adapter.
///
/// The dispatch core consults nothing else: whatever the transport knows
/// beyond these fields stays on its side of the boundary.
#[derive(Debug, Clone)]
pub struct Request {
    /// Raw method name; normalized into the closed enum by the router.
    pub method: String,
    /// Raw path, leading slash included.
    pub path: String,
    /// Host without the port.
    pub host: String,
    /// Raw `Accept` header, if the client sent one.
    pub accept: Option<String>,
    /// Merged query/body parameters.
    pub params: Params,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            host: String::new(),
            accept: None,
            params: Params::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }
}
