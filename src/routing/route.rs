//! Structural route descriptor derived from a raw request.
//!
//! # Responsibilities
//! - Normalize the method into the closed enum (case-insensitive input)
//! - Split the path and host into segment lists
//! - Flag the root path
//!
//! # Design Decisions
//! - Lone `/` yields zero path segments; any other path drops only the
//!   leading empty element, so interior and trailing empties survive and
//!   trailing slashes stay significant
//! - Only `method` and `path_segments` feed structural matching; `params`
//!   stay on the request and are consulted at invocation time

use std::fmt;

use crate::error::DispatchError;
use crate::http::Request;

/// The closed set of methods this system routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Patch,
    Post,
    Delete,
}

impl Method {
    /// Normalize a raw method name. Anything outside the closed set is a
    /// caller error surfaced as [`DispatchError::UnsupportedMethod`].
    pub fn parse(raw: &str) -> Result<Self, DispatchError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "post" => Ok(Method::Post),
            "delete" => Ok(Method::Delete),
            _ => Err(DispatchError::UnsupportedMethod(raw.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of one request, computed once per request and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: Method,
    path_segments: Vec<String>,
    domain_segments: Vec<String>,
    is_root: bool,
}

impl Route {
    /// Derive the descriptor from a raw request.
    pub fn from_request(request: &Request) -> Result<Self, DispatchError> {
        Ok(Self {
            method: Method::parse(&request.method)?,
            path_segments: split_path(&request.path),
            domain_segments: split_host(&request.host),
            is_root: request.path == "/",
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    /// First path segment, the action name for flat dispatch.
    pub fn first_segment(&self) -> Option<&str> {
        self.path_segments.first().map(String::as_str)
    }

    pub fn domain_segments(&self) -> &[String] {
        &self.domain_segments
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() || path == "/" {
        return Vec::new();
    }
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .map(str::to_string)
        .collect()
}

fn split_host(host: &str) -> Vec<String> {
    if host.is_empty() {
        return Vec::new();
    }
    host.split('.').map(str::to_string).collect()
}
