//! Route table and lookup.
//!
//! # Responsibilities
//! - Store path → content mappings
//! - Resolve a request path to its content, or an explicit not-found
//!
//! # Design Decisions
//! - Exact, case-sensitive match; no normalization, prefixes or wildcards
//! - Mutated only through `add_route`; shared behind `Arc` once built
//! - Dynamic content is re-evaluated on every request

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::RouteConfig;
use crate::http::ServiceContext;
use crate::routing::generators;

/// Signature of a content-producing route.
pub type DynamicContent = Arc<dyn Fn(&ServiceContext, &[String]) -> String + Send + Sync>;

/// What a route serves.
#[derive(Clone)]
pub enum RouteContent {
    /// Fixed body, sent verbatim.
    Static(String),
    /// Body computed from the connection context and the raw request lines.
    Dynamic(DynamicContent),
}

impl RouteContent {
    /// Wrap a closure as dynamic content.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&ServiceContext, &[String]) -> String + Send + Sync + 'static,
    {
        RouteContent::Dynamic(Arc::new(f))
    }

    /// Produce the body for one request.
    pub fn render<'a>(&'a self, ctx: &ServiceContext, lines: &[String]) -> Cow<'a, str> {
        match self {
            RouteContent::Static(body) => Cow::Borrowed(body),
            RouteContent::Dynamic(f) => Cow::Owned(f(ctx, lines)),
        }
    }
}

impl fmt::Debug for RouteContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteContent::Static(body) => f.debug_tuple("Static").field(body).finish(),
            RouteContent::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<String> for RouteContent {
    fn from(body: String) -> Self {
        RouteContent::Static(body)
    }
}

impl From<&str> for RouteContent {
    fn from(body: &str) -> Self {
        RouteContent::Static(body.to_string())
    }
}

/// No route is registered for the requested path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route for `{0}`")]
pub struct RouteNotFound(pub String);

/// Error raised while building a table from configuration.
#[derive(Debug, Error)]
pub enum RouteBuildError {
    #[error("failed to read `{path}` for route `{route}`: {source}")]
    File {
        route: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("route `{route}` uses unknown generator `{name}`")]
    UnknownGenerator { route: String, name: String },

    #[error("route `{0}` has no content source")]
    MissingContent(String),
}

/// Exact-match table from request path to content.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteContent>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from route configuration, reading files eagerly.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteBuildError> {
        let mut table = Self::new();

        for route in routes {
            let content = if let Some(body) = &route.content {
                RouteContent::Static(body.clone())
            } else if let Some(file) = &route.file {
                let path = PathBuf::from(file);
                let body = std::fs::read_to_string(&path).map_err(|source| RouteBuildError::File {
                    route: route.path.clone(),
                    path,
                    source,
                })?;
                RouteContent::Static(body)
            } else if let Some(name) = &route.generator {
                generators::lookup(name).ok_or_else(|| RouteBuildError::UnknownGenerator {
                    route: route.path.clone(),
                    name: name.clone(),
                })?
            } else {
                return Err(RouteBuildError::MissingContent(route.path.clone()));
            };

            tracing::debug!(path = %route.path, content = ?content, "Route registered");
            table.add_route(route.path.clone(), content);
        }

        Ok(table)
    }

    /// Register or overwrite the content served at `path`.
    pub fn add_route(&mut self, path: impl Into<String>, content: impl Into<RouteContent>) {
        self.routes.insert(path.into(), content.into());
    }

    /// Look up the content for `path`.
    pub fn resolve(&self, path: &str) -> Result<&RouteContent, RouteNotFound> {
        self.routes
            .get(path)
            .ok_or_else(|| RouteNotFound(path.to_string()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
