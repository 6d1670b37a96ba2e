//! The result of a successful resolution.

use std::sync::Arc;

use crate::error::Result;
use crate::params::Params;
use crate::query::RouteQuery;
use crate::route::{MatchedRoute, RouteNode};

/// A route matched against a location, with its decoded params.
///
/// Built fresh on every resolution and never mutated afterwards. Hosts that
/// need a live view replace their copy with the next one.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    route: Arc<RouteNode>,
    params: Params,
    query: RouteQuery,
    location: String,
}

impl ResolvedRoute {
    pub(crate) fn new(route: Arc<RouteNode>, params: Params, query: RouteQuery, location: &str) -> Self {
        Self {
            route,
            params,
            query,
            location: location.to_string(),
        }
    }

    /// Returns the matched route node.
    pub fn route(&self) -> &Arc<RouteNode> {
        &self.route
    }

    /// Returns the declaration of the matched route.
    pub fn matched(&self) -> &MatchedRoute {
        self.route.matched()
    }

    /// Returns the ancestor chain, root first.
    pub fn matches(&self) -> &[Arc<MatchedRoute>] {
        self.route.matches()
    }

    /// Returns the matched route's own name.
    pub fn name(&self) -> Option<&str> {
        self.route.name()
    }

    /// Returns the matched route's key.
    pub fn key(&self) -> &str {
        self.route.key()
    }

    /// Returns the decoded path and query params.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the accessor over the raw query.
    pub fn query(&self) -> &RouteQuery {
        &self.query
    }

    /// Returns the location this route was resolved from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Assembles the location for this route with some params replaced.
    pub fn with_params(&self, overrides: &Params) -> Result<String> {
        self.route.assemble(&self.params.merged(overrides))
    }
}
