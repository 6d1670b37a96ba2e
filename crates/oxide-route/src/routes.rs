//! The compiled route set.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, RouteError};
use crate::matcher;
use crate::params::Params;
use crate::resolved::ResolvedRoute;
use crate::route::{RouteDefinition, RouteNode};

/// An immutable, ordered set of compiled routes.
///
/// Nodes keep their declaration order (depth-first, parents before their
/// children), which is the final tie-break when several routes match.
#[derive(Debug, Clone, Default)]
pub struct Routes {
    nodes: Vec<Arc<RouteNode>>,
    by_key: HashMap<String, usize>,
}

impl Routes {
    /// Compiles route definitions, including their nested children.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_route::{Param, RouteDefinition, Routes};
    ///
    /// let routes = Routes::compile([
    ///     RouteDefinition::new().name("home").path("/"),
    ///     RouteDefinition::new()
    ///         .name("users")
    ///         .path("/users")
    ///         .child(
    ///             RouteDefinition::new()
    ///                 .name("detail")
    ///                 .path("/:id")
    ///                 .param("id", Param::number()),
    ///         ),
    /// ])
    /// .unwrap();
    ///
    /// let resolved = routes.resolve("/users/7").unwrap();
    /// assert_eq!(resolved.key(), "users.detail");
    /// assert_eq!(resolved.params().parse::<i64>("id"), Some(7));
    /// ```
    pub fn compile(definitions: impl IntoIterator<Item = RouteDefinition>) -> Result<Self> {
        let mut routes = Self::default();
        for definition in definitions {
            routes.add_tree(None, &definition)?;
        }
        info!(routes = routes.len(), "compiled route set");
        Ok(routes)
    }

    fn add_tree(&mut self, parent: Option<&RouteNode>, definition: &RouteDefinition) -> Result<()> {
        let node = Arc::new(RouteNode::combine(parent, definition)?);
        self.push(Arc::clone(&node))?;
        for child in &definition.children {
            self.add_tree(Some(node.as_ref()), child)?;
        }
        Ok(())
    }

    fn push(&mut self, node: Arc<RouteNode>) -> Result<()> {
        if node.name().is_some() {
            let key = node.key().to_string();
            if self.by_key.contains_key(&key) {
                return Err(RouteError::DuplicateKey(key));
            }
            self.by_key.insert(key, self.nodes.len());
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Resolves a location to at most one route.
    pub fn resolve(&self, location: &str) -> Option<ResolvedRoute> {
        matcher::resolve(self, location)
    }

    /// Looks up a named route by its dot-joined key.
    ///
    /// Routes without a name of their own are never returned.
    pub fn find_by_key(&self, key: &str) -> Option<&Arc<RouteNode>> {
        self.by_key.get(key).map(|&index| &self.nodes[index])
    }

    /// Assembles a location for the route registered under `key`.
    pub fn assemble(&self, key: &str, params: &Params) -> Result<String> {
        self.find_by_key(key)
            .ok_or_else(|| RouteError::UnknownRoute(key.to_string()))?
            .assemble(params)
    }

    /// Returns the routes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteNode>> {
        self.nodes.iter()
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether there are no routes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
