//! Route definitions and the combined route nodes built from them.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::assemble;
use crate::codec::Param;
use crate::error::{Result, RouteError};
use crate::params::Params;
use crate::path::{PathPattern, first_duplicate};
use crate::query::QueryPattern;

/// Opaque per-route metadata.
pub type Meta = serde_json::Map<String, Value>;

/// Declarative description of one route.
///
/// Every field is independently optional. Nested `children` are combined
/// with this route when the set is compiled.
///
/// # Example
///
/// ```
/// use oxide_route::{Param, RouteDefinition};
///
/// let users = RouteDefinition::new()
///     .name("users")
///     .path("/users")
///     .child(
///         RouteDefinition::new()
///             .name("detail")
///             .path("/:id")
///             .param("id", Param::number()),
///     );
/// assert_eq!(users.children.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteDefinition {
    /// Route name, joined with ancestor names to form the key.
    pub name: Option<String>,
    /// Path template.
    pub path: String,
    /// Query template.
    pub query: String,
    /// Codecs for path and query params, by param name.
    pub params: HashMap<String, Param>,
    /// Shape of non-location state params.
    pub state: HashMap<String, Param>,
    /// Metadata, merged over the parent's.
    pub meta: Meta,
    /// External origin, e.g. `https://example.com`.
    pub host: Option<String>,
    /// Nested routes.
    pub children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    /// Creates an empty definition (unnamed, index path).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the route name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the path template.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the query template.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Binds a codec to a path or query param.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, param: Param) -> Self {
        self.params.insert(name.into(), param);
        self
    }

    /// Declares a state param.
    #[must_use]
    pub fn state(mut self, name: impl Into<String>, param: Param) -> Self {
        self.state.insert(name.into(), param);
        self
    }

    /// Sets a metadata entry.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Sets the external origin.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Adds a nested route.
    #[must_use]
    pub fn child(mut self, child: RouteDefinition) -> Self {
        self.children.push(child);
        self
    }
}

/// One level of a route's ancestry, as it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRoute {
    /// Declared name.
    pub name: Option<String>,
    /// Declared path template.
    pub path: String,
    /// Declared query template.
    pub query: String,
    /// Declared metadata (not merged).
    pub meta: Meta,
}

/// A param slot of a route node, from either its path or its query.
#[derive(Debug, Clone, Copy)]
pub struct SlotRef<'a> {
    /// Param name.
    pub name: &'a str,
    /// Bound codec.
    pub param: &'a Param,
    /// Whether the slot may be absent.
    pub optional: bool,
    /// Whether the slot collects an array.
    pub repeated: bool,
}

/// A fully combined, immutable route.
#[derive(Debug, Clone)]
pub struct RouteNode {
    name: Option<String>,
    key: String,
    path: PathPattern,
    query: QueryPattern,
    meta: Meta,
    state: HashMap<String, Param>,
    host: Option<String>,
    depth: usize,
    matches: Vec<Arc<MatchedRoute>>,
}

impl RouteNode {
    /// Compiles a root route. Children are not visited.
    pub fn new(definition: &RouteDefinition) -> Result<Self> {
        Self::combine(None, definition)
    }

    /// Compiles a route under an optional parent.
    ///
    /// Paths are concatenated, query slots and state are unioned, meta is
    /// shallow-merged with the child winning, and the host is inherited
    /// unless the child sets its own.
    pub fn combine(parent: Option<&RouteNode>, definition: &RouteDefinition) -> Result<Self> {
        let path = PathPattern::parse(&definition.path, &definition.params)?;
        let query = QueryPattern::parse(&definition.query, &definition.params)?;
        let declared = Arc::new(MatchedRoute {
            name: definition.name.clone(),
            path: definition.path.clone(),
            query: definition.query.clone(),
            meta: definition.meta.clone(),
        });
        let host = definition
            .host
            .as_deref()
            .map(|h| h.trim_end_matches('/').to_string());

        let node = match parent {
            None => Self {
                name: definition.name.clone(),
                key: definition.name.clone().unwrap_or_default(),
                path,
                query,
                meta: definition.meta.clone(),
                state: definition.state.clone(),
                host,
                depth: 1,
                matches: vec![declared],
            },
            Some(parent) => {
                let key = join_key(&parent.key, definition.name.as_deref());
                let path = parent.path.join(&path)?;

                let mut meta = parent.meta.clone();
                meta.extend(definition.meta.clone());

                let mut state = parent.state.clone();
                for (name, param) in &definition.state {
                    if state.insert(name.clone(), param.clone()).is_some() {
                        return Err(RouteError::DuplicateStateParam {
                            route: label(&key, &path),
                            param: name.clone(),
                        });
                    }
                }

                let mut matches = parent.matches.clone();
                matches.push(declared);

                Self {
                    name: definition.name.clone(),
                    query: parent.query.join(&query),
                    host: host.or_else(|| parent.host.clone()),
                    depth: parent.depth + 1,
                    key,
                    path,
                    meta,
                    state,
                    matches,
                }
            }
        };

        if let Some(param) = first_duplicate(node.slots().map(|slot| slot.name)) {
            return Err(RouteError::DuplicateParam {
                route: node.label(),
                param: param.to_string(),
            });
        }

        debug!(
            key = %node.key,
            path = %node.path.template(),
            query = %node.query.template(),
            "compiled route"
        );
        Ok(node)
    }

    /// Returns the route's own name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the dot-joined key. Empty when no level is named.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the key, or the path template for unnamed routes.
    pub fn label(&self) -> String {
        label(&self.key, &self.path)
    }

    /// Returns the combined path pattern.
    pub fn path(&self) -> &PathPattern {
        &self.path
    }

    /// Returns the combined query pattern.
    pub fn query(&self) -> &QueryPattern {
        &self.query
    }

    /// Returns the merged metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Returns the state param shape.
    pub fn state(&self) -> &HashMap<String, Param> {
        &self.state
    }

    /// Returns the external origin, `None` for local routes.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the length of the ancestor chain, self included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the ancestor chain, root first, self last.
    pub fn matches(&self) -> &[Arc<MatchedRoute>] {
        &self.matches
    }

    /// Returns this route's own declaration.
    pub fn matched(&self) -> &MatchedRoute {
        // The chain always holds at least the route itself.
        &self.matches[self.matches.len() - 1]
    }

    /// Returns every path and query slot.
    pub fn slots(&self) -> impl Iterator<Item = SlotRef<'_>> {
        let path = self.path.slots().map(|slot| SlotRef {
            name: &slot.name,
            param: &slot.param,
            optional: slot.optional,
            repeated: false,
        });
        let query = self.query.slots().iter().map(|slot| SlotRef {
            name: &slot.name,
            param: &slot.param,
            optional: slot.optional,
            repeated: slot.repeated,
        });
        path.chain(query)
    }

    /// Looks up a slot by param name.
    pub fn slot(&self, name: &str) -> Option<SlotRef<'_>> {
        self.slots().find(|slot| slot.name == name)
    }

    /// Returns the number of required slots.
    pub fn required_count(&self) -> usize {
        self.slots().filter(|slot| !slot.optional).count()
    }

    /// Assembles a location for this route.
    pub fn assemble(&self, params: &Params) -> Result<String> {
        assemble::assemble(self, params)
    }
}

fn join_key(parent: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !parent.is_empty() => format!("{parent}.{name}"),
        Some(name) => name.to_string(),
        None => parent.to_string(),
    }
}

fn label(key: &str, path: &PathPattern) -> String {
    if key.is_empty() {
        path.template().to_string()
    } else {
        key.to_string()
    }
}
