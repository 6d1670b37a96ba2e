//! # oxide-route
//!
//! Declarative route matching and URL assembly.
//!
//! This crate provides:
//! - Path templates with literal, required and optional param segments
//! - Query templates with optional, repeated and static entries
//! - Typed params through built-in, custom and regex codecs
//! - Nested routes combined with their ancestors
//! - Deterministic specificity ordering when several routes match
//! - Assembly of locations from a route and param values
//!
//! ## Quick Start
//!
//! ```
//! use oxide_route::{Param, Params, RouteDefinition, Routes};
//!
//! let routes = Routes::compile([
//!     RouteDefinition::new().name("users").path("/users/:id").param("id", Param::number()),
//!     RouteDefinition::new().name("active").path("/users/active"),
//! ])
//! .unwrap();
//!
//! let resolved = routes.resolve("/users/42").unwrap();
//! assert_eq!(resolved.key(), "users");
//! assert_eq!(resolved.params().parse::<i64>("id"), Some(42));
//!
//! // Literal segments outrank params.
//! assert_eq!(routes.resolve("/users/active").unwrap().key(), "active");
//!
//! let url = routes.assemble("users", &Params::new().with("id", 7)).unwrap();
//! assert_eq!(url, "/users/7");
//! ```
//!
//! ## Templates
//!
//! Paths use `/literal/:param/:?optional`. Only the last segment may be
//! optional. Queries use `key=:param&key=:?optional&key=:list[]&key=static`.
//!
//! ## Codecs
//!
//! ```
//! use oxide_route::{Param, RouteDefinition, Routes};
//!
//! let routes = Routes::compile([RouteDefinition::new()
//!     .name("files")
//!     .path("/files/:path/raw")
//!     .param("path", Param::pattern(r"[\w./-]+").unwrap())])
//! .unwrap();
//!
//! let resolved = routes.resolve("/files/docs/intro.md/raw").unwrap();
//! assert_eq!(resolved.params().get_str("path"), Some("docs/intro.md"));
//! ```
//!
//! ## Configuration
//!
//! Route sets can also be loaded from JSON with [`RoutesConfig`], which the
//! `oxide-route` binary uses.

mod assemble;
mod codec;
mod config;
mod encoding;
mod error;
mod location;
mod matcher;
mod params;
mod path;
mod query;
mod resolved;
mod route;
mod routes;

pub use assemble::assemble;
pub use codec::{
    BooleanCodec, FnCodec, NumberCodec, Param, ParamCodec, ParamKind, PatternCodec, StringCodec,
};
pub use config::{
    ParamConfig, ParamType, PatternParamConfig, RouteConfig, RoutesConfig, TypedParamConfig,
};
pub use error::{InvalidParam, Result, RouteError, SlotError};
pub use location::Location;
pub use matcher::{MatchCandidate, Specificity, candidates, resolve};
pub use params::{Params, RawCaptures};
pub use path::{PathPattern, PathSegment, PathSlot};
pub use query::{QueryPattern, QuerySlot, RouteQuery};
pub use resolved::ResolvedRoute;
pub use route::{MatchedRoute, Meta, RouteDefinition, RouteNode, SlotRef};
pub use routes::Routes;

/// Compiles route definitions into a route set.
///
/// Shorthand for [`Routes::compile`].
pub fn compile(definitions: impl IntoIterator<Item = RouteDefinition>) -> Result<Routes> {
    Routes::compile(definitions)
}

/// Looks up a named route by its dot-joined key.
///
/// Shorthand for [`Routes::find_by_key`].
pub fn find_by_key<'a>(routes: &'a Routes, key: &str) -> Option<&'a std::sync::Arc<RouteNode>> {
    routes.find_by_key(key)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Param, Params, ResolvedRoute, RouteDefinition, RouteError, RouteNode, Routes, RoutesConfig,
    };
}
