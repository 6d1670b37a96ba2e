//! # oxide-navigator
//!
//! Navigation state for applications routed with `oxide-route`.
//!
//! A [`Router`] owns the compiled routes and a [`History`] backend. It keeps
//! the current [`ResolvedRoute`](oxide_route::ResolvedRoute), publishes
//! changes to subscribers and turns param updates into new locations.
//!
//! ## Example
//!
//! ```
//! use oxide_navigator::{MemoryHistory, NavigationOptions, Router};
//! use oxide_route::{Param, RouteDefinition, Routes};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let routes = Routes::compile([
//!     RouteDefinition::new().name("home").path("/"),
//!     RouteDefinition::new()
//!         .name("users")
//!         .path("/users/:id")
//!         .query("tab=:?tab")
//!         .param("id", Param::number()),
//! ])
//! .unwrap();
//!
//! let router = Router::new(routes, MemoryHistory::new("/users/1")).unwrap();
//! assert_eq!(router.route().key(), "users");
//!
//! let route = router
//!     .update("tab", "posts", NavigationOptions::push())
//!     .await
//!     .unwrap();
//! assert_eq!(route.location(), "/users/1?tab=posts");
//! # }
//! ```

mod error;
mod history;
mod router;

pub use error::{NavigationError, Result};
pub use history::{History, MemoryHistory, NavigationOptions};
pub use router::Router;
