//! The navigation context.

use std::sync::Arc;

use oxide_route::{Params, ResolvedRoute, Routes};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::error::{NavigationError, Result};
use crate::history::{History, NavigationOptions};

/// Tracks the current route of a [`History`] and navigates it.
///
/// One router is created per application and passed to whatever needs it.
/// Navigations are applied one at a time, in the order they acquire the
/// router; the published route is always the last one applied.
pub struct Router<H> {
    routes: Arc<Routes>,
    history: H,
    current: watch::Sender<Arc<ResolvedRoute>>,
    navigation: Mutex<()>,
}

impl<H: History> Router<H> {
    /// Creates a router positioned at the history's current location.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoMatch`] when that location resolves to
    /// no route.
    pub fn new(routes: impl Into<Arc<Routes>>, history: H) -> Result<Self> {
        let routes = routes.into();
        let location = history.location();
        let resolved = routes
            .resolve(&location)
            .ok_or(NavigationError::NoMatch(location))?;

        info!(route = %resolved.route().label(), "router started");
        let (current, _) = watch::channel(Arc::new(resolved));
        Ok(Self {
            routes,
            history,
            current,
            navigation: Mutex::new(()),
        })
    }

    /// Returns the compiled routes.
    pub fn routes(&self) -> &Arc<Routes> {
        &self.routes
    }

    /// Returns the history backend.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the current route.
    pub fn route(&self) -> Arc<ResolvedRoute> {
        Arc::clone(&self.current.borrow())
    }

    /// Subscribes to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ResolvedRoute>> {
        self.current.subscribe()
    }

    /// Resolves a location without navigating.
    pub fn resolve(&self, location: &str) -> Option<ResolvedRoute> {
        self.routes.resolve(location)
    }

    /// Assembles the location of a named route.
    pub fn url_for(&self, key: &str, params: &Params) -> Result<String> {
        Ok(self.routes.assemble(key, params)?)
    }

    /// Navigates to a location.
    ///
    /// The location is resolved before the history is touched, so a
    /// location no route matches leaves everything unchanged.
    pub async fn push(&self, url: &str, options: NavigationOptions) -> Result<Arc<ResolvedRoute>> {
        let _guard = self.navigation.lock().await;
        self.navigate(url, options).await
    }

    /// Navigates to a location, replacing the current history entry.
    pub async fn replace(&self, url: &str) -> Result<Arc<ResolvedRoute>> {
        self.push(url, NavigationOptions::replace()).await
    }

    /// Navigates to a named route.
    pub async fn push_route(
        &self,
        key: &str,
        params: &Params,
        options: NavigationOptions,
    ) -> Result<Arc<ResolvedRoute>> {
        let url = self.url_for(key, params)?;
        self.push(&url, options).await
    }

    /// Sets one param of the current route and navigates there.
    ///
    /// A `null` value clears the param.
    pub async fn update(
        &self,
        name: &str,
        value: impl Into<Value>,
        options: NavigationOptions,
    ) -> Result<Arc<ResolvedRoute>> {
        self.update_params(&Params::new().with(name, value), options)
            .await
    }

    /// Lays `partial` over the current route's params and navigates to the
    /// reassembled location.
    ///
    /// The current route is read after earlier navigations have been applied.
    pub async fn update_params(
        &self,
        partial: &Params,
        options: NavigationOptions,
    ) -> Result<Arc<ResolvedRoute>> {
        let _guard = self.navigation.lock().await;
        let url = self.route().with_params(partial)?;
        self.navigate(&url, options).await
    }

    /// Syncs the router with a location the history moved to by itself.
    ///
    /// Hosts call this from their location change notifier. The history is
    /// not written to.
    pub async fn on_location_update(&self, location: &str) -> Result<Arc<ResolvedRoute>> {
        let _guard = self.navigation.lock().await;
        self.sync(location)
    }

    /// Moves `delta` entries through the history and follows it.
    ///
    /// When the entry moved to resolves to no route, the history is moved
    /// back and [`NavigationError::NoMatch`] is returned.
    pub async fn go(&self, delta: isize) -> Result<Arc<ResolvedRoute>> {
        let _guard = self.navigation.lock().await;
        self.history.go(delta).await?;

        let location = self.history.location();
        match self.sync(&location) {
            Ok(resolved) => Ok(resolved),
            Err(err) => {
                if let Some(back) = delta.checked_neg() {
                    if let Err(restore) = self.history.go(back).await {
                        warn!(%location, %restore, "could not restore history position");
                    }
                }
                Err(err)
            }
        }
    }

    /// Moves one entry back.
    pub async fn back(&self) -> Result<Arc<ResolvedRoute>> {
        self.go(-1).await
    }

    /// Moves one entry forward.
    pub async fn forward(&self) -> Result<Arc<ResolvedRoute>> {
        self.go(1).await
    }

    async fn navigate(&self, url: &str, options: NavigationOptions) -> Result<Arc<ResolvedRoute>> {
        let resolved = self
            .routes
            .resolve(url)
            .ok_or_else(|| NavigationError::NoMatch(url.to_string()))?;
        self.history.update(url, options).await?;
        Ok(self.publish(resolved))
    }

    fn sync(&self, location: &str) -> Result<Arc<ResolvedRoute>> {
        let resolved = self
            .routes
            .resolve(location)
            .ok_or_else(|| NavigationError::NoMatch(location.to_string()))?;
        Ok(self.publish(resolved))
    }

    fn publish(&self, resolved: ResolvedRoute) -> Arc<ResolvedRoute> {
        let resolved = Arc::new(resolved);
        debug!(
            route = %resolved.route().label(),
            location = resolved.location(),
            "navigated"
        );
        self.current.send_replace(Arc::clone(&resolved));
        resolved
    }
}

impl<H> std::fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("current", &self.current.borrow().location())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use oxide_route::{Param, RouteDefinition};
    use serde_json::json;

    fn routes() -> Routes {
        Routes::compile([
            RouteDefinition::new().name("home").path("/"),
            RouteDefinition::new()
                .name("users")
                .path("/users/:id")
                .query("tab=:?tab")
                .param("id", Param::number()),
        ])
        .unwrap()
    }

    fn router(location: &str) -> Router<MemoryHistory> {
        Router::new(routes(), MemoryHistory::new(location)).unwrap()
    }

    #[test]
    fn test_new_resolves_initial_location() {
        let router = router("/users/3?tab=posts");
        let route = router.route();
        assert_eq!(route.key(), "users");
        assert_eq!(route.params().get("tab"), Some(&json!("posts")));
    }

    #[test]
    fn test_new_without_match() {
        let err = Router::new(routes(), MemoryHistory::new("/missing")).unwrap_err();
        assert!(matches!(err, NavigationError::NoMatch(location) if location == "/missing"));
    }

    #[tokio::test]
    async fn test_push_publishes_and_writes_history() {
        let router = router("/");
        let mut changes = router.subscribe();

        let route = router
            .push("/users/7", NavigationOptions::push())
            .await
            .unwrap();
        assert_eq!(route.params().get("id"), Some(&json!(7)));
        assert!(changes.has_changed().unwrap());
        assert_eq!(changes.borrow_and_update().key(), "users");
        assert_eq!(router.history().entries(), vec!["/", "/users/7"]);
    }

    #[tokio::test]
    async fn test_push_without_match_changes_nothing() {
        let router = router("/");
        let err = router
            .push("/nowhere", NavigationOptions::push())
            .await
            .unwrap_err();

        assert!(matches!(err, NavigationError::NoMatch(_)));
        assert_eq!(router.route().key(), "home");
        assert_eq!(router.history().entries(), vec!["/"]);
    }

    #[tokio::test]
    async fn test_update_reassembles_current_route() {
        let router = router("/users/7");

        let route = router
            .update("tab", "posts", NavigationOptions::push())
            .await
            .unwrap();
        assert_eq!(route.location(), "/users/7?tab=posts");

        let route = router
            .update("tab", Value::Null, NavigationOptions::replace())
            .await
            .unwrap();
        assert_eq!(route.location(), "/users/7");
        assert_eq!(router.history().entries(), vec!["/users/7", "/users/7"]);
    }

    #[tokio::test]
    async fn test_push_route_unknown_key() {
        let router = router("/");
        let err = router
            .push_route("posts", &Params::new(), NavigationOptions::push())
            .await
            .unwrap_err();
        assert!(matches!(err, NavigationError::UnknownRoute(key) if key == "posts"));
    }

    #[tokio::test]
    async fn test_go_to_unmatched_entry_restores_history() {
        let history = MemoryHistory::new("/");
        history
            .update("/nowhere", NavigationOptions::push())
            .await
            .unwrap();
        history.back().await.unwrap();

        let router = Router::new(routes(), history).unwrap();
        let err = router.forward().await.unwrap_err();

        assert!(matches!(err, NavigationError::NoMatch(location) if location == "/nowhere"));
        assert_eq!(router.history().index(), 0);
        assert_eq!(router.history().location(), "/");
        assert_eq!(router.route().key(), "home");
    }

    #[tokio::test]
    async fn test_back_follows_history() {
        let router = router("/");
        router
            .push_route("users", &Params::new().with("id", 1), NavigationOptions::push())
            .await
            .unwrap();

        assert_eq!(router.back().await.unwrap().key(), "home");
        assert_eq!(router.forward().await.unwrap().key(), "users");
        assert!(router.forward().await.is_err());
        assert_eq!(router.route().key(), "users");
    }
}
