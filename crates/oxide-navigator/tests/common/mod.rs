#![allow(dead_code)]

use std::sync::{Mutex, PoisonError};

use futures::future::{self, BoxFuture};
use oxide_navigator::{History, NavigationError, NavigationOptions, Result};
use oxide_route::{Param, RouteDefinition, Routes};

/// A history that records every write and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    location: Mutex<String>,
    writes: Mutex<Vec<(String, NavigationOptions)>>,
    fail: Mutex<bool>,
}

impl RecordingHistory {
    pub fn new(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_string()),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(String, NavigationOptions)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    /// Moves the location without going through the router.
    pub fn set_location(&self, location: &str) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = location.to_string();
    }
}

impl History for RecordingHistory {
    fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update<'a>(&'a self, url: &'a str, options: NavigationOptions) -> BoxFuture<'a, Result<()>> {
        if *self.fail.lock().unwrap_or_else(PoisonError::into_inner) {
            return Box::pin(future::ready(Err(NavigationError::History(
                "rejected".to_string(),
            ))));
        }
        self.set_location(url);
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), options));
        Box::pin(future::ready(Ok(())))
    }

    fn go(&self, _delta: isize) -> BoxFuture<'_, Result<()>> {
        Box::pin(future::ready(Err(NavigationError::History(
            "traversal not supported".to_string(),
        ))))
    }
}

/// Routes for a small shop: a catalog with product pages and a search.
pub fn shop() -> Routes {
    Routes::compile([
        RouteDefinition::new().name("home").path("/"),
        RouteDefinition::new()
            .name("catalog")
            .path("/catalog")
            .query("sort=:?sort")
            .child(
                RouteDefinition::new()
                    .name("product")
                    .path("/:sku")
                    .param("sku", Param::pattern("[A-Z]{3}-[0-9]+").unwrap()),
            ),
        RouteDefinition::new()
            .name("search")
            .path("/search")
            .query("q=:q&page=:?page&tag=:tags[]")
            .param("page", Param::number()),
    ])
    .unwrap_or_else(|e| panic!("Failed to compile routes: {e}"))
}
