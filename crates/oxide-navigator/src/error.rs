//! Error types for navigation.

use oxide_route::RouteError;
use thiserror::Error;

/// Navigation errors.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No route matched the location being navigated to.
    #[error("no route matched: {0}")]
    NoMatch(String),

    /// No route is registered under the requested key.
    #[error("route not found: {0}")]
    UnknownRoute(String),

    /// Assembling the target location failed.
    #[error(transparent)]
    Route(RouteError),

    /// The history backend refused or failed an update.
    #[error("history error: {0}")]
    History(String),
}

impl From<RouteError> for NavigationError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::UnknownRoute(key) => Self::UnknownRoute(key),
            other => Self::Route(other),
        }
    }
}

/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, NavigationError>;
