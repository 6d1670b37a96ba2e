//! The history boundary and an in-memory implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture};
use tracing::trace;

use crate::error::{NavigationError, Result};

/// How a navigation is written to the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Replace the current entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigationOptions {
    /// Push a new history entry.
    pub const fn push() -> Self {
        Self { replace: false }
    }

    /// Replace the current history entry.
    pub const fn replace() -> Self {
        Self { replace: true }
    }
}

/// A location history the router reads from and writes to.
///
/// Implementations wrap whatever holds the real location: a browser's
/// history API, a test double, or [`MemoryHistory`]. Changes that do not
/// originate from the router (back buttons, typed URLs) are reported to
/// [`Router::on_location_update`](crate::Router::on_location_update) by
/// the host.
///
/// # Example
///
/// ```
/// use futures::future::BoxFuture;
/// use oxide_navigator::{History, NavigationOptions, Result};
///
/// struct Fixed;
///
/// impl History for Fixed {
///     fn location(&self) -> String {
///         "/".to_string()
///     }
///
///     fn update<'a>(&'a self, _url: &'a str, _options: NavigationOptions) -> BoxFuture<'a, Result<()>> {
///         Box::pin(async { Ok(()) })
///     }
///
///     fn go(&self, _delta: isize) -> BoxFuture<'_, Result<()>> {
///         Box::pin(async { Ok(()) })
///     }
/// }
/// ```
pub trait History: Send + Sync {
    /// Returns the current location.
    fn location(&self) -> String;

    /// Writes a location. The future completes once the entry is applied.
    fn update<'a>(&'a self, url: &'a str, options: NavigationOptions)
        -> BoxFuture<'a, Result<()>>;

    /// Moves `delta` entries through the history.
    fn go(&self, delta: isize) -> BoxFuture<'_, Result<()>>;

    /// Moves one entry back.
    fn back(&self) -> BoxFuture<'_, Result<()>> {
        self.go(-1)
    }

    /// Moves one entry forward.
    fn forward(&self) -> BoxFuture<'_, Result<()>> {
        self.go(1)
    }
}

/// A history kept in memory, for servers and tests.
#[derive(Debug)]
pub struct MemoryHistory {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    /// Creates a history holding a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                entries: vec![initial.into()],
                index: 0,
            }),
        }
    }

    /// Returns every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state().entries.clone()
    }

    /// Returns the position of the current entry.
    pub fn index(&self) -> usize {
        self.state().index
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let state = self.state();
        state.entries[state.index].clone()
    }

    fn update<'a>(&'a self, url: &'a str, options: NavigationOptions) -> BoxFuture<'a, Result<()>> {
        let mut state = self.state();
        if options.replace {
            let index = state.index;
            state.entries[index] = url.to_string();
        } else {
            // Pushing drops every entry ahead of the current one.
            let next = state.index + 1;
            state.entries.truncate(next);
            state.entries.push(url.to_string());
            state.index = next;
        }
        trace!(url, replace = options.replace, "history updated");
        Box::pin(future::ready(Ok(())))
    }

    fn go(&self, delta: isize) -> BoxFuture<'_, Result<()>> {
        let mut state = self.state();
        let target = state
            .index
            .checked_add_signed(delta)
            .filter(|&index| index < state.entries.len());

        let result = match target {
            Some(index) => {
                state.index = index;
                Ok(())
            }
            None => Err(NavigationError::History(format!(
                "cannot move {delta} from entry {} of {}",
                state.index,
                state.entries.len()
            ))),
        };
        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("/a");
        history.update("/b", NavigationOptions::push()).await.unwrap();
        history.update("/c", NavigationOptions::push()).await.unwrap();
        history.back().await.unwrap();
        history.back().await.unwrap();
        assert_eq!(history.location(), "/a");

        history.update("/d", NavigationOptions::push()).await.unwrap();
        assert_eq!(history.entries(), vec!["/a", "/d"]);
        assert_eq!(history.index(), 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_length() {
        let history = MemoryHistory::default();
        history
            .update("/home", NavigationOptions::replace())
            .await
            .unwrap();
        assert_eq!(history.entries(), vec!["/home"]);
    }

    #[tokio::test]
    async fn test_go_out_of_range() {
        let history = MemoryHistory::new("/a");
        history.update("/b", NavigationOptions::push()).await.unwrap();

        assert!(matches!(
            history.go(-2).await,
            Err(NavigationError::History(_))
        ));
        assert!(history.forward().await.is_err());
        assert_eq!(history.location(), "/b");

        history.go(-1).await.unwrap();
        assert_eq!(history.location(), "/a");
    }
}
