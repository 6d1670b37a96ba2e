//! Location string splitting.

/// A location string split into origin, path and query.
///
/// Location format: `[scheme://authority]<path>[?<query>][#fragment]`. The
/// fragment is discarded and an empty path reads as `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// `scheme://authority`, when the location is absolute.
    pub origin: Option<&'a str>,
    /// Path part, never empty.
    pub path: &'a str,
    /// Query part without the leading `?`.
    pub query: &'a str,
}

impl<'a> Location<'a> {
    /// Splits a location string.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_route::Location;
    ///
    /// let location = Location::parse("https://example.com/docs?page=2#top");
    /// assert_eq!(location.origin, Some("https://example.com"));
    /// assert_eq!(location.path, "/docs");
    /// assert_eq!(location.query, "page=2");
    /// ```
    pub fn parse(location: &'a str) -> Self {
        let location = location.split_once('#').map_or(location, |(l, _)| l);

        let (origin, rest) = match split_origin(location) {
            Some(at) => (Some(&location[..at]), &location[at..]),
            None => (None, location),
        };

        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = if path.is_empty() { "/" } else { path };

        Self {
            origin,
            path,
            query,
        }
    }
}

/// Returns the byte offset where the origin ends, if there is one.
fn split_origin(location: &str) -> Option<usize> {
    let scheme_end = location.find("://")?;
    let scheme = &location[..scheme_end];
    let valid_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return None;
    }

    let authority_start = scheme_end + 3;
    let authority_len = location[authority_start..]
        .find(['/', '?'])
        .unwrap_or(location.len() - authority_start);
    Some(authority_start + authority_len)
}
