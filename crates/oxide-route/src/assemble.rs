//! URL assembly, the inverse of matching.

use tracing::trace;

use crate::error::Result;
use crate::params::Params;
use crate::route::RouteNode;

/// Assembles a location string from a route and a complete set of values.
///
/// The caller is responsible for merging old and overridden values first;
/// nothing is carried over implicitly. Unknown names in `params` are
/// ignored.
///
/// # Errors
///
/// Returns [`RouteError::MissingParam`](crate::RouteError::MissingParam)
/// when a required slot has no value, and
/// [`RouteError::Encode`](crate::RouteError::Encode) when a codec cannot
/// represent a value.
///
/// # Example
///
/// ```
/// use oxide_route::{assemble, Param, Params, RouteDefinition, RouteNode};
///
/// let route = RouteNode::new(
///     &RouteDefinition::new()
///         .path("/posts/:id")
///         .query("tag=:tags[]")
///         .param("id", Param::number()),
/// )
/// .unwrap();
/// let params = Params::new()
///     .with("id", 7)
///     .with("tags", serde_json::json!(["a", "b"]));
/// assert_eq!(assemble(&route, &params).unwrap(), "/posts/7?tag=a&tag=b");
/// ```
pub fn assemble(route: &RouteNode, params: &Params) -> Result<String> {
    let path = route
        .path()
        .encode(params)
        .map_err(|e| e.for_route(&route.label()))?;
    let query = route
        .query()
        .encode(params)
        .map_err(|e| e.for_route(&route.label()))?;

    let mut url = String::new();
    if let Some(host) = route.host() {
        url.push_str(host);
    }
    url.push_str(&path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    trace!(route = %route.label(), %url, "assembled location");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Param;
    use crate::error::RouteError;
    use crate::route::RouteDefinition;
    use serde_json::json;

    fn route(definition: RouteDefinition) -> RouteNode {
        RouteNode::new(&definition).unwrap()
    }

    #[test]
    fn test_optional_segment_collapses() {
        let route = route(RouteDefinition::new().path("/item/:?id"));
        assert_eq!(assemble(&route, &Params::new()).unwrap(), "/item");
        assert_eq!(
            assemble(&route, &Params::new().with("id", "42")).unwrap(),
            "/item/42"
        );
    }

    #[test]
    fn test_missing_required_path_param() {
        let route = route(RouteDefinition::new().name("post").path("/posts/:id"));
        let err = assemble(&route, &Params::new()).unwrap_err();
        assert!(
            matches!(err, RouteError::MissingParam { route, param } if route == "post" && param == "id")
        );
    }

    #[test]
    fn test_missing_required_query_param() {
        let route = route(RouteDefinition::new().path("/search").query("q=:q"));
        let err = assemble(&route, &Params::new()).unwrap_err();
        assert!(matches!(err, RouteError::MissingParam { param, .. } if param == "q"));
    }

    #[test]
    fn test_absent_optional_query_is_omitted() {
        let route = route(RouteDefinition::new().path("/search").query("q=:?q&page=:?page"));
        assert_eq!(assemble(&route, &Params::new()).unwrap(), "/search");
        assert_eq!(
            assemble(&route, &Params::new().with("page", "2")).unwrap(),
            "/search?page=2"
        );
    }

    #[test]
    fn test_codec_rejects_value() {
        let route = route(
            RouteDefinition::new()
                .path("/posts/:id")
                .param("id", Param::number()),
        );
        let err = assemble(&route, &Params::new().with("id", "seven")).unwrap_err();
        assert!(matches!(err, RouteError::Encode { param, .. } if param == "id"));
    }

    #[test]
    fn test_host_prefix() {
        let route = route(
            RouteDefinition::new()
                .host("https://example.com")
                .path("/docs/:page"),
        );
        assert_eq!(
            assemble(&route, &Params::new().with("page", "intro")).unwrap(),
            "https://example.com/docs/intro"
        );
    }

    #[test]
    fn test_repeated_values_keep_order() {
        let route = route(
            RouteDefinition::new()
                .path("/")
                .query("tag=:tag")
                .param("tag", Param::string().repeated()),
        );
        assert_eq!(
            assemble(&route, &Params::new().with("tag", json!(["b", "a"]))).unwrap(),
            "/?tag=b&tag=a"
        );
    }
}
