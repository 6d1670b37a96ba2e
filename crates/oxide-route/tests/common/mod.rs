#![allow(dead_code)]

use oxide_route::{Param, Params, ResolvedRoute, RouteDefinition, Routes};

pub fn compile(definitions: Vec<RouteDefinition>) -> Routes {
    Routes::compile(definitions).unwrap_or_else(|e| panic!("Failed to compile routes: {e}"))
}

pub fn resolve(routes: &Routes, location: &str) -> ResolvedRoute {
    routes
        .resolve(location)
        .unwrap_or_else(|| panic!("Expected a route for: {location}"))
}

pub fn resolve_key(routes: &Routes, location: &str) -> String {
    resolve(routes, location).key().to_string()
}

/// A small application: a blog with nested post routes, a search page and
/// an external docs site.
pub fn blog() -> Routes {
    compile(vec![
        RouteDefinition::new().name("home").path("/"),
        RouteDefinition::new()
            .name("posts")
            .path("/posts")
            .query("page=:?page")
            .param("page", Param::number())
            .meta("layout", "list")
            .child(
                RouteDefinition::new()
                    .name("detail")
                    .path("/:id")
                    .param("id", Param::number())
                    .meta("layout", "detail"),
            )
            .child(RouteDefinition::new().name("drafts").path("/drafts")),
        RouteDefinition::new()
            .name("search")
            .path("/search")
            .query("q=:q&tag=:tags[]&exact=:?exact")
            .param("exact", Param::boolean()),
        RouteDefinition::new()
            .name("docs")
            .host("https://docs.example.com")
            .path("/:section/:?page"),
    ])
}

/// Assembles a location and resolves it again, returning the decoded params.
pub fn round_trip(routes: &Routes, key: &str, params: &Params) -> Params {
    let url = routes
        .assemble(key, params)
        .unwrap_or_else(|e| panic!("Failed to assemble {key}: {e}"));
    let resolved = resolve(routes, &url);
    assert_eq!(resolved.key(), key, "Round-trip of {url} resolved elsewhere");
    resolved.params().clone()
}
