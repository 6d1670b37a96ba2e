//! Candidate filtering and specificity ordering.

use std::cmp::Reverse;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::location::Location;
use crate::params::{Params, RawCaptures};
use crate::query::RouteQuery;
use crate::resolved::ResolvedRoute;
use crate::route::RouteNode;
use crate::routes::Routes;

/// Ordering key used to pick one route among several matches.
///
/// Compared field by field: more literal path segments first, then more
/// required params, then the earlier declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    literal_segments: usize,
    required_params: usize,
    order: Reverse<usize>,
}

impl Specificity {
    /// Computes the score of the route declared at `order`.
    pub fn of(route: &RouteNode, order: usize) -> Self {
        Self {
            literal_segments: route.path().literal_count(),
            required_params: route.required_count(),
            order: Reverse(order),
        }
    }

    /// Returns the number of literal path segments.
    pub fn literal_segments(&self) -> usize {
        self.literal_segments
    }

    /// Returns the number of required params.
    pub fn required_params(&self) -> usize {
        self.required_params
    }

    /// Returns the declaration order.
    pub fn order(&self) -> usize {
        self.order.0
    }
}

/// A route that matched a location and whose params all decoded.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    /// The candidate route.
    pub route: &'a Arc<RouteNode>,
    /// Decoded params.
    pub params: Params,
    /// Ordering key.
    pub score: Specificity,
}

/// Returns every surviving candidate for a location, best first.
pub fn candidates<'a>(routes: &'a Routes, location: &str) -> Vec<MatchCandidate<'a>> {
    let parsed = Location::parse(location);
    let query = RouteQuery::parse(parsed.query);

    let mut candidates: Vec<MatchCandidate<'a>> = routes
        .iter()
        .enumerate()
        .filter_map(|(order, route)| candidate(order, route, &parsed, &query))
        .collect();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

/// Resolves a location to at most one route.
///
/// Returns `None` when no route survives filtering; what to show then is
/// up to the caller.
pub fn resolve(routes: &Routes, location: &str) -> Option<ResolvedRoute> {
    let parsed = Location::parse(location);
    let query = RouteQuery::parse(parsed.query);

    let best = routes
        .iter()
        .enumerate()
        .filter_map(|(order, route)| candidate(order, route, &parsed, &query))
        .max_by_key(|candidate| candidate.score);

    let Some(best) = best else {
        debug!(location, "no route matched");
        return None;
    };

    debug!(location, route = %best.route.label(), "resolved route");
    Some(ResolvedRoute::new(
        Arc::clone(best.route),
        best.params,
        query,
        location,
    ))
}

fn candidate<'a>(
    order: usize,
    route: &'a Arc<RouteNode>,
    location: &Location<'_>,
    query: &RouteQuery,
) -> Option<MatchCandidate<'a>> {
    if route.host() != location.origin {
        return None;
    }

    let mut captured = route.path().captures(location.path)?;
    captured.extend(route.query().captures(query)?);

    let params = decode(route, &captured)?;
    Some(MatchCandidate {
        route,
        params,
        score: Specificity::of(route, order),
    })
}

/// Decodes every captured slot. Any failure disqualifies the route.
fn decode(route: &RouteNode, captured: &RawCaptures) -> Option<Params> {
    let mut params = Params::new();

    for slot in route.slots() {
        let Some(texts) = captured.get(slot.name) else {
            continue;
        };

        let decoded: Result<Vec<Value>, _> = texts.iter().map(|t| slot.param.decode(t)).collect();
        match decoded {
            Ok(values) if slot.repeated => params.insert(slot.name, Value::Array(values)),
            Ok(values) => {
                if let Some(value) = values.into_iter().next() {
                    params.insert(slot.name, value);
                }
            }
            Err(invalid) => {
                trace!(
                    route = %route.label(),
                    param = slot.name,
                    %invalid,
                    "candidate disqualified"
                );
                return None;
            }
        }
    }

    Some(params)
}
