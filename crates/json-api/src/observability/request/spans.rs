//! HTTP route label helpers.

/// Label used for every path that matches no known route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Map a request path onto its route template so that logs and metrics stay
/// low-cardinality. Identifiers only ever occupy template positions, and
/// unknown paths share a single label.
pub(super) fn route_label(path: &str) -> &'static str {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        return "/";
    }

    let segments: Vec<&str> = trimmed.split('/').collect();

    match segments.as_slice() {
        ["health"] => "/health",
        ["metrics"] => "/metrics",
        ["docs", ..] => "/docs",
        ["api-doc", "openapi.json"] => "/api-doc/openapi.json",
        ["baskets", _] => "/baskets/{user_id}",
        ["baskets", _, "items"] => "/baskets/{user_id}/items",
        ["baskets", _, "items", _] => "/baskets/{user_id}/items/{product_id}",
        _ => UNMATCHED_ROUTE,
    }
}
