pub mod health;
pub mod prices;
pub mod watchlist;

use actix_web::http::header;
use actix_web::HttpRequest;

/// Exact-match comparison of the `If-None-Match` request header against a
/// freshly computed tag.
pub(crate) fn if_none_match_matches(request: &HttpRequest, etag: &str) -> bool {
    request
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| !value.trim().is_empty() && value == etag)
        .unwrap_or(false)
}
