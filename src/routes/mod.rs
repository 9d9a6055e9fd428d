use std::sync::Arc;

use axum::{http::StatusCode, middleware as axum_middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::services::CatalogService;
use crate::store::WatchlistStore;

pub mod genres;
pub mod movies;
pub mod search;
pub mod trending;
pub mod tv;
pub mod watchlist;

/// Shared application state, injected into handlers via axum `State`
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub watchlist: Arc<WatchlistStore>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/genres", get(genres::list))
        .route("/movies", get(movies::list))
        .route("/movies/:id", get(movies::detail))
        .route("/movies/:id/credits", get(movies::credits))
        .route("/movies/:id/videos", get(movies::videos))
        .route("/movies/:id/similar", get(movies::similar))
        .route("/tv", get(tv::list))
        .route("/tv/:id", get(tv::detail))
        .route("/tv/:id/credits", get(tv::credits))
        .route("/tv/:id/videos", get(tv::videos))
        .route("/tv/:id/similar", get(tv::similar))
        .route("/search", get(search::search))
        .route("/trending", get(trending::trending))
        .route(
            "/watchlist",
            get(watchlist::list)
                .post(watchlist::add)
                .delete(watchlist::clear),
        )
        .route("/watchlist/:media_type/:id", axum::routing::delete(watchlist::remove))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Permissive page coercion: absent, non-numeric, or zero values fall back
/// to the first page rather than rejecting the request
pub(crate) fn coerce_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Permissive genre coercion: an unparseable genre id means no genre filter
pub(crate) fn coerce_genre(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|g| g.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_page_defaults_to_one() {
        assert_eq!(coerce_page(None), 1);
        assert_eq!(coerce_page(Some("")), 1);
        assert_eq!(coerce_page(Some("abc")), 1);
        assert_eq!(coerce_page(Some("-3")), 1);
        assert_eq!(coerce_page(Some("0")), 1);
    }

    #[test]
    fn test_coerce_page_accepts_numeric_values() {
        assert_eq!(coerce_page(Some("1")), 1);
        assert_eq!(coerce_page(Some("42")), 42);
    }

    #[test]
    fn test_coerce_genre_invalid_means_no_filter() {
        assert_eq!(coerce_genre(None), None);
        assert_eq!(coerce_genre(Some("action")), None);
        assert_eq!(coerce_genre(Some("28")), Some(28));
    }
}
