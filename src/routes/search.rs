use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{MediaItem, PaginatedPage};

use super::{coerce_page, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<String>,
}

/// Combined movie + TV search
///
/// A blank or whitespace-only query returns the canonical empty page without
/// touching the upstream.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PaginatedPage<MediaItem>>> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();

    if query.is_empty() {
        return Ok(Json(PaginatedPage::empty()));
    }

    let page = coerce_page(params.page.as_deref());
    Ok(Json(state.catalog.search(query, page).await?))
}
