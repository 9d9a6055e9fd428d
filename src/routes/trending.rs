use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{MediaItem, PaginatedPage, TimeWindow, TrendingType};

use super::{coerce_page, AppState};

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(rename = "mediaType")]
    media_type: Option<String>,
    #[serde(rename = "timeWindow")]
    time_window: Option<String>,
    page: Option<String>,
}

/// Trending feed; unrecognized filter values coerce to the defaults
/// (all media, weekly window)
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> AppResult<Json<PaginatedPage<MediaItem>>> {
    let media_type = params
        .media_type
        .as_deref()
        .and_then(TrendingType::from_param)
        .unwrap_or(TrendingType::All);
    let window = params
        .time_window
        .as_deref()
        .and_then(TimeWindow::from_param)
        .unwrap_or(TimeWindow::Week);
    let page = coerce_page(params.page.as_deref());

    Ok(Json(state.catalog.trending(media_type, window, page).await?))
}
