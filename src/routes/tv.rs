use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Credits, MediaItem, PaginatedPage, TvShow, VideoList};

use super::{coerce_genre, coerce_page, AppState};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

/// TV feed: genre-filtered when `genre` is present, popular otherwise
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedPage<MediaItem>>> {
    let page = coerce_page(params.page.as_deref());

    let data = match coerce_genre(params.genre.as_deref()) {
        Some(genre_id) => state.catalog.tv_by_genre(genre_id, page).await?,
        None => state.catalog.popular_tv(page).await?,
    };

    Ok(Json(data))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<TvShow>> {
    Ok(Json(state.catalog.tv_detail(id).await?))
}

pub async fn credits(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Credits>> {
    Ok(Json(state.catalog.tv_credits(id).await?))
}

pub async fn videos(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<VideoList>> {
    Ok(Json(state.catalog.tv_videos(id).await?))
}

pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedPage<MediaItem>>> {
    let page = coerce_page(params.page.as_deref());
    Ok(Json(state.catalog.similar_tv(id, page).await?))
}
