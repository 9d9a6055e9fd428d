use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{GenreList, MediaType};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    #[serde(rename = "type")]
    media_type: Option<String>,
}

/// Genre list for one media type (default movie)
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> AppResult<Json<GenreList>> {
    let media_type = params
        .media_type
        .as_deref()
        .and_then(MediaType::from_param)
        .unwrap_or(MediaType::Movie);

    Ok(Json(state.catalog.genres(media_type).await?))
}
