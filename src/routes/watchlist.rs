use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::watchlist::NewWatchlistEntry;
use crate::models::{MediaType, WatchlistEntry};

use super::AppState;

/// Current watch-list, most-recent-first
pub async fn list(State(state): State<AppState>) -> Json<Vec<WatchlistEntry>> {
    Json(state.watchlist.items())
}

/// Adds an entry; re-adding an existing (id, media_type) is a no-op
pub async fn add(
    State(state): State<AppState>,
    Json(new): Json<NewWatchlistEntry>,
) -> (StatusCode, Json<Value>) {
    let added = state.watchlist.add(new, Utc::now());

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(json!({ "added": added })))
}

/// Removes an entry; a miss is still a success
pub async fn remove(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, u64)>,
) -> AppResult<StatusCode> {
    let media_type = MediaType::from_param(&media_type)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown media type: {}", media_type)))?;

    state.watchlist.remove(id, media_type);
    Ok(StatusCode::NO_CONTENT)
}

/// Empties the watch-list
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.watchlist.clear();
    StatusCode::NO_CONTENT
}
