use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaItem, MediaType};

/// A saved watch-list item
///
/// A projection of the media row it was created from, plus the insertion
/// timestamp. Entries are uniquely identified by (id, media_type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<u64>>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    /// Projects a catalog row into a watch-list entry stamped at `added_at`.
    ///
    /// The namespace tag is taken from the row when present, otherwise from
    /// the caller (single-namespace feeds omit it).
    pub fn from_media(item: &MediaItem, fallback_type: MediaType, added_at: DateTime<Utc>) -> Self {
        Self {
            id: item.id,
            media_type: item.media_type.unwrap_or(fallback_type),
            title: item.display_title().to_string(),
            poster_path: item.poster_path.clone(),
            vote_average: item.vote_average,
            release_date: item.date().unwrap_or_default().to_string(),
            overview: item.overview.clone(),
            backdrop_path: item.backdrop_path.clone(),
            genre_ids: item.genre_ids.clone(),
            added_at,
        }
    }
}

/// Watch-list entry fields as submitted by a client, before the store stamps
/// the insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWatchlistEntry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u64>>,
}

impl NewWatchlistEntry {
    pub fn into_entry(self, added_at: DateTime<Utc>) -> WatchlistEntry {
        WatchlistEntry {
            id: self.id,
            media_type: self.media_type,
            title: self.title,
            poster_path: self.poster_path,
            vote_average: self.vote_average,
            release_date: self.release_date,
            overview: self.overview,
            backdrop_path: self.backdrop_path,
            genre_ids: self.genre_ids,
            added_at,
        }
    }
}
