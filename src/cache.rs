use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{MediaType, TimeWindow, TrendingType};

/// Cache key for one catalog operation + parameter tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending {
        media_type: TrendingType,
        window: TimeWindow,
        page: u32,
    },
    PopularMovies {
        page: u32,
    },
    MoviesByGenre {
        genre_id: u64,
        page: u32,
    },
    MovieDetail(u64),
    MovieCredits(u64),
    MovieVideos(u64),
    SimilarMovies {
        id: u64,
        page: u32,
    },
    PopularTv {
        page: u32,
    },
    TvByGenre {
        genre_id: u64,
        page: u32,
    },
    TvDetail(u64),
    TvCredits(u64),
    TvVideos(u64),
    SimilarTv {
        id: u64,
        page: u32,
    },
    Search {
        query: String,
        page: u32,
    },
    GenreList(MediaType),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending {
                media_type,
                window,
                page,
            } => write!(f, "trending:{}:{}:{}", media_type, window, page),
            CacheKey::PopularMovies { page } => write!(f, "movies:popular:{}", page),
            CacheKey::MoviesByGenre { genre_id, page } => {
                write!(f, "movies:genre:{}:{}", genre_id, page)
            }
            CacheKey::MovieDetail(id) => write!(f, "movie:{}", id),
            CacheKey::MovieCredits(id) => write!(f, "movie:{}:credits", id),
            CacheKey::MovieVideos(id) => write!(f, "movie:{}:videos", id),
            CacheKey::SimilarMovies { id, page } => write!(f, "movie:{}:similar:{}", id, page),
            CacheKey::PopularTv { page } => write!(f, "tv:popular:{}", page),
            CacheKey::TvByGenre { genre_id, page } => write!(f, "tv:genre:{}:{}", genre_id, page),
            CacheKey::TvDetail(id) => write!(f, "tv:{}", id),
            CacheKey::TvCredits(id) => write!(f, "tv:{}:credits", id),
            CacheKey::TvVideos(id) => write!(f, "tv:{}:videos", id),
            CacheKey::SimilarTv { id, page } => write!(f, "tv:{}:similar:{}", id, page),
            CacheKey::Search { query, page } => {
                write!(f, "search:{}:{}", query.to_lowercase(), page)
            }
            CacheKey::GenreList(media_type) => write!(f, "genres:{}", media_type),
        }
    }
}

struct CacheEntry {
    value: String,
    /// `None` means the entry never expires (session lifetime)
    expires_at: Option<Instant>,
}

/// In-process cache for catalog responses
///
/// Stores serialized JSON values keyed by the canonical form of `CacheKey`.
/// The cache lives and dies with the process, mirroring a per-session query
/// cache rather than a shared store.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` for absent entries and for entries whose freshness
    /// window has passed.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let entries = self.entries.read().await;
        let Some(entry) = entries.get(&key.to_string()) else {
            return Ok(None);
        };

        if let Some(expires_at) = entry.expires_at {
            if Instant::now() >= expires_at {
                return Ok(None);
            }
        }

        let data = serde_json::from_str(&entry.value)
            .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))?;
        Ok(Some(data))
    }

    /// Stores a value in the cache
    ///
    /// A `ttl` of `None` keeps the entry fresh for the session lifetime
    /// (genre lists). Serialization failures are logged and the value is
    /// simply not cached.
    pub async fn set_in_cache<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Option<Duration>,
    ) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let entry = CacheEntry {
            value: json,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
    }
}

/// A macro to wrap a catalog fetch in cache lookup + store.
///
/// Checks the cache for the key first; on a hit the cached value is returned
/// without running the block. On a miss the block runs, its result is stored
/// under the key with the given TTL, and the result is returned.
///
/// # Arguments
/// * `$cache`: the `Cache` instance.
/// * `$key`: the `CacheKey` for this operation + parameters.
/// * `$ttl`: `Option<Duration>` freshness window; `None` never expires.
/// * `$block`: async block producing the value on a cache miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_cache(&$key, &value, $ttl).await;
            Ok(value)
        }
    }};
}
