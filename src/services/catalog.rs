use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::AppResult,
    models::{
        Credits, GenreList, MediaItem, MediaType, Movie, PaginatedPage, TimeWindow, TrendingType,
        TvShow, VideoList,
    },
    services::providers::CatalogProvider,
};

/// Freshness window for catalog responses
const CATALOG_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cached catalog operations
///
/// Wraps a `CatalogProvider` so each (operation, parameters) tuple is fetched
/// at most once per freshness window. Genre lists never expire for the
/// session; everything else revalidates after five minutes.
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    cache: Cache,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: Cache) -> Self {
        Self { provider, cache }
    }

    pub async fn trending(
        &self,
        media_type: TrendingType,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::Trending {
                media_type,
                window,
                page
            },
            Some(CATALOG_TTL),
            self.provider.trending(media_type, window, page)
        )
    }

    pub async fn popular_movies(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::PopularMovies { page },
            Some(CATALOG_TTL),
            self.provider.popular_movies(page)
        )
    }

    pub async fn movies_by_genre(
        &self,
        genre_id: u64,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::MoviesByGenre { genre_id, page },
            Some(CATALOG_TTL),
            self.provider.movies_by_genre(genre_id, page)
        )
    }

    pub async fn movie_detail(&self, id: u64) -> AppResult<Movie> {
        cached!(
            self.cache,
            CacheKey::MovieDetail(id),
            Some(CATALOG_TTL),
            self.provider.movie_detail(id)
        )
    }

    pub async fn movie_credits(&self, id: u64) -> AppResult<Credits> {
        cached!(
            self.cache,
            CacheKey::MovieCredits(id),
            Some(CATALOG_TTL),
            self.provider.movie_credits(id)
        )
    }

    pub async fn movie_videos(&self, id: u64) -> AppResult<VideoList> {
        cached!(
            self.cache,
            CacheKey::MovieVideos(id),
            Some(CATALOG_TTL),
            self.provider.movie_videos(id)
        )
    }

    pub async fn similar_movies(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::SimilarMovies { id, page },
            Some(CATALOG_TTL),
            self.provider.similar_movies(id, page)
        )
    }

    pub async fn popular_tv(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::PopularTv { page },
            Some(CATALOG_TTL),
            self.provider.popular_tv(page)
        )
    }

    pub async fn tv_by_genre(&self, genre_id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::TvByGenre { genre_id, page },
            Some(CATALOG_TTL),
            self.provider.tv_by_genre(genre_id, page)
        )
    }

    pub async fn tv_detail(&self, id: u64) -> AppResult<TvShow> {
        cached!(
            self.cache,
            CacheKey::TvDetail(id),
            Some(CATALOG_TTL),
            self.provider.tv_detail(id)
        )
    }

    pub async fn tv_credits(&self, id: u64) -> AppResult<Credits> {
        cached!(
            self.cache,
            CacheKey::TvCredits(id),
            Some(CATALOG_TTL),
            self.provider.tv_credits(id)
        )
    }

    pub async fn tv_videos(&self, id: u64) -> AppResult<VideoList> {
        cached!(
            self.cache,
            CacheKey::TvVideos(id),
            Some(CATALOG_TTL),
            self.provider.tv_videos(id)
        )
    }

    pub async fn similar_tv(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::SimilarTv { id, page },
            Some(CATALOG_TTL),
            self.provider.similar_tv(id, page)
        )
    }

    pub async fn search(&self, query: &str, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                page
            },
            Some(CATALOG_TTL),
            self.provider.search_multi(query, page)
        )
    }

    /// Genre list for one media type, fetched once and kept for the session
    pub async fn genres(&self, media_type: MediaType) -> AppResult<GenreList> {
        cached!(self.cache, CacheKey::GenreList(media_type), None, async {
            match media_type {
                MediaType::Movie => self.provider.movie_genres().await,
                MediaType::Tv => self.provider.tv_genres().await,
            }
        })
    }

    /// Genre id -> display name lookup across the requested namespaces
    ///
    /// With `TrendingType::All` both lists are merged; the TV name wins when
    /// the namespaces disagree on an id.
    pub async fn genre_map(&self, filter: TrendingType) -> AppResult<HashMap<u64, String>> {
        let mut map = HashMap::new();
        if filter != TrendingType::Tv {
            for genre in self.genres(MediaType::Movie).await?.genres {
                map.insert(genre.id, genre.name);
            }
        }
        if filter != TrendingType::Movie {
            for genre in self.genres(MediaType::Tv).await?.genres {
                map.insert(genre.id, genre.name);
            }
        }
        Ok(map)
    }
}
