/// Catalog data provider abstraction
///
/// This module decouples the HTTP surface from the concrete upstream catalog.
/// The production implementation talks to TMDB; tests substitute scripted
/// providers to observe exactly which operations are issued.
use crate::{
    error::AppResult,
    models::{
        Credits, GenreList, MediaItem, Movie, PaginatedPage, TimeWindow, TrendingType, TvShow,
        VideoList,
    },
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for media catalog providers
///
/// One operation per catalog query. Every operation either returns the full
/// parsed payload or fails; callers never see partial data. Page parameters
/// are 1-based. No operation retries; an upstream failure surfaces
/// immediately.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Trending titles for a media-type filter and aggregation window
    async fn trending(
        &self,
        media_type: TrendingType,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>>;

    /// Popular movies, popularity-ranked
    async fn popular_movies(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    /// Movies in one genre, popularity-ranked
    async fn movies_by_genre(&self, genre_id: u64, page: u32)
        -> AppResult<PaginatedPage<MediaItem>>;

    async fn movie_detail(&self, id: u64) -> AppResult<Movie>;

    async fn movie_credits(&self, id: u64) -> AppResult<Credits>;

    async fn movie_videos(&self, id: u64) -> AppResult<VideoList>;

    async fn similar_movies(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    /// Popular TV shows, popularity-ranked
    async fn popular_tv(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    /// TV shows in one genre, popularity-ranked
    async fn tv_by_genre(&self, genre_id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    async fn tv_detail(&self, id: u64) -> AppResult<TvShow>;

    async fn tv_credits(&self, id: u64) -> AppResult<Credits>;

    async fn tv_videos(&self, id: u64) -> AppResult<VideoList>;

    async fn similar_tv(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    /// Combined movie + TV search
    ///
    /// The raw payload may interleave rows from other namespaces (people);
    /// shaping those out is the caller's concern.
    async fn search_multi(&self, query: &str, page: u32) -> AppResult<PaginatedPage<MediaItem>>;

    async fn movie_genres(&self) -> AppResult<GenreList>;

    async fn tv_genres(&self) -> AppResult<GenreList>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
