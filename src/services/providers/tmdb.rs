/// TMDB catalog provider
///
/// Issues GET requests against the TMDB v3 API. Every request carries the API
/// credential and the configured response locale as query parameters. A
/// non-success status fails the operation with the upstream status code;
/// there is no retry logic.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{
        Credits, GenreList, MediaItem, Movie, PaginatedPage, TimeWindow, TrendingType, TvShow,
        VideoList,
    },
    services::providers::CatalogProvider,
};

const POPULARITY_SORT: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    /// Issues one catalog GET and parses the JSON body
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", self.language.clone()),
        ];
        query.extend(params.iter().cloned());

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(path = %path, status = status, provider = "tmdb", "Catalog request failed");
            return Err(AppError::Upstream { status });
        }

        Ok(response.json().await?)
    }

    fn trending_path(media_type: TrendingType, window: TimeWindow) -> String {
        format!("/trending/{}/{}", media_type, window)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn trending(
        &self,
        media_type: TrendingType,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch(
            &Self::trending_path(media_type, window),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn popular_movies(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn movies_by_genre(
        &self,
        genre_id: u64,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", POPULARITY_SORT.to_string()),
            ],
        )
        .await
    }

    async fn movie_detail(&self, id: u64) -> AppResult<Movie> {
        self.fetch(&format!("/movie/{}", id), &[]).await
    }

    async fn movie_credits(&self, id: u64) -> AppResult<Credits> {
        self.fetch(&format!("/movie/{}/credits", id), &[]).await
    }

    async fn movie_videos(&self, id: u64) -> AppResult<VideoList> {
        self.fetch(&format!("/movie/{}/videos", id), &[]).await
    }

    async fn similar_movies(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch(
            &format!("/movie/{}/similar", id),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn popular_tv(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch("/tv/popular", &[("page", page.to_string())])
            .await
    }

    async fn tv_by_genre(&self, genre_id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch(
            "/discover/tv",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", POPULARITY_SORT.to_string()),
            ],
        )
        .await
    }

    async fn tv_detail(&self, id: u64) -> AppResult<TvShow> {
        self.fetch(&format!("/tv/{}", id), &[]).await
    }

    async fn tv_credits(&self, id: u64) -> AppResult<Credits> {
        self.fetch(&format!("/tv/{}/credits", id), &[]).await
    }

    async fn tv_videos(&self, id: u64) -> AppResult<VideoList> {
        self.fetch(&format!("/tv/{}/videos", id), &[]).await
    }

    async fn similar_tv(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.fetch(
            &format!("/tv/{}/similar", id),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn search_multi(&self, query: &str, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        let results: PaginatedPage<MediaItem> = self
            .fetch(
                "/search/multi",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        tracing::info!(
            query = %query,
            page = page,
            results = results.results.len(),
            provider = "tmdb",
            "Search completed"
        );

        Ok(results)
    }

    async fn movie_genres(&self) -> AppResult<GenreList> {
        self.fetch("/genre/movie/list", &[]).await
    }

    async fn tv_genres(&self) -> AppResult<GenreList> {
        self.fetch("/genre/tv/list", &[]).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
