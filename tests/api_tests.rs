use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use cinema_api::cache::Cache;
use cinema_api::error::{AppError, AppResult};
use cinema_api::models::{
    Credits, Genre, GenreList, MediaItem, Movie, PaginatedPage, TimeWindow, TrendingType, TvShow,
    VideoList,
};
use cinema_api::routes::{create_router, AppState};
use cinema_api::services::providers::CatalogProvider;
use cinema_api::services::CatalogService;
use cinema_api::store::WatchlistStore;

/// Scripted catalog provider: each operation returns a payload labeled with
/// the operation and its parameters, so assertions can tell exactly which
/// upstream call served a response. Call counters make "no upstream call"
/// observable.
#[derive(Default)]
struct FakeCatalog {
    search_calls: AtomicUsize,
    movie_genre_calls: AtomicUsize,
}

fn row(id: u64, label: &str) -> MediaItem {
    serde_json::from_value(json!({
        "id": id,
        "title": label,
        "poster_path": "/p.jpg",
        "vote_average": 7.0,
        "vote_count": 100
    }))
    .unwrap()
}

fn labeled_page(label: &str, page: u32) -> PaginatedPage<MediaItem> {
    PaginatedPage {
        page,
        results: vec![row(page as u64, label)],
        total_pages: 3,
        total_results: 3,
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn trending(
        &self,
        media_type: TrendingType,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(
            &format!("trending-{}-{}-{}", media_type, window, page),
            page,
        ))
    }

    async fn popular_movies(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(&format!("popular-movies-{}", page), page))
    }

    async fn movies_by_genre(
        &self,
        genre_id: u64,
        page: u32,
    ) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(
            &format!("movies-genre-{}-{}", genre_id, page),
            page,
        ))
    }

    async fn movie_detail(&self, id: u64) -> AppResult<Movie> {
        if id == 503 {
            return Err(AppError::Upstream { status: 503 });
        }
        Ok(serde_json::from_value(json!({
            "id": id,
            "title": format!("movie-{}", id),
            "release_date": "2010-07-15"
        }))
        .unwrap())
    }

    async fn movie_credits(&self, id: u64) -> AppResult<Credits> {
        Ok(serde_json::from_value(json!({
            "id": id,
            "cast": [{"id": 1, "name": "Lead", "character": "Hero", "order": 0}],
            "crew": []
        }))
        .unwrap())
    }

    async fn movie_videos(&self, id: u64) -> AppResult<VideoList> {
        Ok(serde_json::from_value(json!({"id": id, "results": []})).unwrap())
    }

    async fn similar_movies(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(&format!("similar-movie-{}-{}", id, page), page))
    }

    async fn popular_tv(&self, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(&format!("popular-tv-{}", page), page))
    }

    async fn tv_by_genre(&self, genre_id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(&format!("tv-genre-{}-{}", genre_id, page), page))
    }

    async fn tv_detail(&self, id: u64) -> AppResult<TvShow> {
        Ok(serde_json::from_value(json!({
            "id": id,
            "name": format!("tv-{}", id),
            "first_air_date": "2011-04-17"
        }))
        .unwrap())
    }

    async fn tv_credits(&self, id: u64) -> AppResult<Credits> {
        Ok(serde_json::from_value(json!({"id": id, "cast": [], "crew": []})).unwrap())
    }

    async fn tv_videos(&self, id: u64) -> AppResult<VideoList> {
        Ok(serde_json::from_value(json!({"id": id, "results": []})).unwrap())
    }

    async fn similar_tv(&self, id: u64, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        Ok(labeled_page(&format!("similar-tv-{}-{}", id, page), page))
    }

    async fn search_multi(&self, query: &str, page: u32) -> AppResult<PaginatedPage<MediaItem>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(labeled_page(&format!("search-{}-{}", query, page), page))
    }

    async fn movie_genres(&self) -> AppResult<GenreList> {
        self.movie_genre_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenreList {
            genres: vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }],
        })
    }

    async fn tv_genres(&self) -> AppResult<GenreList> {
        Ok(GenreList {
            genres: vec![Genre {
                id: 16,
                name: "Animation".to_string(),
            }],
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn create_test_server() -> (TestServer, Arc<FakeCatalog>) {
    let provider = Arc::new(FakeCatalog::default());
    let catalog = CatalogService::new(provider.clone(), Cache::new());
    let state = AppState {
        catalog: Arc::new(catalog),
        watchlist: Arc::new(WatchlistStore::in_memory()),
    };
    (TestServer::new(create_router(state)).unwrap(), provider)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_genres_default_to_movie() {
    let (server, _) = create_test_server();
    let response = server.get("/api/genres").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["genres"][0]["name"], "Action");
}

#[tokio::test]
async fn test_genres_tv_type() {
    let (server, _) = create_test_server();
    let response = server.get("/api/genres").add_query_param("type", "tv").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["genres"][0]["name"], "Animation");
}

#[tokio::test]
async fn test_genre_list_fetched_once_per_session() {
    let (server, provider) = create_test_server();

    for _ in 0..3 {
        server.get("/api/genres").await.assert_status_ok();
    }

    assert_eq!(provider.movie_genre_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_movies_without_genre_serves_popular() {
    let (server, _) = create_test_server();
    let response = server.get("/api/movies").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["results"][0]["title"], "popular-movies-1");
}

#[tokio::test]
async fn test_movies_with_genre_serves_discover_payload() {
    let (server, _) = create_test_server();
    let response = server
        .get("/api/movies")
        .add_query_param("genre", "28")
        .add_query_param("page", "2")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["page"], 2);
    assert_eq!(body["results"][0]["title"], "movies-genre-28-2");
}

#[tokio::test]
async fn test_malformed_page_coerces_to_first_page() {
    let (server, _) = create_test_server();
    let response = server
        .get("/api/movies")
        .add_query_param("page", "abc")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "popular-movies-1");
}

#[tokio::test]
async fn test_malformed_genre_falls_back_to_popular() {
    let (server, _) = create_test_server();
    let response = server
        .get("/api/movies")
        .add_query_param("genre", "action")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "popular-movies-1");
}

#[tokio::test]
async fn test_tv_with_genre_serves_discover_payload() {
    let (server, _) = create_test_server();
    let response = server.get("/api/tv").add_query_param("genre", "16").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "tv-genre-16-1");
}

#[tokio::test]
async fn test_movie_detail_family() {
    let (server, _) = create_test_server();

    let detail: serde_json::Value = server.get("/api/movies/550").await.json();
    assert_eq!(detail["title"], "movie-550");

    let credits: serde_json::Value = server.get("/api/movies/550/credits").await.json();
    assert_eq!(credits["cast"][0]["name"], "Lead");

    let videos: serde_json::Value = server.get("/api/movies/550/videos").await.json();
    assert_eq!(videos["id"], 550);

    let similar: serde_json::Value = server.get("/api/movies/550/similar").await.json();
    assert_eq!(similar["results"][0]["title"], "similar-movie-550-1");
}

#[tokio::test]
async fn test_tv_detail_family() {
    let (server, _) = create_test_server();

    let detail: serde_json::Value = server.get("/api/tv/1399").await.json();
    assert_eq!(detail["name"], "tv-1399");

    let similar: serde_json::Value = server.get("/api/tv/1399/similar").await.json();
    assert_eq!(similar["results"][0]["title"], "similar-tv-1399-1");
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let (server, _) = create_test_server();
    let response = server.get("/api/movies/503").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_blank_search_short_circuits_without_upstream_call() {
    let (server, provider) = create_test_server();

    let response = server.get("/api/search").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        json!({"results": [], "page": 1, "total_pages": 0, "total_results": 0})
    );

    let response = server.get("/api/search").add_query_param("q", "   ").await;
    response.assert_status_ok();

    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_passes_query_and_page() {
    let (server, provider) = create_test_server();
    let response = server
        .get("/api/search")
        .add_query_param("q", "inception")
        .add_query_param("page", "2")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "search-inception-2");
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_repeated_search_is_served_from_cache() {
    let (server, provider) = create_test_server();

    for _ in 0..2 {
        server
            .get("/api/search")
            .add_query_param("q", "dune")
            .await
            .assert_status_ok();
    }

    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_trending_defaults() {
    let (server, _) = create_test_server();
    let response = server.get("/api/trending").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "trending-all-week-1");
}

#[tokio::test]
async fn test_trending_with_filters() {
    let (server, _) = create_test_server();
    let response = server
        .get("/api/trending")
        .add_query_param("mediaType", "movie")
        .add_query_param("timeWindow", "day")
        .add_query_param("page", "3")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "trending-movie-day-3");
}

#[tokio::test]
async fn test_trending_unknown_filters_coerce_to_defaults() {
    let (server, _) = create_test_server();
    let response = server
        .get("/api/trending")
        .add_query_param("mediaType", "books")
        .add_query_param("timeWindow", "month")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"][0]["title"], "trending-all-week-1");
}

fn watchlist_body(id: u64, media_type: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "media_type": media_type,
        "title": title,
        "poster_path": "/p.jpg",
        "vote_average": 8.4,
        "release_date": "1999-10-15",
        "overview": "overview"
    })
}

#[tokio::test]
async fn test_watchlist_add_and_list() {
    let (server, _) = create_test_server();

    let response = server.get("/api/watchlist").await;
    response.assert_status_ok();
    let items: Vec<serde_json::Value> = response.json();
    assert!(items.is_empty());

    let response = server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "movie", "Fight Club"))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["added"], true);

    let items: Vec<serde_json::Value> = server.get("/api/watchlist").await.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Fight Club");
    assert!(items[0]["added_at"].is_string());
}

#[tokio::test]
async fn test_watchlist_duplicate_add_is_noop() {
    let (server, _) = create_test_server();

    server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "movie", "Fight Club"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "movie", "Fight Club"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["added"], false);

    let items: Vec<serde_json::Value> = server.get("/api/watchlist").await.json();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_watchlist_same_id_across_media_types() {
    let (server, _) = create_test_server();

    server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "movie", "a movie"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "tv", "a show"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let items: Vec<serde_json::Value> = server.get("/api/watchlist").await.json();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_watchlist_remove_and_clear() {
    let (server, _) = create_test_server();

    server
        .post("/api/watchlist")
        .json(&watchlist_body(550, "movie", "a"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    server
        .post("/api/watchlist")
        .json(&watchlist_body(1399, "tv", "b"))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server.delete("/api/watchlist/movie/550").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    // Removing again is still a success.
    let response = server.delete("/api/watchlist/movie/550").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let items: Vec<serde_json::Value> = server.get("/api/watchlist").await.json();
    assert_eq!(items.len(), 1);

    let response = server.delete("/api/watchlist").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let items: Vec<serde_json::Value> = server.get("/api/watchlist").await.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_watchlist_remove_rejects_unknown_media_type() {
    let (server, _) = create_test_server();
    let response = server.delete("/api/watchlist/book/550").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
