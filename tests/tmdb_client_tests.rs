use std::time::Duration;

use axum::{
    extract::Query,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;

use moviefinder::{
    error::AppError,
    models::{MediaKind, SearchFilters},
    services::{CatalogApi, MovieList, SeriesList, TmdbClient},
};

/// Echoes the decoded query string, in order, as `k=v&k=v`
fn echo(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

async fn stub_catalog(uri: Uri, Query(params): Query<Vec<(String, String)>>) -> Response {
    let page: u32 = param(&params, "page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    match uri.path() {
        "/3/movie/500" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "/3/tv/404" => (StatusCode::NOT_FOUND, "no such series").into_response(),
        "/3/tv/1" => (StatusCode::OK, "{\"id\": ").into_response(),
        "/3/movie/550" => Json(json!({
            "id": 550,
            "title": "Fight Club",
            "overview": echo(&params),
        }))
        .into_response(),
        "/3/movie/550/videos" => {
            let language = param(&params, "language").unwrap_or("none");
            Json(json!({
                "id": 550,
                "results": [{ "id": format!("v-{}", language), "name": language }],
            }))
            .into_response()
        }
        "/3/person/287/combined_credits" => Json(json!({
            "cast": [{ "id": 550, "title": "Fight Club", "media_type": "movie" }],
            "crew": [{ "id": 1, "name": "Show", "media_type": "tv", "job": "Producer" }],
        }))
        .into_response(),
        path => Json(json!({
            "page": page,
            "results": [{ "id": 1, "title": path, "name": path, "overview": echo(&params) }],
            "total_pages": 3,
            "total_results": 3,
        }))
        .into_response(),
    }
}

async fn spawn_client() -> TmdbClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(stub_catalog);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TmdbClient::new(
        "test-key".to_string(),
        format!("http://{}", addr),
        "de-DE".to_string(),
        "DE".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_movie_list_request() {
    let client = spawn_client().await;

    let envelope = client.movie_list(MovieList::TopRated, 2).await.unwrap();

    assert_eq!(envelope.page, 2);
    assert_eq!(envelope.total_pages, 3);
    let item = &envelope.results[0];
    assert_eq!(item.title.as_deref(), Some("/3/movie/top_rated"));
    assert_eq!(
        item.overview.as_deref(),
        Some("api_key=test-key&language=de-DE&page=2")
    );
}

#[tokio::test]
async fn test_free_to_watch_adds_monetization_and_region() {
    let client = spawn_client().await;

    let series = client.series_list(SeriesList::FreeToWatch, 1).await.unwrap();
    assert_eq!(series.results[0].name, "/3/discover/tv");
    assert!(series.results[0]
        .overview
        .as_deref()
        .is_some_and(|q| q.ends_with("&with_watch_monetization_types=free&watch_region=DE")));

    let movies = client.movie_list(MovieList::FreeToWatch, 1).await.unwrap();
    assert_eq!(movies.results[0].title.as_deref(), Some("/3/discover/movie"));
    assert_eq!(
        movies.results[0].overview.as_deref(),
        Some(
            "api_key=test-key&language=de-DE&page=1\
             &with_watch_monetization_types=free&watch_region=DE"
        )
    );
}

#[tokio::test]
async fn test_search_parameter_order() {
    let client = spawn_client().await;
    let filters = SearchFilters {
        kind: MediaKind::Movie,
        query: "dark city".to_string(),
        genres: vec![18, 9648],
        year: Some(1998),
        sort_by: Some("popularity.desc".to_string()),
    };

    let envelope = client.search(&filters, 3).await.unwrap();

    let item = &envelope.results[0];
    assert_eq!(item.title.as_deref(), Some("/3/search/movie"));
    assert_eq!(
        item.overview.as_deref(),
        Some(
            "api_key=test-key&language=de-DE&sort_by=popularity.desc&page=3\
             &query=dark city&with_genres=18,9648&primary_release_year=1998"
        )
    );
}

#[tokio::test]
async fn test_discover_series_uses_first_air_date_year() {
    let client = spawn_client().await;
    let filters = SearchFilters {
        kind: MediaKind::Series,
        year: Some(2017),
        ..SearchFilters::default()
    };

    let envelope = client.discover(&filters, 1).await.unwrap();

    let item = &envelope.results[0];
    assert_eq!(item.title.as_deref(), Some("/3/discover/tv"));
    assert_eq!(
        item.overview.as_deref(),
        Some("api_key=test-key&language=de-DE&page=1&first_air_date_year=2017")
    );
}

#[tokio::test]
async fn test_non_success_status_carries_status_and_path() {
    let client = spawn_client().await;

    let err = client.movie_details(500).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::CatalogStatus { status: 500, ref path } if path == "movie/500"
    ));
    assert_eq!(err.to_string(), "Catalog \"movie/500\" error: HTTP 500");

    let err = client.series_details(404).await.unwrap_err();
    assert!(matches!(err, AppError::CatalogStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let client = spawn_client().await;

    let err = client.series_details(1).await.unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse { ref path, .. } if path == "tv/1"));
}

#[tokio::test]
async fn test_details_without_cache() {
    let client = spawn_client().await;

    let detail = client.movie_details(550).await.unwrap();
    assert_eq!(detail.title, "Fight Club");
    assert_eq!(
        detail.overview.as_deref(),
        Some("api_key=test-key&language=de-DE")
    );
}

#[tokio::test]
async fn test_videos_use_requested_language() {
    let client = spawn_client().await;

    let videos = client.videos(MediaKind::Movie, 550, "en-US").await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "v-en-US");
}

#[tokio::test]
async fn test_person_credits() {
    let client = spawn_client().await;

    let credits = client.person_credits(287).await.unwrap();
    assert_eq!(credits.cast[0].media_type, Some(MediaKind::Movie));
    assert_eq!(credits.crew[0].media_type, Some(MediaKind::Series));
    assert_eq!(credits.crew[0].display_title(), "Show");
}

#[tokio::test]
async fn test_unreachable_catalog_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TmdbClient::new(
        "test-key".to_string(),
        format!("http://{}", addr),
        "en-US".to_string(),
        "US".to_string(),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.movie_list(MovieList::Popular, 1).await.unwrap_err();
    assert!(matches!(err, AppError::HttpClient(_)));
}
