use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    paging::{LoadResult, PagingKey},
};

pub mod people;
pub mod saved;
pub mod search;
pub mod state;
pub mod titles;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            // The request id has to exist before the trace span is created.
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Curated lists
        .route("/lists", get(titles::lists))
        .route("/movies/lists/:list", get(titles::movie_list))
        .route("/series/lists/:list", get(titles::series_list))
        // Search and discover
        .route("/search", get(search::search))
        .route("/genres", get(search::genres))
        // Title details and attachments
        .route("/movies/:id", get(titles::movie_details))
        .route("/movies/:id/videos", get(titles::movie_videos))
        .route("/movies/:id/images", get(titles::movie_images))
        .route("/movies/:id/credits", get(titles::movie_credits))
        .route("/series/:id", get(titles::series_details))
        .route("/series/:id/videos", get(titles::series_videos))
        .route("/series/:id/images", get(titles::series_images))
        .route("/series/:id/credits", get(titles::series_credits))
        // People
        .route("/people/:id", get(people::person))
        .route("/people/:id/credits", get(people::credits))
        .route("/people/:id/images", get(people::images))
        // Favorites and history
        .route("/saved/:list", get(saved::list).post(saved::save))
        .route(
            "/saved/:list/:kind/:id",
            get(saved::contains)
                .put(saved::save_by_id)
                .delete(saved::remove),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// `?page=` of a paged endpoint. Absent means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<PagingKey>,
}

impl PageQuery {
    pub fn key(&self) -> AppResult<Option<PagingKey>> {
        validate_page(self.page)
    }
}

/// Pages are 1-indexed
pub fn validate_page(page: Option<PagingKey>) -> AppResult<Option<PagingKey>> {
    match page {
        Some(0) => Err(AppError::InvalidInput(
            "Page numbers start at 1".to_string(),
        )),
        other => Ok(other),
    }
}

impl<T: Serialize> IntoResponse for LoadResult<T> {
    fn into_response(self) -> Response {
        match self {
            LoadResult::Page(page) => (StatusCode::OK, Json(page)).into_response(),
            LoadResult::Error(cause) => cause.to_response(),
        }
    }
}
