use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::{
    error::AppResult,
    models::{CombinedCreditsResponse, Person, PersonImagesResponse},
};

pub async fn person(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Person>> {
    Ok(Json(state.catalog.person(id).await?))
}

/// Cast and crew credits across movies and series
pub async fn credits(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<CombinedCreditsResponse>> {
    Ok(Json(state.catalog.person_credits(id).await?))
}

pub async fn images(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<PersonImagesResponse>> {
    Ok(Json(state.catalog.person_images(id).await?))
}
