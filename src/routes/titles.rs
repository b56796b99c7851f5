use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::{AppState, PageQuery};
use crate::{
    error::AppResult,
    models::{
        CreditsResponse, ImagesResponse, MediaKind, Movie, MovieDetail, Series, SeriesDetail, Video,
    },
    paging::LoadResult,
    services::{MovieList, SeriesList},
};

/// Names of the curated lists
pub async fn lists() -> Json<Value> {
    Json(json!({
        "movies": MovieList::ALL,
        "series": SeriesList::ALL,
    }))
}

/// One page of a curated movie list
pub async fn movie_list(
    State(state): State<AppState>,
    Path(list): Path<MovieList>,
    Query(query): Query<PageQuery>,
) -> AppResult<LoadResult<Movie>> {
    let key = query.key()?;
    Ok(state.catalog.movie_list_source(list).load(key).await)
}

/// One page of a curated series list
pub async fn series_list(
    State(state): State<AppState>,
    Path(list): Path<SeriesList>,
    Query(query): Query<PageQuery>,
) -> AppResult<LoadResult<Series>> {
    let key = query.key()?;
    Ok(state.catalog.series_list_source(list).load(key).await)
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<MovieDetail>> {
    Ok(Json(state.catalog.movie_details(id).await?))
}

pub async fn series_details(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<SeriesDetail>> {
    Ok(Json(state.catalog.series_details(id).await?))
}

pub async fn movie_videos(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Vec<Video>>> {
    Ok(Json(state.catalog.videos(MediaKind::Movie, id).await?))
}

pub async fn series_videos(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Vec<Video>>> {
    Ok(Json(state.catalog.videos(MediaKind::Series, id).await?))
}

pub async fn movie_images(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<ImagesResponse>> {
    Ok(Json(state.catalog.images(MediaKind::Movie, id).await?))
}

pub async fn series_images(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<ImagesResponse>> {
    Ok(Json(state.catalog.images(MediaKind::Series, id).await?))
}

pub async fn movie_credits(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<CreditsResponse>> {
    Ok(Json(state.catalog.credits(MediaKind::Movie, id).await?))
}

pub async fn series_credits(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<CreditsResponse>> {
    Ok(Json(state.catalog.credits(MediaKind::Series, id).await?))
}
