use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AppState, PageQuery};
use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, Movie, SavedList, SavedTitle},
    paging::{LoadResult, PagingSource},
};

#[derive(Debug, Deserialize)]
pub struct SavedTitlePath {
    list: SavedList,
    kind: MediaKind,
    id: u32,
}

/// One page of favorites or history, newest first
pub async fn list(
    State(state): State<AppState>,
    Path(list): Path<SavedList>,
    Query(query): Query<PageQuery>,
) -> AppResult<LoadResult<SavedTitle>> {
    let key = query.key()?;
    let source = state.store.source(list, state.saved_page_size);
    Ok(source.load(key).await)
}

/// Saves a catalog list item. Saving it again moves it to the top.
pub async fn save(
    State(state): State<AppState>,
    Path(list): Path<SavedList>,
    Json(item): Json<Movie>,
) -> AppResult<(StatusCode, Json<SavedTitle>)> {
    let saved = SavedTitle::from_movie(&item, Utc::now());
    state.store.insert(list, &saved).await?;

    tracing::info!(list = list.table(), id = saved.id, media_kind = %saved.media_kind, "Title saved");

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Saves a title by id, taking its fields from the catalog details
pub async fn save_by_id(
    State(state): State<AppState>,
    Path(path): Path<SavedTitlePath>,
) -> AppResult<(StatusCode, Json<SavedTitle>)> {
    let now = Utc::now();
    let saved = match path.kind {
        MediaKind::Movie => {
            SavedTitle::from_movie_detail(&state.catalog.movie_details(path.id).await?, now)
        }
        MediaKind::Series => {
            SavedTitle::from_series_detail(&state.catalog.series_details(path.id).await?, now)
        }
    };
    state.store.insert(path.list, &saved).await?;

    tracing::info!(list = path.list.table(), id = saved.id, media_kind = %saved.media_kind, "Title saved");

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn contains(
    State(state): State<AppState>,
    Path(path): Path<SavedTitlePath>,
) -> AppResult<Json<Value>> {
    let saved = state.store.contains(path.list, path.id, path.kind).await?;
    Ok(Json(json!({ "saved": saved })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(path): Path<SavedTitlePath>,
) -> AppResult<StatusCode> {
    if state.store.remove(path.list, path.id, path.kind).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "{} {} is not in {}",
            path.kind,
            path.id,
            path.list.table()
        )))
    }
}
