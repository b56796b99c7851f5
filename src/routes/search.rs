use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{validate_page, AppState};
use crate::{
    error::AppResult,
    models::{GenreLabel, MediaKind, Movie, SearchFilters, GENRES},
    paging::{LoadResult, PagingKey},
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    kind: Option<MediaKind>,
    query: Option<String>,
    /// Comma-separated genre ids
    genres: Option<String>,
    year: Option<i32>,
    sort_by: Option<String>,
    page: Option<PagingKey>,
}

impl SearchQuery {
    fn filters(&self) -> AppResult<SearchFilters> {
        Ok(SearchFilters {
            kind: self.kind.unwrap_or_default(),
            query: self.query.clone().unwrap_or_default(),
            genres: SearchFilters::parse_genres(self.genres.as_deref().unwrap_or(""))?,
            year: self.year,
            sort_by: self
                .sort_by
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Text search when `query` is set, discover otherwise
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<LoadResult<Movie>> {
    let key = validate_page(params.page)?;
    let filters = params.filters()?;

    tracing::debug!(
        kind = %filters.kind,
        has_query = filters.has_query(),
        genres = filters.genres.len(),
        year = ?filters.year,
        "Search"
    );

    Ok(state.catalog.search_source(filters).load(key).await)
}

/// Genres offered as search filters
pub async fn genres() -> Json<&'static [GenreLabel]> {
    Json(GENRES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_maps_to_default_filters() {
        let filters = SearchQuery::default().filters().unwrap();
        assert!(filters.is_default());
    }

    #[test]
    fn test_query_to_filters() {
        let params = SearchQuery {
            kind: Some(MediaKind::Series),
            query: Some("dark".to_string()),
            genres: Some("18, 9648,18".to_string()),
            year: Some(2017),
            sort_by: Some("  ".to_string()),
            page: Some(2),
        };

        let filters = params.filters().unwrap();
        assert_eq!(filters.kind, MediaKind::Series);
        assert_eq!(filters.genres, vec![18, 9648]);
        assert_eq!(filters.year, Some(2017));
        assert_eq!(filters.sort_by, None);
    }

    #[test]
    fn test_invalid_genre_rejected() {
        let params = SearchQuery {
            genres: Some("action".to_string()),
            ..SearchQuery::default()
        };
        assert!(params.filters().is_err());
    }
}
