use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaKind, Movie, MovieDetail, SeriesDetail};

/// Which local list a title is saved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavedList {
    /// Bookmarked titles
    Favorites,
    /// Titles opened from search results
    History,
}

impl SavedList {
    pub fn table(&self) -> &'static str {
        match self {
            SavedList::Favorites => "favorites",
            SavedList::History => "history",
        }
    }
}

/// A title persisted in the local store, keyed by `(id, media_kind)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTitle {
    pub id: u32,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub vote_average: f64,
    pub title: Option<String>,
    #[serde(default)]
    pub adult: bool,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl SavedTitle {
    pub fn key(&self) -> (u32, MediaKind) {
        (self.id, self.media_kind)
    }

    /// History entry for a search result
    pub fn from_movie(movie: &Movie, created_at: DateTime<Utc>) -> Self {
        Self {
            id: movie.id,
            media_kind: movie.media_kind(),
            created_at,
            vote_average: movie.vote_average,
            title: movie.display_title().map(str::to_string),
            adult: movie.adult,
            overview: movie.overview.clone(),
            poster_path: movie.poster_path.clone(),
            release_date: movie.display_release_date().map(str::to_string),
            genre_ids: movie.genre_ids.clone(),
        }
    }

    pub fn from_movie_detail(detail: &MovieDetail, created_at: DateTime<Utc>) -> Self {
        Self {
            id: detail.id,
            media_kind: MediaKind::Movie,
            created_at,
            vote_average: detail.vote_average,
            title: Some(detail.title.clone()),
            adult: detail.adult,
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            release_date: detail.release_date.clone(),
            genre_ids: detail.genres.iter().map(|g| g.id).collect(),
        }
    }

    pub fn from_series_detail(detail: &SeriesDetail, created_at: DateTime<Utc>) -> Self {
        Self {
            id: detail.id,
            media_kind: MediaKind::Series,
            created_at,
            vote_average: detail.vote_average,
            title: detail.name.clone(),
            adult: detail.adult,
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            release_date: detail.first_air_date.clone(),
            genre_ids: detail.genres.iter().map(|g| g.id).collect(),
        }
    }
}

/// Stored form of a genre list: `"28,12"`
pub fn join_genre_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`join_genre_ids`]; malformed fragments are dropped
pub fn split_genre_ids(stored: &str) -> Vec<u32> {
    stored
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn sample_movie(title: Option<&str>, name: Option<&str>) -> Movie {
        Movie {
            id: 603,
            adult: false,
            popularity: 50.0,
            name: name.map(str::to_string),
            title: title.map(str::to_string),
            overview: Some("overview".to_string()),
            vote_count: 100,
            vote_average: 8.2,
            poster_path: Some("/poster.jpg".to_string()),
            release_date: Some("1999-03-31".to_string()),
            backdrop_path: None,
            first_air_date: Some("2008-01-20".to_string()),
            original_title: None,
            genre_ids: vec![28, 878],
        }
    }

    #[test]
    fn test_from_movie_with_title_is_movie() {
        let saved = SavedTitle::from_movie(&sample_movie(Some("The Matrix"), None), Utc::now());

        assert_eq!(saved.key(), (603, MediaKind::Movie));
        assert_eq!(saved.title.as_deref(), Some("The Matrix"));
        assert_eq!(saved.release_date.as_deref(), Some("1999-03-31"));
        assert_eq!(saved.genre_ids, vec![28, 878]);
    }

    #[test]
    fn test_from_movie_without_title_is_series() {
        let saved = SavedTitle::from_movie(&sample_movie(None, Some("Breaking Bad")), Utc::now());

        assert_eq!(saved.media_kind, MediaKind::Series);
        assert_eq!(saved.title.as_deref(), Some("Breaking Bad"));
        assert_eq!(saved.release_date.as_deref(), Some("2008-01-20"));
    }

    #[test]
    fn test_from_movie_detail_collects_genre_ids() {
        let detail: MovieDetail = serde_json::from_value(serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "vote_average": 8.4,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }))
        .unwrap();

        let saved = SavedTitle::from_movie_detail(&detail, Utc::now());
        assert_eq!(saved.key(), (27205, MediaKind::Movie));
        assert_eq!(saved.genre_ids, vec![28, 878]);
        assert_eq!(
            detail.genres[0],
            Genre {
                id: 28,
                name: "Action".to_string()
            }
        );
    }

    #[test]
    fn test_genre_id_codec() {
        assert_eq!(join_genre_ids(&[28, 12]), "28,12");
        assert_eq!(join_genre_ids(&[]), "");
        assert_eq!(split_genre_ids("28,12"), vec![28, 12]);
        assert!(split_genre_ids("").is_empty());
        assert_eq!(split_genre_ids("28,x,12"), vec![28, 12]);
    }

    #[test]
    fn test_saved_list_serde() {
        assert_eq!(
            serde_json::to_string(&SavedList::Favorites).unwrap(),
            "\"favorites\""
        );
        assert_eq!(SavedList::History.table(), "history");
    }
}
