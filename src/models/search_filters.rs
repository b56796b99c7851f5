use serde::{Deserialize, Serialize};

use super::MediaKind;
use crate::error::{AppError, AppResult};

/// Parameters of one search/discover sequence.
///
/// A sequence never changes its filters; a new set of filters means a new
/// paging source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub query: String,
    /// Genre ids, matched with OR semantics
    #[serde(default)]
    pub genres: Vec<u32>,
    pub year: Option<i32>,
    pub sort_by: Option<String>,
}

impl SearchFilters {
    /// Whether the free-text query selects the search endpoint over discover
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Untouched filters: nothing to search for yet
    pub fn is_default(&self) -> bool {
        self.kind == MediaKind::Movie
            && !self.has_query()
            && self.genres.is_empty()
            && self.year.is_none()
            && self.sort_by.is_none()
    }

    fn year_param(&self) -> &'static str {
        match self.kind {
            MediaKind::Movie => "primary_release_year",
            MediaKind::Series => "first_air_date_year",
        }
    }

    /// Filter parameters shared by search and discover, in request order
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.genres.is_empty() {
            let joined = self
                .genres
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("with_genres", joined));
        }
        if let Some(year) = self.year {
            params.push((self.year_param(), year.to_string()));
        }
        params
    }

    /// Parameters for the text search endpoint
    pub fn search_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.clone())];
        params.extend(self.filter_params());
        params
    }

    /// Parses a comma-separated genre list (`"28,12"`), dropping duplicates
    pub fn parse_genres(raw: &str) -> AppResult<Vec<u32>> {
        let mut genres = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id: u32 = part
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("Invalid genre id: {}", part)))?;
            if !genres.contains(&id) {
                genres.push(id);
            }
        }
        Ok(genres)
    }
}
