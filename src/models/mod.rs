use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod genres;
pub mod saved_title;
pub mod search_filters;

pub use genres::{GenreLabel, GENRES};
pub use saved_title::{SavedList, SavedTitle};
pub use search_filters::SearchFilters;

/// Kind of catalog entry. Together with the numeric id it identifies an item.
///
/// Serialized as the catalog's path segment (`movie` / `tv`), which is also
/// what the local store persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "tv" | "series" => Ok(MediaKind::Series),
            other => Err(AppError::InvalidInput(format!(
                "Unknown media kind: {}",
                other
            ))),
        }
    }
}

/// One page of a catalog list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> PageEnvelope<T> {
    pub fn new(page: u32, results: Vec<T>, total_pages: u32, total_results: u32) -> Self {
        Self {
            page,
            results,
            total_pages,
            total_results,
        }
    }
}

// ============================================================================
// Catalog list items
// ============================================================================

/// Catalog list item. Movie lists fill `title`, series search results fill `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u32,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub name: Option<String>,
    pub title: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub original_title: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Items carrying a `title` are movies; everything else is a series
    pub fn media_kind(&self) -> MediaKind {
        if self.has_title() {
            MediaKind::Movie
        } else {
            MediaKind::Series
        }
    }

    pub fn display_title(&self) -> Option<&str> {
        if self.has_title() {
            self.title.as_deref()
        } else {
            self.name.as_deref()
        }
    }

    pub fn display_release_date(&self) -> Option<&str> {
        match self.media_kind() {
            MediaKind::Movie => self.release_date.as_deref(),
            MediaKind::Series => self.first_air_date.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: u32,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub popularity: f64,
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

// ============================================================================
// Detail types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Production company or network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u32,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub popularity: f64,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub backdrop_path: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<Production>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
    pub season_number: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    pub episode_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub runtime: Option<u32>,
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub season_number: Option<u32>,
    pub episode_type: Option<String>,
    pub episode_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u32,
    #[serde(default)]
    pub gender: u8,
    #[serde(default)]
    pub name: String,
    pub credit_id: Option<String>,
    pub profile_path: Option<String>,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub id: u32,
    #[serde(rename = "type")]
    pub series_type: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub name: Option<String>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub networks: Vec<Production>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub in_production: bool,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub number_of_episodes: u32,
    pub last_air_date: Option<String>,
    pub original_name: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    pub original_language: Option<String>,
    pub last_episode_to_air: Option<Episode>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<Production>,
}

// ============================================================================
// Media attachments
// ============================================================================

/// Trailer or clip metadata. `id` is the catalog's string id and is unique per video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_path: String,
    #[serde(default)]
    pub aspect_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonImagesResponse {
    #[serde(default)]
    pub profiles: Vec<Image>,
}

// ============================================================================
// People
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub name: Option<String>,
    #[serde(default)]
    pub gender: u8,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<Actor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u32,
    #[serde(default)]
    pub gender: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub deathday: Option<String>,
    pub birthday: Option<String>,
    pub biography: Option<String>,
    pub imdb_id: Option<String>,
    pub profile_path: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
}

/// A person's cast credit across movies and series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedCast {
    pub id: u32,
    // movie only
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub original_title: Option<String>,
    // series only
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,

    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub order: Option<u32>,
    pub overview: Option<String>,
    pub character: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_average: f64,
    pub credit_id: Option<String>,
    pub media_type: Option<MediaKind>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl CombinedCast {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().or(self.name.as_deref()).unwrap_or("")
    }
}

/// A person's crew credit across movies and series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedCrew {
    pub id: u32,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub original_title: Option<String>,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,

    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub job: Option<String>,
    pub overview: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    pub media_type: Option<MediaKind>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
    pub credit_id: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub original_language: Option<String>,
}

impl CombinedCrew {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().or(self.name.as_deref()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedCreditsResponse {
    #[serde(default)]
    pub cast: Vec<CombinedCast>,
    #[serde(default)]
    pub crew: Vec<CombinedCrew>,
}
