//! Remote catalog abstraction
//!
//! The catalog serves paged title lists, text search, filtered discovery and
//! per-title details. `TmdbClient` talks to TMDB; tests substitute a mock.

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{
        CombinedCreditsResponse, CreditsResponse, ImagesResponse, MediaKind, Movie, MovieDetail,
        PageEnvelope, Person, PersonImagesResponse, SearchFilters, Series, SeriesDetail, Video,
    },
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Curated movie lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    TrendingDay,
    TrendingWeek,
    /// Discover restricted to free monetization in the configured region
    FreeToWatch,
}

impl MovieList {
    pub const ALL: [MovieList; 7] = [
        MovieList::Popular,
        MovieList::TopRated,
        MovieList::NowPlaying,
        MovieList::Upcoming,
        MovieList::TrendingDay,
        MovieList::TrendingWeek,
        MovieList::FreeToWatch,
    ];

    /// Catalog path below the API version prefix
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::Popular => "movie/popular",
            MovieList::TopRated => "movie/top_rated",
            MovieList::NowPlaying => "movie/now_playing",
            MovieList::Upcoming => "movie/upcoming",
            MovieList::TrendingDay => "trending/movie/day",
            MovieList::TrendingWeek => "trending/movie/week",
            MovieList::FreeToWatch => "discover/movie",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovieList::Popular => "movies.popular",
            MovieList::TopRated => "movies.top_rated",
            MovieList::NowPlaying => "movies.now_playing",
            MovieList::Upcoming => "movies.upcoming",
            MovieList::TrendingDay => "movies.trending_day",
            MovieList::TrendingWeek => "movies.trending_week",
            MovieList::FreeToWatch => "movies.free_to_watch",
        }
    }
}

/// Curated series lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesList {
    Popular,
    TopRated,
    OnTheAir,
    AiringToday,
    TrendingWeek,
    FreeToWatch,
}

impl SeriesList {
    pub const ALL: [SeriesList; 6] = [
        SeriesList::Popular,
        SeriesList::TopRated,
        SeriesList::OnTheAir,
        SeriesList::AiringToday,
        SeriesList::TrendingWeek,
        SeriesList::FreeToWatch,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            SeriesList::Popular => "tv/popular",
            SeriesList::TopRated => "tv/top_rated",
            SeriesList::OnTheAir => "tv/on_the_air",
            SeriesList::AiringToday => "tv/airing_today",
            SeriesList::TrendingWeek => "trending/tv/week",
            SeriesList::FreeToWatch => "discover/tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesList::Popular => "series.popular",
            SeriesList::TopRated => "series.top_rated",
            SeriesList::OnTheAir => "series.on_the_air",
            SeriesList::AiringToday => "series.airing_today",
            SeriesList::TrendingWeek => "series.trending_week",
            SeriesList::FreeToWatch => "series.free_to_watch",
        }
    }
}

/// Logical catalog endpoints.
///
/// List methods take a 1-indexed page and return the raw envelope; turning
/// envelopes into pages with continuation keys is the paging layer's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    async fn movie_list(&self, list: MovieList, page: u32) -> AppResult<PageEnvelope<Movie>>;

    async fn series_list(&self, list: SeriesList, page: u32) -> AppResult<PageEnvelope<Series>>;

    /// Free-text search of `filters.kind`. Items carry `title` for movies and `name` for series.
    async fn search(&self, filters: &SearchFilters, page: u32) -> AppResult<PageEnvelope<Movie>>;

    /// Filtered discovery of `filters.kind`; the query is ignored
    async fn discover(&self, filters: &SearchFilters, page: u32)
        -> AppResult<PageEnvelope<Movie>>;

    async fn movie_details(&self, id: u32) -> AppResult<MovieDetail>;

    async fn series_details(&self, id: u32) -> AppResult<SeriesDetail>;

    /// Videos of one title in one language
    async fn videos(&self, kind: MediaKind, id: u32, language: &str) -> AppResult<Vec<Video>>;

    async fn images(&self, kind: MediaKind, id: u32) -> AppResult<ImagesResponse>;

    async fn credits(&self, kind: MediaKind, id: u32) -> AppResult<CreditsResponse>;

    async fn person(&self, id: u32) -> AppResult<Person>;

    async fn person_credits(&self, id: u32) -> AppResult<CombinedCreditsResponse>;

    async fn person_images(&self, id: u32) -> AppResult<PersonImagesResponse>;
}
