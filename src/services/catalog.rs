use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        CombinedCreditsResponse, CreditsResponse, ImagesResponse, MediaKind, Movie, MovieDetail,
        Person, PersonImagesResponse, SearchFilters, Series, SeriesDetail, Video,
    },
    paging::{EmptySource, PagedFetcher, PagingKey, PagingSource},
    services::providers::{CatalogApi, MovieList, SeriesList},
};

/// Entry point for catalog reads.
///
/// Builds paging sources for lists and search, and merges the two-language
/// video lookup. Everything else is passed through to the [`CatalogApi`].
#[derive(Clone)]
pub struct CatalogRepository {
    api: Arc<dyn CatalogApi>,
    language: String,
    fallback_language: String,
}

impl CatalogRepository {
    pub fn new(api: Arc<dyn CatalogApi>, language: String, fallback_language: String) -> Self {
        Self {
            api,
            language,
            fallback_language,
        }
    }

    pub fn movie_list_source(&self, list: MovieList) -> Arc<dyn PagingSource<Movie>> {
        let api = self.api.clone();
        Arc::new(PagedFetcher::new(list.label(), move |page: PagingKey| {
            let api = api.clone();
            async move { api.movie_list(list, page).await }
        }))
    }

    pub fn series_list_source(&self, list: SeriesList) -> Arc<dyn PagingSource<Series>> {
        let api = self.api.clone();
        Arc::new(PagedFetcher::new(list.label(), move |page: PagingKey| {
            let api = api.clone();
            async move { api.series_list(list, page).await }
        }))
    }

    /// Paging source for one fixed set of filters.
    ///
    /// A non-blank query goes to text search, anything else to discover.
    /// Untouched filters yield an empty source and never reach the catalog.
    pub fn search_source(&self, filters: SearchFilters) -> Arc<dyn PagingSource<Movie>> {
        if filters.is_default() {
            tracing::debug!("Default search filters, nothing to load");
            return Arc::new(EmptySource::new());
        }

        let api = self.api.clone();
        let filters = Arc::new(filters);

        if filters.has_query() {
            Arc::new(PagedFetcher::new("search", move |page: PagingKey| {
                let api = api.clone();
                let filters = filters.clone();
                async move { api.search(&filters, page).await }
            }))
        } else {
            Arc::new(PagedFetcher::new("discover", move |page: PagingKey| {
                let api = api.clone();
                let filters = filters.clone();
                async move { api.discover(&filters, page).await }
            }))
        }
    }

    /// Videos in the primary and fallback language, primary first, one entry per id
    pub async fn videos(&self, kind: MediaKind, id: u32) -> AppResult<Vec<Video>> {
        if self.language == self.fallback_language {
            let videos = self.api.videos(kind, id, &self.language).await?;
            return Ok(merge_videos(videos, Vec::new()));
        }

        let (primary, fallback) = tokio::try_join!(
            self.api.videos(kind, id, &self.language),
            self.api.videos(kind, id, &self.fallback_language),
        )?;

        tracing::debug!(
            kind = %kind,
            id,
            primary = primary.len(),
            fallback = fallback.len(),
            "Fetched videos"
        );

        Ok(merge_videos(primary, fallback))
    }

    pub async fn movie_details(&self, id: u32) -> AppResult<MovieDetail> {
        self.api.movie_details(id).await
    }

    pub async fn series_details(&self, id: u32) -> AppResult<SeriesDetail> {
        self.api.series_details(id).await
    }

    pub async fn images(&self, kind: MediaKind, id: u32) -> AppResult<ImagesResponse> {
        self.api.images(kind, id).await
    }

    pub async fn credits(&self, kind: MediaKind, id: u32) -> AppResult<CreditsResponse> {
        self.api.credits(kind, id).await
    }

    pub async fn person(&self, id: u32) -> AppResult<Person> {
        self.api.person(id).await
    }

    pub async fn person_credits(&self, id: u32) -> AppResult<CombinedCreditsResponse> {
        self.api.person_credits(id).await
    }

    pub async fn person_images(&self, id: u32) -> AppResult<PersonImagesResponse> {
        self.api.person_images(id).await
    }
}

/// Concatenates `primary` and `fallback`, keeping the first video for each id
pub fn merge_videos(primary: Vec<Video>, fallback: Vec<Video>) -> Vec<Video> {
    let mut seen = std::collections::HashSet::new();
    primary
        .into_iter()
        .chain(fallback)
        .filter(|video| seen.insert(video.id.clone()))
        .collect()
}
