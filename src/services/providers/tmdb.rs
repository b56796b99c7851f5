//! TMDB v3 catalog client
//!
//! Every request is `GET {api_url}/3/{path}` with the query parameters in a
//! fixed order: `api_key`, `language`, `sort_by` (when set), `page` (when
//! set), then the endpoint's own parameters. Movie, series and person
//! details are cached in Redis when a cache is attached; paged lists never
//! are.

use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CombinedCreditsResponse, CreditsResponse, ImagesResponse, MediaKind, Movie, MovieDetail,
        PageEnvelope, Person, PersonImagesResponse, SearchFilters, Series, SeriesDetail, Video,
        VideosResponse,
    },
    services::providers::{CatalogApi, MovieList, SeriesList},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DETAIL_CACHE_TTL: u64 = 3600; // 1 hour

/// One catalog call before it is turned into a URL and query string
#[derive(Debug)]
struct CatalogRequest {
    path: String,
    language: Option<String>,
    sort_by: Option<String>,
    page: Option<u32>,
    params: Vec<(&'static str, String)>,
}

impl CatalogRequest {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: None,
            sort_by: None,
            page: None,
            params: Vec::new(),
        }
    }

    fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    fn sort_by(mut self, sort_by: Option<&str>) -> Self {
        self.sort_by = sort_by.map(str::to_string);
        self
    }

    /// Overrides the client's default language for this call
    fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    fn params(mut self, params: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.params.extend(params);
        self
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    region: String,
    cache: Option<Cache>,
}

impl TmdbClient {
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        region: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            region,
            cache: None,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            config.tmdb_region.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Enables read-through caching of detail lookups
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn build_query(&self, request: &CatalogRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("api_key", self.api_key.clone()),
            (
                "language",
                request
                    .language
                    .clone()
                    .unwrap_or_else(|| self.language.clone()),
            ),
        ];
        if let Some(sort_by) = &request.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(page) = request.page {
            query.push(("page", page.to_string()));
        }
        query.extend(request.params.iter().cloned());
        query
    }

    async fn send<T: DeserializeOwned>(&self, request: CatalogRequest) -> AppResult<T> {
        let url = format!("{}/3/{}", self.api_url, request.path);
        let query = self.build_query(&request);

        let response = self.http_client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                path = %request.path,
                status = status.as_u16(),
                "Catalog request failed"
            );
            return Err(AppError::CatalogStatus {
                status: status.as_u16(),
                path: request.path,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(path = %request.path, error = %source, "Malformed catalog response");
            AppError::MalformedResponse {
                path: request.path,
                source,
            }
        })
    }

    fn free_to_watch_params(&self) -> [(&'static str, String); 2] {
        [
            ("with_watch_monetization_types", "free".to_string()),
            ("watch_region", self.region.clone()),
        ]
    }
}

#[async_trait::async_trait]
impl CatalogApi for TmdbClient {
    async fn movie_list(&self, list: MovieList, page: u32) -> AppResult<PageEnvelope<Movie>> {
        let mut request = CatalogRequest::new(list.path()).page(page);
        if list == MovieList::FreeToWatch {
            request = request.params(self.free_to_watch_params());
        }
        self.send(request).await
    }

    async fn series_list(&self, list: SeriesList, page: u32) -> AppResult<PageEnvelope<Series>> {
        let mut request = CatalogRequest::new(list.path()).page(page);
        if list == SeriesList::FreeToWatch {
            request = request.params(self.free_to_watch_params());
        }
        self.send(request).await
    }

    async fn search(&self, filters: &SearchFilters, page: u32) -> AppResult<PageEnvelope<Movie>> {
        if !filters.has_query() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let request = CatalogRequest::new(format!("search/{}", filters.kind))
            .sort_by(filters.sort_by.as_deref())
            .page(page)
            .params(filters.search_params());
        self.send(request).await
    }

    async fn discover(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> AppResult<PageEnvelope<Movie>> {
        let request = CatalogRequest::new(format!("discover/{}", filters.kind))
            .sort_by(filters.sort_by.as_deref())
            .page(page)
            .params(filters.filter_params());
        self.send(request).await
    }

    async fn movie_details(&self, id: u32) -> AppResult<MovieDetail> {
        cached!(
            self.cache.as_ref(),
            CacheKey::MovieDetail {
                id,
                language: self.language.clone(),
            },
            DETAIL_CACHE_TTL,
            async move { self.send(CatalogRequest::new(format!("movie/{}", id))).await }
        )
    }

    async fn series_details(&self, id: u32) -> AppResult<SeriesDetail> {
        cached!(
            self.cache.as_ref(),
            CacheKey::SeriesDetail {
                id,
                language: self.language.clone(),
            },
            DETAIL_CACHE_TTL,
            async move { self.send(CatalogRequest::new(format!("tv/{}", id))).await }
        )
    }

    async fn videos(&self, kind: MediaKind, id: u32, language: &str) -> AppResult<Vec<Video>> {
        let request = CatalogRequest::new(format!("{}/{}/videos", kind, id)).language(language);
        let response: VideosResponse = self.send(request).await?;
        Ok(response.results)
    }

    async fn images(&self, kind: MediaKind, id: u32) -> AppResult<ImagesResponse> {
        self.send(CatalogRequest::new(format!("{}/{}/images", kind, id)))
            .await
    }

    async fn credits(&self, kind: MediaKind, id: u32) -> AppResult<CreditsResponse> {
        self.send(CatalogRequest::new(format!("{}/{}/credits", kind, id)))
            .await
    }

    async fn person(&self, id: u32) -> AppResult<Person> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Person {
                id,
                language: self.language.clone(),
            },
            DETAIL_CACHE_TTL,
            async move { self.send(CatalogRequest::new(format!("person/{}", id))).await }
        )
    }

    async fn person_credits(&self, id: u32) -> AppResult<CombinedCreditsResponse> {
        self.send(CatalogRequest::new(format!("person/{}/combined_credits", id)))
            .await
    }

    async fn person_images(&self, id: u32) -> AppResult<PersonImagesResponse> {
        self.send(CatalogRequest::new(format!("person/{}/images", id)))
            .await
    }
}
