use std::{future::Future, sync::Arc};

use super::{LoadResult, Page, PagingKey, PagingSource};
use crate::{error::AppResult, models::PageEnvelope};

/// Paging source over a "fetch page N" function.
///
/// The function closes over whatever defines the list (endpoint, query,
/// filters); the fetcher itself only knows page numbers. Each `load` is an
/// independent call, so one fetcher can serve concurrent loads for different
/// keys.
pub struct PagedFetcher<F> {
    label: &'static str,
    fetch_page: F,
}

impl<F> PagedFetcher<F> {
    pub fn new<Fut>(label: &'static str, fetch_page: F) -> Self
    where
        F: Fn(PagingKey) -> Fut,
    {
        Self { label, fetch_page }
    }
}

#[async_trait::async_trait]
impl<T, F, Fut> PagingSource<T> for PagedFetcher<F>
where
    T: Send + 'static,
    F: Fn(PagingKey) -> Fut + Send + Sync,
    Fut: Future<Output = AppResult<PageEnvelope<T>>> + Send + 'static,
{
    async fn load(&self, key: Option<PagingKey>) -> LoadResult<T> {
        let page = key.unwrap_or(1);

        match (self.fetch_page)(page).await {
            Ok(envelope) => {
                tracing::debug!(
                    list = self.label,
                    page,
                    total_pages = envelope.total_pages,
                    results = envelope.results.len(),
                    "Page loaded"
                );
                LoadResult::Page(Page::from_envelope(page, envelope))
            }
            Err(e) => {
                tracing::warn!(list = self.label, page, error = %e, "Page load failed");
                LoadResult::Error(Arc::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_absent_key_requests_first_page() {
        let requested = Arc::new(AtomicU32::new(0));
        let seen = requested.clone();
        let fetcher = PagedFetcher::new("test", move |page| {
            seen.store(page, Ordering::SeqCst);
            async move { Ok::<_, AppError>(PageEnvelope::new(page, vec!["a", "b"], 3, 6)) }
        });

        let page = fetcher.load(None).await.into_result().unwrap();

        assert_eq!(requested.load(Ordering::SeqCst), 1);
        assert_eq!(page.data, vec!["a", "b"]);
        assert_eq!(page.prev_key, None);
        assert_eq!(page.next_key, Some(2));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_result() {
        let fetcher = PagedFetcher::new("test", |_page: PagingKey| async move {
            Err::<PageEnvelope<u32>, _>(AppError::CatalogStatus {
                status: 503,
                path: "movie/popular".to_string(),
            })
        });

        let result = fetcher.load(Some(2)).await;
        assert!(result.is_error());

        let cause = result.into_result().unwrap_err();
        assert!(matches!(
            cause.as_ref(),
            AppError::CatalogStatus { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_keys_follow_requested_page() {
        let fetcher = PagedFetcher::new("test", |page| async move {
            Ok::<_, AppError>(PageEnvelope::new(page, vec![page], 5, 5))
        });

        let page = fetcher.load(Some(4)).await.into_result().unwrap();
        assert_eq!(page.data, vec![4]);
        assert_eq!(page.prev_key, Some(3));
        assert_eq!(page.next_key, Some(5));
        assert_eq!(fetcher.refresh_key(Some(&page)), Some(4));
    }
}
