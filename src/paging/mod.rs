//! Incremental paging over page-numbered sources
//!
//! A [`PagingSource`] turns "fetch page N" into [`LoadResult`]s with stable
//! continuation keys. Remote catalog lists use [`PagedFetcher`], the local
//! favorites/history lists implement the trait over the embedded store, and
//! [`Pager`] drives any source for a single consumer with an explicit
//! refresh/append state machine.

use serde::Serialize;
use std::{marker::PhantomData, sync::Arc};

use crate::{error::AppError, models::PageEnvelope};

pub mod fetcher;
pub mod pager;

pub use fetcher::PagedFetcher;
pub use pager::{LoadPosition, LoadState, LoadStates, Pager};

/// 1-indexed page number
pub type PagingKey = u32;

/// A successfully loaded page with the keys of its neighbours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub prev_key: Option<PagingKey>,
    pub next_key: Option<PagingKey>,
}

impl<T> Page<T> {
    /// Builds the page for `requested` out of the catalog envelope.
    ///
    /// `prev_key` is never below 1 and `next_key` is withheld once the
    /// requested page reaches `total_pages`.
    pub fn from_envelope(requested: PagingKey, envelope: PageEnvelope<T>) -> Self {
        Self {
            data: envelope.results,
            prev_key: requested.checked_sub(1).filter(|k| *k >= 1),
            next_key: (requested < envelope.total_pages).then(|| requested + 1),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            prev_key: None,
            next_key: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of a single [`PagingSource::load`]
#[derive(Debug, Clone)]
pub enum LoadResult<T> {
    Page(Page<T>),
    Error(Arc<AppError>),
}

impl<T> LoadResult<T> {
    pub fn into_result(self) -> Result<Page<T>, Arc<AppError>> {
        match self {
            LoadResult::Page(page) => Ok(page),
            LoadResult::Error(cause) => Err(cause),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadResult::Error(_))
    }
}

/// Key to reload from so a full refresh lands next to `anchor`.
///
/// Prefers `prev_key + 1`, then `next_key - 1`. `None` means reload from page 1.
pub fn refresh_key_for<T>(anchor: Option<&Page<T>>) -> Option<PagingKey> {
    anchor.and_then(|page| {
        page.prev_key
            .and_then(|k| k.checked_add(1))
            .or_else(|| page.next_key.and_then(|k| k.checked_sub(1)).filter(|k| *k >= 1))
    })
}

/// A lazily consumed sequence of pages
#[async_trait::async_trait]
pub trait PagingSource<T: Send>: Send + Sync {
    /// Loads the page for `key`, or page 1 when `key` is `None`.
    ///
    /// Failures are returned as [`LoadResult::Error`]; nothing is retried here.
    async fn load(&self, key: Option<PagingKey>) -> LoadResult<T>;

    /// Key for reloading the sequence around the anchor page
    fn refresh_key(&self, anchor: Option<&Page<T>>) -> Option<PagingKey> {
        refresh_key_for(anchor)
    }
}

/// Source with nothing in it: one empty terminal page
pub struct EmptySource<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> EmptySource<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for EmptySource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> PagingSource<T> for EmptySource<T> {
    async fn load(&self, _key: Option<PagingKey>) -> LoadResult<T> {
        LoadResult::Page(Page::empty())
    }
}
