use std::sync::Arc;

use tokio::sync::watch;

use super::{LoadResult, Page, PagingKey, PagingSource};
use crate::error::AppError;

const DEFAULT_PREFETCH_DISTANCE: usize = 5;

/// Load state of one position of a paged list
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    NotLoading,
    Loading,
    Error(Arc<AppError>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            LoadState::Error(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Which end of the list a load belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPosition {
    /// Initial load or full reload
    Refresh,
    /// Previous page before the first loaded one
    Prepend,
    /// Next page after the last loaded one
    Append,
}

#[derive(Debug, Clone, Default)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl LoadStates {
    pub fn get(&self, position: LoadPosition) -> &LoadState {
        match position {
            LoadPosition::Refresh => &self.refresh,
            LoadPosition::Prepend => &self.prepend,
            LoadPosition::Append => &self.append,
        }
    }

    fn is_idle(&self) -> bool {
        matches!(self.refresh, LoadState::NotLoading)
            && matches!(self.prepend, LoadState::NotLoading)
            && matches!(self.append, LoadState::NotLoading)
    }
}

/// Single-consumer driver for a [`PagingSource`].
///
/// Keeps the loaded pages in order and tracks refresh/prepend/append load
/// states. The anchor is an index into the loaded items; it is rebased
/// whenever pages are dropped or inserted in front of it.
/// Every state change is published on a watch channel so a presentation layer
/// can render spinners and retry affordances. A failed load never touches
/// pages that were already loaded; [`Pager::retry`] re-issues the exact key
/// that failed.
pub struct Pager<T: Send> {
    source: Arc<dyn PagingSource<T>>,
    pages: Vec<Page<T>>,
    anchor_position: Option<usize>,
    /// Anchor offset inside the page a pending refresh reloads
    refresh_anchor: Option<usize>,
    prefetch_distance: usize,
    states: LoadStates,
    failed: Option<(LoadPosition, Option<PagingKey>)>,
    states_tx: watch::Sender<LoadStates>,
}

impl<T: Send + 'static> Pager<T> {
    pub fn new(source: Arc<dyn PagingSource<T>>) -> Self {
        let (states_tx, _) = watch::channel(LoadStates::default());
        Self {
            source,
            pages: Vec::new(),
            anchor_position: None,
            refresh_anchor: None,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            states: LoadStates::default(),
            failed: None,
            states_tx,
        }
    }

    /// How close to the end the anchor has to be before [`Pager::should_append`] fires
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadStates> {
        self.states_tx.subscribe()
    }

    pub fn load_states(&self) -> &LoadStates {
        &self.states
    }

    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`; also records `index` as the consumer's anchor
    pub fn get(&mut self, index: usize) -> Option<&T> {
        self.anchor_position = Some(index);
        self.peek(index)
    }

    /// Item at `index` without moving the anchor
    pub fn peek(&self, index: usize) -> Option<&T> {
        self.items().nth(index)
    }

    /// True once the last loaded page has no next key
    pub fn end_of_pagination_reached(&self) -> bool {
        self.pages.last().is_some_and(|page| page.next_key.is_none())
    }

    /// Whether the anchor is close enough to the end to load the next page
    pub fn should_append(&self) -> bool {
        let Some(anchor) = self.anchor_position else {
            return false;
        };

        !self.end_of_pagination_reached()
            && !self.pages.is_empty()
            && self.states.is_idle()
            && anchor + self.prefetch_distance >= self.len()
    }

    /// Whether the anchor is close enough to the start to load the previous page
    pub fn should_prepend(&self) -> bool {
        let Some(anchor) = self.anchor_position else {
            return false;
        };

        self.pages.first().is_some_and(|page| page.prev_key.is_some())
            && self.states.is_idle()
            && anchor < self.prefetch_distance
    }

    /// Page containing `position`, or the last page when past the end
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        self.locate(position)
            .and_then(|(index, _)| self.pages.get(index))
    }

    /// Index of the page holding `position` and the offset inside it.
    /// Positions past the end map to the last item of the last page.
    fn locate(&self, position: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, page) in self.pages.iter().enumerate() {
            if position < start + page.len() {
                return Some((index, position - start));
            }
            start += page.len();
        }
        let last = self.pages.len().checked_sub(1)?;
        Some((last, self.pages[last].len().saturating_sub(1)))
    }

    /// Reloads the list around the current anchor, or from page 1.
    ///
    /// Only the anchor's page is reloaded; the anchor moves to the same
    /// offset inside it so later appends and refreshes stay put.
    pub async fn refresh(&mut self) {
        let (key, refresh_anchor) = match self.anchor_position {
            Some(anchor) if !self.pages.is_empty() => match self.locate(anchor) {
                Some((index, offset)) => {
                    let key = self.source.refresh_key(self.pages.get(index));
                    (key, Some(offset))
                }
                None => (None, None),
            },
            _ => (None, None),
        };

        self.refresh_anchor = refresh_anchor;
        self.load_refresh(key).await;
    }

    /// Loads the page after the last loaded one.
    ///
    /// Returns whether a load was issued. Nothing is loaded while a position
    /// is in error (use [`Pager::retry`]) or once the end has been reached.
    pub async fn append(&mut self) -> bool {
        if self.pages.is_empty() {
            if self.states.refresh.is_error() {
                return false;
            }
            self.load_refresh(None).await;
            return true;
        }

        if !self.states.is_idle() {
            return false;
        }

        match self.pages.last().and_then(|page| page.next_key) {
            Some(next_key) => {
                self.load_append(next_key).await;
                true
            }
            None => false,
        }
    }

    /// Loads the page before the first loaded one.
    ///
    /// Returns whether a load was issued. The anchor shifts by the size of
    /// the inserted page so it keeps pointing at the same item.
    pub async fn prepend(&mut self) -> bool {
        if !self.states.is_idle() {
            return false;
        }

        match self.pages.first().and_then(|page| page.prev_key) {
            Some(prev_key) => {
                self.load_prepend(prev_key).await;
                true
            }
            None => false,
        }
    }

    /// Re-issues the load that failed last. Returns whether anything was retried.
    pub async fn retry(&mut self) -> bool {
        match self.failed.take() {
            Some((LoadPosition::Refresh, key)) => {
                self.load_refresh(key).await;
                true
            }
            Some((LoadPosition::Prepend, Some(key))) => {
                self.load_prepend(key).await;
                true
            }
            Some((LoadPosition::Append, Some(key))) => {
                self.load_append(key).await;
                true
            }
            Some((LoadPosition::Prepend | LoadPosition::Append, None)) | None => false,
        }
    }

    async fn load_refresh(&mut self, key: Option<PagingKey>) {
        self.set_state(LoadPosition::Refresh, LoadState::Loading);

        match self.source.load(key).await {
            LoadResult::Page(page) => {
                tracing::debug!(key = ?key, items = page.len(), "Refresh loaded");
                self.anchor_position = match self.refresh_anchor.take() {
                    Some(offset) if !page.is_empty() => Some(offset.min(page.len() - 1)),
                    _ => None,
                };
                self.pages = vec![page];
                self.failed = None;
                self.set_state(LoadPosition::Prepend, LoadState::NotLoading);
                self.set_state(LoadPosition::Append, LoadState::NotLoading);
                self.set_state(LoadPosition::Refresh, LoadState::NotLoading);
            }
            LoadResult::Error(cause) => {
                tracing::warn!(key = ?key, error = %cause, "Refresh failed");
                self.failed = Some((LoadPosition::Refresh, key));
                self.set_state(LoadPosition::Refresh, LoadState::Error(cause));
            }
        }
    }

    async fn load_prepend(&mut self, key: PagingKey) {
        self.set_state(LoadPosition::Prepend, LoadState::Loading);

        match self.source.load(Some(key)).await {
            LoadResult::Page(page) => {
                tracing::debug!(key, items = page.len(), "Prepend loaded");
                let inserted = page.len();
                self.anchor_position = self.anchor_position.map(|anchor| anchor + inserted);
                self.pages.insert(0, page);
                self.failed = None;
                self.set_state(LoadPosition::Prepend, LoadState::NotLoading);
            }
            LoadResult::Error(cause) => {
                tracing::warn!(key, error = %cause, "Prepend failed");
                self.failed = Some((LoadPosition::Prepend, Some(key)));
                self.set_state(LoadPosition::Prepend, LoadState::Error(cause));
            }
        }
    }

    async fn load_append(&mut self, key: PagingKey) {
        self.set_state(LoadPosition::Append, LoadState::Loading);

        match self.source.load(Some(key)).await {
            LoadResult::Page(page) => {
                tracing::debug!(key, items = page.len(), "Append loaded");
                self.pages.push(page);
                self.failed = None;
                self.set_state(LoadPosition::Append, LoadState::NotLoading);
            }
            LoadResult::Error(cause) => {
                tracing::warn!(key, error = %cause, "Append failed");
                self.failed = Some((LoadPosition::Append, Some(key)));
                self.set_state(LoadPosition::Append, LoadState::Error(cause));
            }
        }
    }

    fn set_state(&mut self, position: LoadPosition, state: LoadState) {
        match position {
            LoadPosition::Refresh => self.states.refresh = state,
            LoadPosition::Prepend => self.states.prepend = state,
            LoadPosition::Append => self.states.append = state,
        }
        self.states_tx.send_replace(self.states.clone());
    }
}
