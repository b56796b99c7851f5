use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        saved_title::{join_genre_ids, split_genre_ids},
        MediaKind, SavedList, SavedTitle,
    },
    paging::{LoadResult, Page, PagingKey, PagingSource},
};

const COLUMNS: &str = "id, media_kind, created_at, vote_average, title, adult, overview, \
                       poster_path, release_date, genre_ids";

#[derive(Debug, sqlx::FromRow)]
struct SavedTitleRow {
    id: i64,
    media_kind: String,
    created_at: i64,
    vote_average: f64,
    title: Option<String>,
    adult: bool,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    genre_ids: String,
}

impl TryFrom<SavedTitleRow> for SavedTitle {
    type Error = AppError;

    fn try_from(row: SavedTitleRow) -> Result<Self, Self::Error> {
        let id = u32::try_from(row.id)
            .map_err(|_| AppError::Internal(format!("Stored title id out of range: {}", row.id)))?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(row.created_at).ok_or_else(|| {
            AppError::Internal(format!("Stored timestamp out of range: {}", row.created_at))
        })?;

        Ok(SavedTitle {
            id,
            media_kind: row.media_kind.parse()?,
            created_at,
            vote_average: row.vote_average,
            title: row.title,
            adult: row.adult,
            overview: row.overview,
            poster_path: row.poster_path,
            release_date: row.release_date,
            genre_ids: split_genre_ids(&row.genre_ids),
        })
    }
}

/// Favorites and history persisted in SQLite.
///
/// Reads always go to the database, so a write is visible to the very next
/// page read of any list.
#[derive(Clone)]
pub struct TitleStore {
    pool: SqlitePool,
}

impl TitleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the title, replacing any row with the same `(id, media_kind)`
    pub async fn insert(&self, list: SavedList, title: &SavedTitle) -> AppResult<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            list.table(),
            COLUMNS
        );

        sqlx::query(&sql)
            .bind(i64::from(title.id))
            .bind(title.media_kind.as_str())
            .bind(title.created_at.timestamp_millis())
            .bind(title.vote_average)
            .bind(title.title.as_deref())
            .bind(title.adult)
            .bind(title.overview.as_deref())
            .bind(title.poster_path.as_deref())
            .bind(title.release_date.as_deref())
            .bind(join_genre_ids(&title.genre_ids))
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            list = list.table(),
            id = title.id,
            media_kind = %title.media_kind,
            "Saved title"
        );

        Ok(())
    }

    pub async fn contains(&self, list: SavedList, id: u32, kind: MediaKind) -> AppResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ? AND media_kind = ?)",
            list.table()
        );

        let exists: i64 = sqlx::query_scalar(&sql)
            .bind(i64::from(id))
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists != 0)
    }

    /// Deletes the title. Returns whether a row was removed.
    pub async fn remove(&self, list: SavedList, id: u32, kind: MediaKind) -> AppResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ? AND media_kind = ?",
            list.table()
        );

        let result = sqlx::query(&sql)
            .bind(i64::from(id))
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            list = list.table(),
            id,
            media_kind = %kind,
            removed = result.rows_affected(),
            "Removed title"
        );

        Ok(result.rows_affected() > 0)
    }

    /// Titles ordered newest first
    pub async fn page(
        &self,
        list: SavedList,
        offset: u64,
        limit: u32,
    ) -> AppResult<Vec<SavedTitle>> {
        // rowid breaks ties between writes in the same millisecond; a replace
        // gets a fresh rowid, so the latest write wins.
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
            COLUMNS,
            list.table()
        );

        let offset = i64::try_from(offset)
            .map_err(|_| AppError::InvalidInput(format!("Offset too large: {}", offset)))?;

        let rows: Vec<SavedTitleRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SavedTitle::try_from).collect()
    }

    pub async fn count(&self, list: SavedList) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", list.table());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    /// Paging source over one list, `page_size` titles per page
    pub fn source(&self, list: SavedList, page_size: u32) -> SavedListSource {
        SavedListSource {
            store: self.clone(),
            list,
            page_size: page_size.max(1),
        }
    }
}

/// [`PagingSource`] over a local list with 1-indexed page keys
pub struct SavedListSource {
    store: TitleStore,
    list: SavedList,
    page_size: u32,
}

impl SavedListSource {
    async fn load_page(&self, page: PagingKey) -> AppResult<Page<SavedTitle>> {
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(self.page_size);

        // One extra row tells whether another page follows.
        let mut data = self
            .store
            .page(self.list, offset, self.page_size.saturating_add(1))
            .await?;
        let has_more = data.len() > self.page_size as usize;
        data.truncate(self.page_size as usize);

        Ok(Page {
            data,
            prev_key: (page > 1).then(|| page - 1),
            next_key: has_more.then(|| page + 1),
        })
    }
}

#[async_trait::async_trait]
impl PagingSource<SavedTitle> for SavedListSource {
    async fn load(&self, key: Option<PagingKey>) -> LoadResult<SavedTitle> {
        let page = key.unwrap_or(1);

        match self.load_page(page).await {
            Ok(page) => LoadResult::Page(page),
            Err(e) => {
                tracing::error!(list = self.list.table(), page, error = %e, "Local list read failed");
                LoadResult::Error(Arc::new(e))
            }
        }
    }
}
