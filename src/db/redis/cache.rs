use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys of cached catalog lookups. Detail payloads are localized, so the
/// language is part of every key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetail { id: u32, language: String },
    SeriesDetail { id: u32, language: String },
    Person { id: u32, language: String },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetail { id, language } => write!(f, "movie:{}:{}", language, id),
            CacheKey::SeriesDetail { id, language } => write!(f, "tv:{}:{}", language, id),
            CacheKey::Person { id, language } => write!(f, "person:{}:{}", language, id),
        }
    }
}

/// Creates a Redis client for the detail cache
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for catalog detail lookups
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Upper bound on how long shutdown waits for queued writes to reach Redis
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and waits for it to stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, self.task).await {
            Ok(Ok(())) => tracing::info!("Cache writer flushed"),
            Ok(Err(e)) => tracing::error!(error = %e, "Cache writer task failed"),
            Err(_) => tracing::warn!(
                timeout_secs = SHUTDOWN_FLUSH_TIMEOUT.as_secs(),
                "Cache writer did not finish flushing in time"
            ),
        }
    }
}

impl Cache {
    /// Creates the cache and spawns its background writer.
    ///
    /// Writes go through a channel so a slow Redis never delays a catalog
    /// response.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes = 0u64;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders live in cloned `Cache` values, so drain only what is queued.
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Returns the cached value for `key`, or `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a write of `value` under `key` with a TTL in seconds
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_writer_task() {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let flushed = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let done = flushed.clone();

        let task = tokio::spawn(async move {
            shutdown_rx.recv().await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            done.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        CacheWriterHandle { shutdown_tx, task }.shutdown().await;

        assert!(flushed.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_cache_key_display_movie_detail() {
        let key = CacheKey::MovieDetail {
            id: 27205,
            language: "en-US".to_string(),
        };
        assert_eq!(key.to_string(), "movie:en-US:27205");
    }

    #[test]
    fn test_cache_key_display_series_detail() {
        let key = CacheKey::SeriesDetail {
            id: 1396,
            language: "de-DE".to_string(),
        };
        assert_eq!(key.to_string(), "tv:de-DE:1396");
    }

    #[test]
    fn test_cache_key_display_person() {
        let key = CacheKey::Person {
            id: 6193,
            language: "en-US".to_string(),
        };
        assert_eq!(key.to_string(), "person:en-US:6193");
    }

    #[test]
    fn test_cache_key_language_distinguishes_entries() {
        let en = CacheKey::MovieDetail {
            id: 1,
            language: "en-US".to_string(),
        };
        let fr = CacheKey::MovieDetail {
            id: 1,
            language: "fr-FR".to_string(),
        };
        assert_ne!(en.to_string(), fr.to_string());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let key = CacheKey::Person {
            id: u32::MAX,
            language: "xx-XX".to_string(),
        };
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_set_in_background_writes_to_cache() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client.clone()).await;

        let key = CacheKey::MovieDetail {
            id: 424242,
            language: "test".to_string(),
        };
        let value = vec!["item1".to_string(), "item2".to_string()];

        cache.set_in_background(&key, &value, 60);
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_cache_writer_graceful_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone()).await;

        let key = CacheKey::SeriesDetail {
            id: 434343,
            language: "test".to_string(),
        };
        let value = vec!["shutdown_test".to_string()];

        cache.set_in_background(&key, &value, 60);
        // shutdown returns only after the queued write has been flushed
        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
