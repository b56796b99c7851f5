/// Read-through caching around an async computation.
///
/// Looks `$key` up in `$cache` (an `Option<&Cache>`) and returns the hit.
/// On a miss, or when no cache is configured, awaits `$block`, queues the
/// result for a background write with `$ttl` seconds and returns it. A failed
/// cache read is logged and treated as a miss. Errors from `$block` are
/// propagated with `?`, so the macro must be used inside a function returning
/// `AppResult`.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache.as_ref(), key, DETAIL_TTL_SECS, async move {
///     self.fetch_detail(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;

        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(cached) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            None => {
                let value = $block.await?;
                if let Some(cache) = cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
