/// Read-through caching for provider calls.
///
/// Looks the key up first and returns the cached value on a hit. On a miss the
/// block is awaited, its value is queued for a background write and returned.
/// A failed cache read is logged and treated as a miss, so an unreachable
/// Redis only costs latency.
///
/// # Arguments
/// * `$cache`: cache exposing `get_from_cache` and `set_in_background`.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live of the stored value, in seconds.
/// * `$block`: future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let summary = cached!(self.cache, CacheKey::MovieSearch(title.to_string()), TTL, async move {
///     fetch_from_api().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                None
            }
        };

        if let Some(cached) = hit {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
