pub mod config;
pub mod feed;
pub mod storage;
pub mod subscription;

use config::{AppConfig, CacheBackend};
use storage::file::FileFeedCache;
use storage::repository::SqliteFeedCache;
use storage::{CacheError, FeedCache, MemoryFeedCache};

/// Opens the cache backend selected by `config`.
pub async fn open_cache(config: &AppConfig) -> Result<Box<dyn FeedCache>, CacheError> {
    let cache: Box<dyn FeedCache> = match config.cache_backend {
        CacheBackend::Memory => Box::new(MemoryFeedCache::new()),
        CacheBackend::File => Box::new(FileFeedCache::new(config.cache_dir.clone())),
        CacheBackend::Sqlite => {
            if let Some(parent) = config
                .cache_db
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            Box::new(SqliteFeedCache::connect(&config.database_url()).await?)
        }
    };
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed::types::Feed;

    #[tokio::test]
    async fn opens_each_backend() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let feed = Feed::new("Blog", "https://blog.example.com/feed");

        for backend in [CacheBackend::Memory, CacheBackend::File, CacheBackend::Sqlite] {
            let config = AppConfig {
                cache_backend: backend,
                cache_db: dir.path().join("db").join("cache.db"),
                cache_dir: dir.path().join("cache"),
                ..AppConfig::default()
            };
            let cache = open_cache(&config).await.expect("backend should open");
            cache.store(&feed, "<rss/>").await.expect("store");
            assert_eq!(
                cache.load(&feed).await.expect("load"),
                Some("<rss/>".to_string()),
                "backend {backend:?}"
            );
        }
    }
}
