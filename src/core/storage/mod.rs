pub mod file;
pub mod models;
pub mod repository;

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::core::feed::types::Feed;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("cache file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Last-known-good payload store, keyed by feed identity.
#[async_trait::async_trait]
pub trait FeedCache: Send + Sync {
    /// Returns the cached payload, or `None` before the first successful fetch.
    async fn load(&self, feed: &Feed) -> Result<Option<String>, CacheError>;

    /// Replaces the cached payload for `feed`.
    async fn store(&self, feed: &Feed, payload: &str) -> Result<(), CacheError>;
}

/// In-process cache. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryFeedCache {
    entries: RwLock<HashMap<Feed, String>>,
}

impl MemoryFeedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FeedCache for MemoryFeedCache {
    async fn load(&self, feed: &Feed) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(feed).cloned())
    }

    async fn store(&self, feed: &Feed, payload: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(feed.clone(), payload.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl<C: FeedCache + ?Sized> FeedCache for Box<C> {
    async fn load(&self, feed: &Feed) -> Result<Option<String>, CacheError> {
        (**self).load(feed).await
    }

    async fn store(&self, feed: &Feed, payload: &str) -> Result<(), CacheError> {
        (**self).store(feed, payload).await
    }
}
