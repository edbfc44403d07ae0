use std::io::ErrorKind;
use std::path::PathBuf;

use super::{CacheError, FeedCache};
use crate::core::feed::types::Feed;

pub const DEFAULT_CACHE_DIR: &str = "data/cache";

/// Keeps one `<slug>.xml` file per feed under a cache directory.
///
/// The slug only depends on the feed name, so two feeds sharing a name share
/// a file.
#[derive(Debug, Clone)]
pub struct FileFeedCache {
    root: PathBuf,
}

impl FileFeedCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, feed: &Feed) -> PathBuf {
        self.root.join(format!("{}.xml", cache_slug(feed.name())))
    }
}

impl Default for FileFeedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

pub fn cache_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[async_trait::async_trait]
impl FeedCache for FileFeedCache {
    async fn load(&self, feed: &Feed) -> Result<Option<String>, CacheError> {
        match tokio::fs::read_to_string(self.path_for(feed)).await {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn store(&self, feed: &Feed, payload: &str) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.path_for(feed), payload).await?;
        Ok(())
    }
}
