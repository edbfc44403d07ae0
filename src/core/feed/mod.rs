pub mod fetcher;
pub mod parser;
pub mod types;

use std::time::Duration;

use fetcher::{build_client, fetch_feed_body, FetchError};
use parser::parse_posts;
use types::{Feed, FetchOutcome};

use crate::core::storage::FeedCache;

/// Fetches feeds and falls back to the injected cache when the network fails.
#[derive(Debug, Clone)]
pub struct FeedService<C> {
    client: reqwest::Client,
    cache: C,
}

impl<C: FeedCache> FeedService<C> {
    pub fn new(client: reqwest::Client, cache: C) -> Self {
        Self { client, cache }
    }

    pub fn with_timeout(cache: C, timeout: Option<Duration>) -> Result<Self, FetchError> {
        Ok(Self::new(build_client(timeout)?, cache))
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetches and parses up to five posts for `feed`. Never fails; see
    /// [`FetchOutcome`] for where the posts came from.
    pub async fn fetch_posts(&self, feed: &Feed) -> FetchOutcome {
        match fetch_feed_body(&self.client, feed.address()).await {
            Ok(body) => {
                match self.cache.store(feed, &body).await {
                    Ok(()) => tracing::info!(
                        feed = %feed.name(),
                        "fetched remote feed data and updated local cache"
                    ),
                    Err(error) => tracing::warn!(
                        feed = %feed.name(),
                        error = %error,
                        "fetched remote feed data but failed to update local cache"
                    ),
                }
                FetchOutcome::Fetched(parse_posts(feed.name(), &body))
            }
            Err(error) => {
                tracing::warn!(
                    feed = %feed.name(),
                    error = %error,
                    "failed to fetch remote feed data, attempting to use local cache"
                );
                self.cached_posts(feed).await
            }
        }
    }

    /// Fetches each feed in turn, preserving input order.
    pub async fn fetch_all<'a, I>(&self, feeds: I) -> Vec<(Feed, FetchOutcome)>
    where
        I: IntoIterator<Item = &'a Feed>,
    {
        let mut results = Vec::new();
        for feed in feeds {
            let outcome = self.fetch_posts(feed).await;
            tracing::debug!(
                feed = %feed.name(),
                outcome = outcome.label(),
                posts = outcome.posts().len(),
                "feed refreshed"
            );
            results.push((feed.clone(), outcome));
        }
        results
    }

    async fn cached_posts(&self, feed: &Feed) -> FetchOutcome {
        match self.cache.load(feed).await {
            Ok(Some(payload)) => {
                tracing::info!(feed = %feed.name(), "using feed data from local cache");
                FetchOutcome::Cached(parse_posts(feed.name(), &payload))
            }
            Ok(None) => {
                tracing::warn!(
                    feed = %feed.name(),
                    "failed to fetch feed data from both remote and local cache"
                );
                FetchOutcome::Empty
            }
            Err(error) => {
                tracing::warn!(
                    feed = %feed.name(),
                    error = %error,
                    "failed to read local cache"
                );
                FetchOutcome::Empty
            }
        }
    }
}
