use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::core::feed::types::Feed;

pub const DEFAULT_FEEDS_FILE: &str = "data/feeds.json";

#[derive(Debug, thiserror::Error)]
pub enum FeedListError {
    #[error("This feed already exists in the feed list.")]
    DuplicateFeed,
    #[error("Feed does not exist in feed list.")]
    MissingFeed,
    #[error("invalid feed: {0}")]
    InvalidFeed(String),
    #[error("invalid feed list JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed list file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonFeedItem {
    Address(String),
    Object { name: Option<String>, address: String },
}

/// Ordered collection of unique feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedList {
    feeds: Vec<Feed>,
}

impl FeedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn contains(&self, feed: &Feed) -> bool {
        self.feeds.contains(feed)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Feed> {
        self.feeds.iter().find(|feed| feed.name() == name)
    }

    pub fn add_feed(&mut self, feed: Feed) -> Result<String, FeedListError> {
        validate_feed(&feed)?;
        if self.contains(&feed) {
            return Err(FeedListError::DuplicateFeed);
        }
        let message = format!("New feed added: {feed}");
        self.feeds.push(feed);
        Ok(message)
    }

    pub fn delete_feed(&mut self, name: &str) -> Result<String, FeedListError> {
        let index = self
            .feeds
            .iter()
            .position(|feed| feed.name() == name)
            .ok_or(FeedListError::MissingFeed)?;
        let removed = self.feeds.remove(index);
        Ok(format!("Deleted feed: {removed}"))
    }

    pub fn from_json(input: &str) -> Result<Self, FeedListError> {
        let items: Vec<JsonFeedItem> = serde_json::from_str(input)?;
        let mut list = Self::new();
        for item in items {
            let feed = match item {
                JsonFeedItem::Address(address) => Feed::new(address.clone(), address),
                JsonFeedItem::Object { name, address } => {
                    Feed::new(name.unwrap_or_else(|| address.clone()), address)
                }
            };
            match list.add_feed(feed) {
                Ok(_) | Err(FeedListError::DuplicateFeed) => {}
                Err(error) => return Err(error),
            }
        }
        Ok(list)
    }

    pub fn to_json(&self) -> Result<String, FeedListError> {
        Ok(serde_json::to_string_pretty(&self.feeds)?)
    }

    /// Reads the list at `path`; a missing file is an empty list.
    pub async fn load(path: &Path) -> Result<Self, FeedListError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::from_json(&content),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(error) => Err(error.into()),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), FeedListError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }
}

fn validate_feed(feed: &Feed) -> Result<(), FeedListError> {
    if feed.name().trim().is_empty() {
        return Err(FeedListError::InvalidFeed("name must not be blank".to_string()));
    }
    if feed.address().trim().is_empty() {
        return Err(FeedListError::InvalidFeed("address must not be blank".to_string()));
    }
    Ok(())
}
