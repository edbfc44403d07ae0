use std::fmt;

use serde::{Deserialize, Serialize};

/// A named remote source of posts. Identity is the `(name, address)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Feed {
    name: String,
    address: String,
}

impl Feed {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.address)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedPost {
    pub feed_name: String,
    pub title: String,
    pub link: String,
}

impl FeedPost {
    pub fn new(
        feed_name: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            feed_name: feed_name.into(),
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Result of a fetch, tagged with where the parsed payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The remote fetch succeeded and the payload is fresh.
    Fetched(Vec<FeedPost>),
    /// The remote fetch failed; posts come from the last cached payload.
    Cached(Vec<FeedPost>),
    /// The remote fetch failed and nothing was cached yet.
    Empty,
}

impl FetchOutcome {
    pub fn posts(&self) -> &[FeedPost] {
        match self {
            FetchOutcome::Fetched(posts) | FetchOutcome::Cached(posts) => posts,
            FetchOutcome::Empty => &[],
        }
    }

    pub fn into_posts(self) -> Vec<FeedPost> {
        match self {
            FetchOutcome::Fetched(posts) | FetchOutcome::Cached(posts) => posts,
            FetchOutcome::Empty => Vec::new(),
        }
    }

    pub fn is_stale(&self) -> bool {
        !matches!(self, FetchOutcome::Fetched(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Fetched(_) => "fetched",
            FetchOutcome::Cached(_) => "cached",
            FetchOutcome::Empty => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::hash::{DefaultHasher, Hash, Hasher};

    fn hash_of(feed: &Feed) -> u64 {
        let mut hasher = DefaultHasher::new();
        feed.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn feeds_with_same_identity_are_equal_and_hash_alike() {
        let a = Feed::new("Seth Lui", "https://sethlui.com/feed/");
        let b = Feed::new("Seth Lui", "https://sethlui.com/feed/");
        let c = Feed::new("Seth Lui", "https://sethlui.com/rss/");

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_eq!(HashSet::from([a, b, c]).len(), 2);
    }

    #[test]
    fn display_joins_name_and_address() {
        let feed = Feed::new("Ladyironchef", "https://www.ladyironchef.com/feed/");
        assert_eq!(feed.to_string(), "Ladyironchef: https://www.ladyironchef.com/feed/");
    }

    #[test]
    fn outcome_exposes_posts_and_staleness() {
        let post = FeedPost::new("blog", "Title", "https://blog/1");
        let fetched = FetchOutcome::Fetched(vec![post.clone()]);
        let cached = FetchOutcome::Cached(vec![post.clone()]);

        assert!(!fetched.is_stale());
        assert!(cached.is_stale());
        assert!(FetchOutcome::Empty.is_stale());
        assert_eq!(cached.posts(), &[post]);
        assert!(FetchOutcome::Empty.into_posts().is_empty());
        assert_eq!(fetched.label(), "fetched");
    }
}
