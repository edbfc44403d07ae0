use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use super::models::CachedPayload;
use super::{CacheError, FeedCache};
use crate::core::feed::types::Feed;

/// SQLite-backed feed cache; survives process restarts.
#[derive(Debug, Clone)]
pub struct SqliteFeedCache {
    pool: SqlitePool,
}

impl SqliteFeedCache {
    pub async fn connect(database_url: &str) -> Result<Self, CacheError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn get_payload(&self, feed: &Feed) -> Result<Option<CachedPayload>, CacheError> {
        let row = sqlx::query_as::<_, CachedPayload>(
            r#"
            SELECT name, address, payload, fetched_at
            FROM feed_cache
            WHERE name = ?1 AND address = ?2
            "#,
        )
        .bind(feed.name())
        .bind(feed.address())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn upsert_payload(&self, feed: &Feed, payload: &str) -> Result<(), CacheError> {
        sqlx::query(
            r#"
            INSERT INTO feed_cache (name, address, payload)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name, address) DO UPDATE SET
              payload = excluded.payload,
              fetched_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(feed.name())
        .bind(feed.address())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_payloads(&self) -> Result<Vec<CachedPayload>, CacheError> {
        let rows = sqlx::query_as::<_, CachedPayload>(
            r#"
            SELECT name, address, payload, fetched_at
            FROM feed_cache
            ORDER BY name, address
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl FeedCache for SqliteFeedCache {
    async fn load(&self, feed: &Feed) -> Result<Option<String>, CacheError> {
        Ok(self.get_payload(feed).await?.map(|row| row.payload))
    }

    async fn store(&self, feed: &Feed, payload: &str) -> Result<(), CacheError> {
        self.upsert_payload(feed, payload).await
    }
}
