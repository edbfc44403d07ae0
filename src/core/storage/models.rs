use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CachedPayload {
    pub name: String,
    pub address: String,
    pub payload: String,
    pub fetched_at: String,
}
