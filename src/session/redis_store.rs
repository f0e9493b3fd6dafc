use redis::{AsyncCommands, Client};

use crate::{
    error::{AppError, AppResult},
    models::SessionData,
    session::store::SessionStore,
};

/// Creates a Redis client for session storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed session store; expiry is delegated to Redis key TTLs
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_client: Client,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(redis_client: Client, ttl: u64) -> Self {
        Self { redis_client, ttl }
    }

    fn key(id: &str) -> String {
        format!("session:{}", id)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: &str) -> AppResult<Option<SessionData>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(Self::key(id)).await?;

        match stored {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Session(format!("Session deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, id: &str, data: &SessionData) -> AppResult<()> {
        let json = serde_json::to_string(data)
            .map_err(|e| AppError::Session(format!("Session serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(Self::key(id), json, self.ttl).await?;
        Ok(())
    }

    async fn expire(&self, id: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::key(id)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSlot;
    use serde_json::json;

    #[test]
    fn test_session_key_format() {
        assert_eq!(RedisSessionStore::key("abc"), "session:abc");
    }

    // Needs a live server: REDIS_URL=redis://localhost:6379 cargo test
    #[tokio::test]
    async fn test_round_trip_against_redis() {
        let Ok(redis_url) = std::env::var("REDIS_URL") else {
            return;
        };

        let client = create_redis_client(&redis_url).unwrap();
        let store = RedisSessionStore::new(client, 60);
        let id = uuid::Uuid::new_v4().to_string();

        let mut data = SessionData::default();
        data.select(UserSlot::User1, json!({ "title": "Inception" }));

        store.set(&id, &data).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(data));

        store.expire(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
    }
}
