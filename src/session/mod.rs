pub mod cookie;
pub mod redis_store;
pub mod store;

use std::{sync::Arc, time::Duration};

use crate::config::Config;

pub use cookie::{make_span_with_session, session_middleware, SessionCookies, SessionId};
pub use redis_store::{create_redis_client, RedisSessionStore};
pub use store::{InMemorySessionStore, SessionStore};

/// How often the in-memory store drops expired sessions
pub const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Picks the session backend: Redis when `REDIS_URL` is set, memory otherwise
pub fn create_store(config: &Config) -> anyhow::Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.redis_url.as_deref() {
        Some(url) => Arc::new(RedisSessionStore::new(
            create_redis_client(url)?,
            config.session_ttl_secs,
        )),
        None => {
            let store = InMemorySessionStore::new(config.session_ttl_secs);
            store.spawn_reaper(PURGE_INTERVAL);
            Arc::new(store)
        }
    };

    tracing::info!(backend = store.name(), "Session store ready");
    Ok(store)
}
