// File: src/cache/backend.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::{info, warn};

use chatvault_common::error::Error as CoreError;

/// Failure modes of the cache adapter. A missing key is `Ok(None)`, not an
/// error; `Unavailable` covers connection/timeout/protocol failures.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value surface the history cache consumes.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// Redis-backed implementation over an auto-reconnecting `ConnectionManager`.
///
/// Constructed once at startup and injected; there is no lazy global handle.
#[derive(Clone)]
pub struct RedisCacheBackend {
    manager: ConnectionManager,
}

impl RedisCacheBackend {
    pub async fn connect(url: &str) -> Result<Self, CoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| CoreError::Cache(format!("invalid redis url: {e}")))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CoreError::Cache(format!("redis connect failed: {e}")))?;
        Ok(Self { manager })
    }
}

fn unavailable(e: redis::RedisError) -> CacheError {
    CacheError::Unavailable(e.to_string())
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await.map_err(unavailable)?;
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await.map_err(unavailable)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

/// Always-miss, always-succeed fallback used when no cache is configured.
/// Keeps the rest of the system on the durable-storage-only path.
#[derive(Clone, Default)]
pub struct NoopCacheBackend;

#[async_trait]
impl CacheBackend for NoopCacheBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set_with_expiry(&self, _key: &str, _ttl: Duration, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("no cache backend configured".into()))
    }
}

/// Pick the cache backend at startup. A missing URL or a failed initial
/// connect both land on the no-op backend so the service still comes up.
pub async fn connect_backend(redis_url: Option<&str>) -> Arc<dyn CacheBackend> {
    match redis_url {
        Some(url) => match RedisCacheBackend::connect(url).await {
            Ok(backend) => {
                info!("Connected to Redis cache at {}", url);
                Arc::new(backend)
            }
            Err(e) => {
                warn!("Redis unavailable ({}); running without history cache", e);
                Arc::new(NoopCacheBackend)
            }
        },
        None => {
            info!("No Redis URL configured; running without history cache");
            Arc::new(NoopCacheBackend)
        }
    }
}
