// src/cache/mod.rs

pub mod backend;
pub mod history_cache;

pub use backend::{CacheBackend, CacheError, NoopCacheBackend, RedisCacheBackend, connect_backend};
pub use history_cache::{HistoryCache, HISTORY_CACHE_TTL};
