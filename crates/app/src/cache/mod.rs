//! Key-value cache handle

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

mod redis;

pub use self::redis::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to connect to cache")]
    Connection(#[source] ::redis::RedisError),

    #[error("cache command failed")]
    Transport(#[source] ::redis::RedisError),
}

/// Minimal set of cache commands the cart store relies on.
#[automock]
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Fetch the raw value stored under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value and resetting
    /// its expiry to `ttl`.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration)
    -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
