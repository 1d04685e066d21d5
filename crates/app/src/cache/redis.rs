//! Redis cache

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use super::{CacheError, KeyValueCache};

/// Process-wide Redis handle.
///
/// The connection manager multiplexes commands over one connection and
/// reconnects on failure, so clones can be used concurrently from any task.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(CacheError::Connection)?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(CacheError::Connection)?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection.clone();

        connection
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(CacheError::Transport)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();

        connection
            .set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(CacheError::Transport)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();

        connection
            .del::<_, ()>(key)
            .await
            .map_err(CacheError::Transport)
    }
}
