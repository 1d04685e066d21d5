//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::{
    cache::{CacheError, KeyValueCache, RedisCache},
    domain::{
        carts::{CacheCartsService, CartsService, store::CartStore},
        products::{HttpProductLookup, ProductCatalogConfig, ProductLookup, ProductLookupError},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to cache")]
    Cache(#[source] CacheError),

    #[error("failed to build product catalog client")]
    Catalog(#[source] ProductLookupError),
}

/// Settings needed to wire the application together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Redis connection URL, e.g. `"redis://localhost:6379/0"`.
    pub redis_url: String,

    /// Product catalog client settings.
    pub catalog: ProductCatalogConfig,

    /// Upper bound for each cache or catalog call made by a cart operation.
    pub operation_timeout: Duration,
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context, connecting to the cache.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache connection or catalog client cannot be established.
    pub async fn connect(config: AppConfig) -> Result<Self, AppInitError> {
        let cache = RedisCache::connect(&config.redis_url)
            .await
            .map_err(AppInitError::Cache)?;

        info!("connected to cache");

        let products = HttpProductLookup::new(config.catalog).map_err(AppInitError::Catalog)?;

        Ok(Self::from_parts(
            Arc::new(cache),
            Arc::new(products),
            config.operation_timeout,
        ))
    }

    /// Build application context from already constructed collaborators.
    #[must_use]
    pub fn from_parts(
        cache: Arc<dyn KeyValueCache>,
        products: Arc<dyn ProductLookup>,
        operation_timeout: Duration,
    ) -> Self {
        let store = Arc::new(CartStore::new(cache));

        Self {
            carts: Arc::new(
                CacheCartsService::new(store, products).with_operation_timeout(operation_timeout),
            ),
        }
    }
}
