//! Server configuration module

use std::time::Duration;

use clap::Parser;

use basket_app::{context::AppConfig, domain::products::ProductCatalogConfig};

use crate::config::{
    cache::CacheConfig,
    catalog::CatalogConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod cache;
pub(crate) mod catalog;
pub(crate) mod observability;
pub(crate) mod server;

/// Basket JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "basket-json", about = "Basket JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Cart cache settings.
    #[command(flatten)]
    pub cache: CacheConfig,

    /// Product catalog settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Application wiring settings derived from the CLI/env values.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            redis_url: self.cache.redis_url.clone(),
            catalog: ProductCatalogConfig {
                base_url: self.catalog.product_service_url.clone(),
                timeout: Duration::from_millis(self.catalog.product_lookup_timeout_ms),
            },
            operation_timeout: Duration::from_millis(self.cache.cart_operation_timeout_ms),
        }
    }
}
