//! Product Catalog Config

use clap::Args;

/// Product catalog settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Product service base URL
    #[arg(long, env = "PRODUCT_SERVICE_URL")]
    pub product_service_url: String,

    /// HTTP timeout in milliseconds for a single product lookup
    #[arg(long, env = "PRODUCT_LOOKUP_TIMEOUT_MS", default_value_t = 3_000_u64)]
    pub product_lookup_timeout_ms: u64,
}
