//! Cache Config

use clap::Args;

/// Cart cache settings.
#[derive(Debug, Args)]
pub struct CacheConfig {
    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: String,

    /// Upper bound in milliseconds for each cache or catalog call of a cart operation
    #[arg(long, env = "CART_OPERATION_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub cart_operation_timeout_ms: u64,
}
