//! Product lookup service.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::products::{
    errors::ProductLookupError,
    models::{ProductDescriptor, ProductId},
};

/// Configuration for reaching the product catalog.
#[derive(Debug, Clone)]
pub struct ProductCatalogConfig {
    /// Catalog base URL, e.g. `"http://product-service:8080"`.
    pub base_url: String,

    /// Upper bound for a single lookup, connect time included.
    pub timeout: Duration,
}

/// HTTP client for the product catalog's REST interface.
#[derive(Debug, Clone)]
pub struct HttpProductLookup {
    base_url: String,
    http: Client,
}

impl HttpProductLookup {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ProductCatalogConfig) -> Result<Self, ProductLookupError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn product_url(&self, product: ProductId) -> String {
        format!("{}/products/{product}", self.base_url)
    }
}

#[async_trait]
impl ProductLookup for HttpProductLookup {
    async fn get_product(&self, product: ProductId) -> Result<ProductDescriptor, ProductLookupError> {
        let response = self.http.get(self.product_url(product)).send().await?;

        match response.status() {
            status if status.is_success() => {
                let descriptor: ProductDescriptor = response.json().await?;

                debug!(product_id = %product, "resolved product descriptor");

                Ok(descriptor)
            }
            StatusCode::NOT_FOUND => Err(ProductLookupError::NotFound(product)),
            status => Err(ProductLookupError::UnexpectedResponse(status)),
        }
    }
}

#[automock]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch the current descriptor for a single product.
    async fn get_product(&self, product: ProductId) -> Result<ProductDescriptor, ProductLookupError>;
}
