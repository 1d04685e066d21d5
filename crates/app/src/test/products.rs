//! Product catalog fixtures.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::domain::products::{
    ProductLookup, ProductLookupError,
    models::{ProductDescriptor, ProductId},
};

pub(crate) fn descriptor(id: u64, name: &str, price: Decimal) -> ProductDescriptor {
    ProductDescriptor {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        stock: 10,
        category: "general".to_string(),
        image_url: format!("https://cdn.example.com/{id}.png"),
        created_at: None,
        updated_at: None,
    }
}

/// Mutable in-memory catalog with an optional response delay.
#[derive(Debug, Default)]
pub(crate) struct CatalogStub {
    products: Mutex<FxHashMap<ProductId, ProductDescriptor>>,
    delay: Option<Duration>,
}

impl CatalogStub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn put(&self, descriptor: ProductDescriptor) {
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(descriptor.id, descriptor);
    }
}

#[async_trait]
impl ProductLookup for CatalogStub {
    async fn get_product(&self, product: ProductId) -> Result<ProductDescriptor, ProductLookupError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&product)
            .cloned()
            .ok_or(ProductLookupError::NotFound(product))
    }
}
