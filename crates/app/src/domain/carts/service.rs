//! Carts service.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::{
    carts::{
        errors::{CartOperation, CartsServiceError, ValidationError},
        models::{Cart, CartItem, UserId},
        store::{CartStore, CartStoreError},
    },
    products::{ProductLookup, models::ProductId},
};

/// Default upper bound for one cache or catalog round trip.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct CacheCartsService {
    store: Arc<CartStore>,
    products: Arc<dyn ProductLookup>,
    operation_timeout: Duration,
}

impl fmt::Debug for CacheCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCartsService")
            .field("store", &self.store)
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

impl CacheCartsService {
    #[must_use]
    pub fn new(store: Arc<CartStore>, products: Arc<dyn ProductLookup>) -> Self {
        Self {
            store,
            products,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_operation_timeout(mut self, operation_timeout: Duration) -> Self {
        self.operation_timeout = operation_timeout;
        self
    }

    async fn bounded<T, F>(
        &self,
        operation: CartOperation,
        user: &UserId,
        call: F,
    ) -> Result<T, CartsServiceError>
    where
        F: Future<Output = Result<T, CartStoreError>>,
    {
        timeout(self.operation_timeout, call)
            .await
            .map_err(|_elapsed| CartsServiceError::Timeout {
                operation,
                user_id: user.to_string(),
            })?
            .map_err(|error| CartsServiceError::from_store(operation, user.as_str(), error))
    }
}

fn quantity_at_least(minimum: i64, quantity: i64) -> Result<u32, ValidationError> {
    if quantity < minimum {
        return Err(ValidationError::QuantityTooSmall { minimum, quantity });
    }

    u32::try_from(quantity).map_err(|_overflow| ValidationError::QuantityTooLarge(quantity))
}

#[async_trait]
impl CartsService for CacheCartsService {
    #[tracing::instrument(name = "carts.get", skip(self), err)]
    async fn get_cart(&self, user_id: &str) -> Result<Cart, CartsServiceError> {
        let user = UserId::parse(user_id)?;

        self.bounded(CartOperation::GetCart, &user, self.store.get(&user))
            .await
    }

    #[tracing::instrument(name = "carts.add_item", skip(self), err)]
    async fn add_item(
        &self,
        user_id: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartsServiceError> {
        let user = UserId::parse(user_id)?;
        let quantity = quantity_at_least(1, quantity)?;

        let descriptor = timeout(self.operation_timeout, self.products.get_product(product_id))
            .await
            .map_err(|_elapsed| CartsServiceError::Timeout {
                operation: CartOperation::AddItem,
                user_id: user.to_string(),
            })?
            .map_err(|source| {
                warn!(%product_id, "product lookup failed: {source}");

                CartsServiceError::ProductUnavailable { product_id, source }
            })?;

        let mut item = CartItem::from_descriptor(descriptor, quantity);
        item.product_id = product_id;

        let cart = self
            .bounded(
                CartOperation::AddItem,
                &user,
                self.store.add_item(&user, item),
            )
            .await?;

        info!(items = cart.items.len(), total = %cart.total, "added item to cart");

        Ok(())
    }

    #[tracing::instrument(name = "carts.remove_item", skip(self), err)]
    async fn remove_item(
        &self,
        user_id: &str,
        product_id: ProductId,
    ) -> Result<(), CartsServiceError> {
        let user = UserId::parse(user_id)?;

        self.bounded(
            CartOperation::RemoveItem,
            &user,
            self.store.remove_item(&user, product_id),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "carts.update_quantity", skip(self), err)]
    async fn update_quantity(
        &self,
        user_id: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartsServiceError> {
        let user = UserId::parse(user_id)?;
        let quantity = quantity_at_least(0, quantity)?;

        self.bounded(
            CartOperation::UpdateQuantity,
            &user,
            self.store.update_quantity(&user, product_id, quantity),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(name = "carts.clear", skip(self), err)]
    async fn clear_cart(&self, user_id: &str) -> Result<(), CartsServiceError> {
        let user = UserId::parse(user_id)?;

        self.bounded(CartOperation::ClearCart, &user, self.store.delete(&user))
            .await?;

        info!("cleared cart");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a user's cart. Unknown users get an empty cart.
    async fn get_cart(&self, user_id: &str) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` units of a product, resolving its details from the catalog.
    async fn add_item(
        &self,
        user_id: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartsServiceError>;

    /// Remove a product from the cart.
    async fn remove_item(
        &self,
        user_id: &str,
        product_id: ProductId,
    ) -> Result<(), CartsServiceError>;

    /// Set the quantity of a product already in the cart; zero removes it.
    async fn update_quantity(
        &self,
        user_id: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartsServiceError>;

    /// Delete the cart entirely.
    async fn clear_cart(&self, user_id: &str) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, dec};
    use testresult::TestResult;

    use crate::{
        cache::MockKeyValueCache,
        domain::products::{MockProductLookup, ProductLookupError},
        test::{CatalogStub, MemoryCache, descriptor},
    };

    use super::*;

    struct TestContext {
        cache: Arc<MemoryCache>,
        catalog: Arc<CatalogStub>,
        carts: CacheCartsService,
    }

    impl TestContext {
        fn new() -> Self {
            Self::with_catalog(CatalogStub::new())
        }

        fn with_catalog(catalog: CatalogStub) -> Self {
            let cache = Arc::new(MemoryCache::new());
            let catalog = Arc::new(catalog);

            catalog.put(descriptor(7, "Widget", dec!(9.5)));
            catalog.put(descriptor(8, "Gadget", dec!(4)));

            let carts = CacheCartsService::new(
                Arc::new(CartStore::new(cache.clone())),
                catalog.clone(),
            );

            Self {
                cache,
                catalog,
                carts,
            }
        }
    }

    fn strict_service() -> CacheCartsService {
        let mut cache = MockKeyValueCache::new();

        cache.expect_get().never();
        cache.expect_set_with_ttl().never();
        cache.expect_delete().never();

        let mut products = MockProductLookup::new();

        products.expect_get_product().never();

        CacheCartsService::new(Arc::new(CartStore::new(Arc::new(cache))), Arc::new(products))
    }

    #[tokio::test]
    async fn add_merge_and_zero_quantity_scenario() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item("u1", ProductId::new(7), 2).await?;

        let cart = ctx.carts.get_cart("u1").await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(
            cart.items.first().map(|item| (item.product_id, item.name.as_str(), item.price, item.quantity)),
            Some((ProductId::new(7), "Widget", dec!(9.5), 2))
        );
        assert_eq!(cart.total, dec!(19.0));

        ctx.carts.add_item("u1", ProductId::new(7), 3).await?;

        let cart = ctx.carts.get_cart("u1").await?;

        assert_eq!(cart.item(ProductId::new(7)).map(|item| item.quantity), Some(5));
        assert_eq!(cart.total, dec!(47.5));

        ctx.carts.update_quantity("u1", ProductId::new(7), 0).await?;

        let cart = ctx.carts.get_cart("u1").await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn failed_lookup_leaves_cart_untouched() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item("u1", ProductId::new(8), 1).await?;

        let before = ctx.cache.raw("basket:u1");

        let result = ctx.carts.add_item("u1", ProductId::new(999), 1).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::ProductUnavailable {
                    source: ProductLookupError::NotFound(_),
                    ..
                })
            ),
            "expected ProductUnavailable, got {result:?}"
        );
        assert_eq!(ctx.cache.raw("basket:u1"), before);
        assert_eq!(ctx.cache.writes(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn lookup_transport_failure_is_product_unavailable() {
        let mut products = MockProductLookup::new();

        products
            .expect_get_product()
            .once()
            .withf(|product| *product == ProductId::new(7))
            .returning(|_| {
                Err(ProductLookupError::UnexpectedResponse(
                    reqwest::StatusCode::BAD_GATEWAY,
                ))
            });

        let cache = Arc::new(MemoryCache::new());
        let carts = CacheCartsService::new(
            Arc::new(CartStore::new(cache.clone())),
            Arc::new(products),
        );

        let result = carts.add_item("u1", ProductId::new(7), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductUnavailable { .. })),
            "expected ProductUnavailable, got {result:?}"
        );
        assert_eq!(cache.writes(), 0);
    }

    #[tokio::test]
    async fn get_cart_for_unknown_user_does_not_persist() -> TestResult {
        let ctx = TestContext::new();

        let cart = ctx.carts.get_cart("nobody").await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);
        assert!(ctx.cache.raw("basket:nobody").is_none());

        ctx.carts.add_item("nobody", ProductId::new(8), 1).await?;

        assert!(ctx.cache.raw("basket:nobody").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_twice_succeeds_and_leaves_empty_cart() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item("u1", ProductId::new(7), 1).await?;

        ctx.carts.clear_cart("u1").await?;
        assert!(ctx.carts.get_cart("u1").await?.items.is_empty());

        ctx.carts.clear_cart("u1").await?;
        assert!(ctx.carts.get_cart("u1").await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_update_removes_exactly_one_item() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item("u1", ProductId::new(7), 1).await?;
        ctx.carts.add_item("u1", ProductId::new(8), 3).await?;

        ctx.carts.update_quantity("u1", ProductId::new(8), 0).await?;

        let cart = ctx.carts.get_cart("u1").await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, dec!(9.5));

        Ok(())
    }

    #[tokio::test]
    async fn remove_and_update_of_absent_items_are_no_ops() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.remove_item("u1", ProductId::new(7)).await?;
        ctx.carts.update_quantity("u1", ProductId::new(7), 4).await?;

        assert_eq!(ctx.cache.writes(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn price_snapshot_survives_catalog_changes() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item("u1", ProductId::new(7), 1).await?;

        ctx.catalog.put(descriptor(7, "Widget Deluxe", dec!(12)));

        ctx.carts.update_quantity("u1", ProductId::new(7), 2).await?;
        ctx.carts.add_item("u1", ProductId::new(7), 1).await?;

        let cart = ctx.carts.get_cart("u1").await?;

        assert_eq!(
            cart.item(ProductId::new(7)).map(|item| (item.name.as_str(), item.price, item.quantity)),
            Some(("Widget", dec!(9.5), 3))
        );
        assert_eq!(cart.total, dec!(28.5));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_store_or_catalog() {
        let carts = strict_service();

        let cases = [
            carts.get_cart("").await.err(),
            carts.add_item("u1", ProductId::new(7), 0).await.err(),
            carts.add_item("u1", ProductId::new(7), -2).await.err(),
            carts.add_item("", ProductId::new(7), 1).await.err(),
            carts.remove_item(" ", ProductId::new(7)).await.err(),
            carts.update_quantity("u1", ProductId::new(7), -1).await.err(),
            carts
                .update_quantity("u1", ProductId::new(7), i64::from(u32::MAX) + 1)
                .await
                .err(),
            carts.clear_cart("u1\n").await.err(),
        ];

        for case in cases {
            assert!(
                matches!(case, Some(CartsServiceError::Validation(_))),
                "expected Validation error, got {case:?}"
            );
        }
    }

    #[tokio::test]
    async fn slow_catalog_surfaces_timeout_without_writing() {
        let ctx = TestContext::with_catalog(CatalogStub::with_delay(Duration::from_secs(5)));
        let carts = ctx.carts.with_operation_timeout(Duration::from_millis(20));

        let result = carts.add_item("u1", ProductId::new(7), 1).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Timeout {
                    operation: CartOperation::AddItem,
                    ..
                })
            ),
            "expected Timeout, got {result:?}"
        );
        assert_eq!(ctx.cache.writes(), 0);
    }

    #[tokio::test]
    async fn corrupted_cart_is_reported_with_context() {
        let ctx = TestContext::new();

        ctx.cache.insert_raw("basket:u1", b"garbage".to_vec());

        let result = ctx.carts.get_cart("u1").await;

        assert!(
            matches!(
                &result,
                Err(CartsServiceError::DataCorruption {
                    operation: CartOperation::GetCart,
                    user_id,
                    ..
                }) if user_id == "u1"
            ),
            "expected DataCorruption, got {result:?}"
        );
        assert_eq!(ctx.cache.raw("basket:u1"), Some(b"garbage".to_vec()));
    }

    #[tokio::test]
    async fn merge_past_quantity_limit_is_rejected_with_product() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts
            .add_item("u1", ProductId::new(7), i64::from(u32::MAX))
            .await?;

        let writes = ctx.cache.writes();
        let result = ctx.carts.add_item("u1", ProductId::new(7), 1).await;

        assert!(
            matches!(
                &result,
                Err(CartsServiceError::Validation(ValidationError::MergedQuantityOverflow {
                    product_id
                })) if *product_id == ProductId::new(7)
            ),
            "expected MergedQuantityOverflow, got {result:?}"
        );
        assert_eq!(ctx.cache.writes(), writes);
        assert_eq!(
            ctx.carts
                .get_cart("u1")
                .await?
                .item(ProductId::new(7))
                .map(|item| item.quantity),
            Some(u32::MAX)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unrepresentable_total_is_a_validation_error() {
        let ctx = TestContext::new();

        ctx.catalog.put(descriptor(9, "Yacht", dec!(50000000000000000000000)));

        let result = ctx
            .carts
            .add_item("u1", ProductId::new(9), 4_000_000_000)
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Validation(ValidationError::TotalOverflow))
            ),
            "expected TotalOverflow, got {result:?}"
        );
        assert_eq!(ctx.cache.writes(), 0);
        assert!(ctx.cache.raw("basket:u1").is_none());
    }
}
