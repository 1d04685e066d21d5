//! Cart Store
//!
//! Each cart lives as one JSON record under `basket:{user_id}`. Every change
//! is a full read-modify-write of that record, and every write resets its
//! expiry to [`CART_TTL`].
//!
//! Mutations for the same user are serialized inside one process. Two
//! processes writing the same cart still race, and the later write wins.

use std::{fmt, sync::Arc, time::Duration};

use jiff::Timestamp;
use thiserror::Error;
use tracing::debug;

use crate::{
    cache::{CacheError, KeyValueCache},
    domain::{
        carts::{
            locks::UserLocks,
            models::{Cart, CartItem, CartLimitError, UserId},
        },
        products::models::ProductId,
    },
};

/// Expiry applied to a cart record on every write.
pub const CART_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cache unavailable")]
    Unavailable(#[from] CacheError),

    #[error("stored cart is corrupted")]
    Corrupted(#[source] serde_json::Error),

    #[error("failed to encode cart")]
    Serialization(#[source] serde_json::Error),

    #[error("cart change rejected: {0}")]
    Limit(#[from] CartLimitError),
}

pub struct CartStore {
    cache: Arc<dyn KeyValueCache>,
    locks: UserLocks,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            cache,
            locks: UserLocks::new(),
        }
    }

    /// Load a user's cart. A missing record yields a fresh empty cart that is
    /// not written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is unreachable or the record cannot be decoded.
    pub async fn get(&self, user: &UserId) -> Result<Cart, CartStoreError> {
        let Some(bytes) = self.cache.get(&user.cache_key()).await? else {
            return Ok(Cart::empty(user.clone(), Timestamp::now()));
        };

        Cart::decode(&bytes).map_err(CartStoreError::Corrupted)
    }

    /// Stamp `updated_at` and write the whole cart back with a fresh expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the cache is unreachable.
    pub async fn save(&self, cart: &mut Cart) -> Result<(), CartStoreError> {
        cart.updated_at = Timestamp::now();

        let bytes = cart.encode().map_err(CartStoreError::Serialization)?;

        self.cache
            .set_with_ttl(&cart.user_id.cache_key(), bytes, CART_TTL)
            .await?;

        debug!(user_id = %cart.user_id, items = cart.items.len(), "saved cart");

        Ok(())
    }

    /// Remove a user's cart record. Missing records are fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is unreachable.
    pub async fn delete(&self, user: &UserId) -> Result<(), CartStoreError> {
        let key = user.cache_key();
        let _guard = self.locks.lock(&key).await;

        self.cache.delete(&key).await?;

        Ok(())
    }

    /// Add `item`, merging its quantity into an existing item for the same
    /// product.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read or written, or the merged
    /// quantity or total overflows. Nothing is written in that case.
    pub async fn add_item(&self, user: &UserId, item: CartItem) -> Result<Cart, CartStoreError> {
        self.modify(user, |cart| {
            cart.merge_item(item)?;

            Ok(true)
        })
        .await
    }

    /// Remove the item for `product`. Absent items leave the record untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read or written.
    pub async fn remove_item(
        &self,
        user: &UserId,
        product: ProductId,
    ) -> Result<Cart, CartStoreError> {
        self.modify(user, |cart| Ok(cart.remove_item(product)?))
            .await
    }

    /// Set the quantity for `product`; zero removes the item. Absent items
    /// leave the record untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be read or written, or the new
    /// total overflows.
    pub async fn update_quantity(
        &self,
        user: &UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartStoreError> {
        self.modify(user, |cart| Ok(cart.set_quantity(product, quantity)?))
            .await
    }

    async fn modify<F>(&self, user: &UserId, change: F) -> Result<Cart, CartStoreError>
    where
        F: FnOnce(&mut Cart) -> Result<bool, CartStoreError> + Send,
    {
        let _guard = self.locks.lock(&user.cache_key()).await;

        let mut cart = self.get(user).await?;

        if change(&mut cart)? {
            self.save(&mut cart).await?;
        }

        Ok(cart)
    }
}
