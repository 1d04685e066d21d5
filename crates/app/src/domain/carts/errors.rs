//! Carts service errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::{
    cache::CacheError,
    domain::{
        carts::{
            models::{CartLimitError, MAX_USER_ID_LEN},
            store::CartStoreError,
        },
        products::{ProductLookupError, models::ProductId},
    },
};

/// Cart use case, carried in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    GetCart,
    AddItem,
    RemoveItem,
    UpdateQuantity,
    ClearCart,
}

impl CartOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetCart => "get_cart",
            Self::AddItem => "add_item",
            Self::RemoveItem => "remove_item",
            Self::UpdateQuantity => "update_quantity",
            Self::ClearCart => "clear_cart",
        }
    }
}

impl Display for CartOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("user id is required")]
    MissingUserId,

    #[error("user id is {0} bytes long, the limit is {MAX_USER_ID_LEN}")]
    UserIdTooLong(usize),

    #[error("user id contains control characters")]
    UserIdControlCharacter,

    #[error("quantity must be at least {minimum}, got {quantity}")]
    QuantityTooSmall { minimum: i64, quantity: i64 },

    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),

    #[error("quantity of product {product_id} would exceed {max} after merging", max = u32::MAX)]
    MergedQuantityOverflow { product_id: ProductId },

    #[error("cart total would be too large to represent")]
    TotalOverflow,
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("product {product_id} is unavailable")]
    ProductUnavailable {
        product_id: ProductId,
        #[source]
        source: ProductLookupError,
    },

    #[error("cart store unavailable during {operation} for user {user_id}")]
    StoreUnavailable {
        operation: CartOperation,
        user_id: String,
        #[source]
        source: CacheError,
    },

    #[error("stored cart for user {user_id} is unreadable ({operation})")]
    DataCorruption {
        operation: CartOperation,
        user_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cart for user {user_id} could not be encoded ({operation})")]
    Serialization {
        operation: CartOperation,
        user_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} for user {user_id} timed out")]
    Timeout {
        operation: CartOperation,
        user_id: String,
    },
}

impl CartsServiceError {
    pub(crate) fn from_store(
        operation: CartOperation,
        user_id: &str,
        error: CartStoreError,
    ) -> Self {
        let user_id = user_id.to_string();

        match error {
            CartStoreError::Unavailable(source) => Self::StoreUnavailable {
                operation,
                user_id,
                source,
            },
            CartStoreError::Corrupted(source) => Self::DataCorruption {
                operation,
                user_id,
                source,
            },
            CartStoreError::Serialization(source) => Self::Serialization {
                operation,
                user_id,
                source,
            },
            CartStoreError::Limit(CartLimitError::QuantityOverflow(product_id)) => {
                Self::Validation(ValidationError::MergedQuantityOverflow { product_id })
            }
            CartStoreError::Limit(CartLimitError::TotalOverflow) => {
                Self::Validation(ValidationError::TotalOverflow)
            }
        }
    }
}
