//! Basket response bodies

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use basket_app::domain::carts::models::{Cart, CartItem};

/// A user's basket.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Owner of the basket
    pub user_id: String,

    /// Line items in insertion order
    pub items: Vec<CartItemResponse>,

    /// Sum of price times quantity over all items, as a decimal string
    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    /// When the basket was first created
    pub created_at: String,

    /// When the basket was last written
    pub updated_at: String,
}

/// A product line in a basket.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_id: u64,
    pub name: String,
    pub description: String,

    /// Unit price captured when the product was first added
    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub image_url: String,
    pub quantity: u32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id.get(),
            name: item.name,
            description: item.description,
            price: item.price,
            image_url: item.image_url,
            quantity: item.quantity,
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_id: cart.user_id.into(),
            items: cart.items.into_iter().map(Into::into).collect(),
            total: cart.total,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Acknowledgement returned by basket mutations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
