//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    carts::errors::ValidationError,
    products::models::{ProductDescriptor, ProductId},
};

/// Prefix for every cart record key in the cache.
pub const CART_KEY_PREFIX: &str = "basket:";

/// Longest user id accepted, in bytes.
pub const MAX_USER_ID_LEN: usize = 256;

/// User ID
///
/// Opaque external identifier. Control characters are rejected so the derived
/// cache key stays a single printable token; nothing else is escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank, too long or contains control characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::MissingUserId);
        }

        if raw.len() > MAX_USER_ID_LEN {
            return Err(ValidationError::UserIdTooLong(raw.len()));
        }

        if raw.chars().any(char::is_control) {
            return Err(ValidationError::UserIdControlCharacter);
        }

        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key holding this user's cart.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{CART_KEY_PREFIX}{}", self.0)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// CartItem Model
///
/// Carries the product details as they were when the item was first added.
/// Later quantity changes keep that snapshot, including its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot a product descriptor into a line item.
    #[must_use]
    pub fn from_descriptor(descriptor: ProductDescriptor, quantity: u32) -> Self {
        Self {
            product_id: descriptor.id,
            name: descriptor.name,
            description: descriptor.description,
            price: descriptor.price,
            image_url: descriptor.image_url,
            quantity,
        }
    }

    /// Price times quantity, or `None` if the product does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A cart change would push a quantity or amount past what can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartLimitError {
    #[error("quantity of product {0} would exceed {max}", max = u32::MAX)]
    QuantityOverflow(ProductId),

    #[error("cart total is too large to represent")]
    TotalOverflow,
}

fn sum_line_totals(items: &[CartItem]) -> Result<Decimal, CartLimitError> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        item.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(CartLimitError::TotalOverflow)
    })
}

impl Cart {
    /// A cart with no items, stamped at `now`.
    #[must_use]
    pub fn empty(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn item(&self, product: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product)
    }

    /// Add `item`, or bump the quantity of the item already holding its
    /// product. An existing item keeps its original snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged quantity does not fit in a `u32` or the
    /// new total overflows. The cart is unchanged on error.
    pub fn merge_item(&mut self, item: CartItem) -> Result<(), CartLimitError> {
        let mut items = self.items.clone();

        match items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartLimitError::QuantityOverflow(item.product_id))?;
            }
            None => items.push(item),
        }

        self.replace_items(items)
    }

    /// Drop the item for `product`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining total cannot be represented.
    pub fn remove_item(&mut self, product: ProductId) -> Result<bool, CartLimitError> {
        let Some(index) = self.position(product) else {
            return Ok(false);
        };

        let mut items = self.items.clone();
        items.remove(index);

        self.replace_items(items)?;

        Ok(true)
    }

    /// Set the quantity of the item for `product`; zero removes it. Returns
    /// whether the item was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the new total overflows. The cart is unchanged on error.
    pub fn set_quantity(
        &mut self,
        product: ProductId,
        quantity: u32,
    ) -> Result<bool, CartLimitError> {
        if quantity == 0 {
            return self.remove_item(product);
        }

        let Some(index) = self.position(product) else {
            return Ok(false);
        };

        let mut items = self.items.clone();

        if let Some(item) = items.get_mut(index) {
            item.quantity = quantity;
        }

        self.replace_items(items)?;

        Ok(true)
    }

    /// Rebuild `total` from the items.
    ///
    /// # Errors
    ///
    /// Returns an error if the sum cannot be represented; `total` is left as it was.
    pub fn recompute_total(&mut self) -> Result<(), CartLimitError> {
        self.total = sum_line_totals(&self.items)?;

        Ok(())
    }

    fn replace_items(&mut self, items: Vec<CartItem>) -> Result<(), CartLimitError> {
        self.total = sum_line_totals(&items)?;
        self.items = items;

        Ok(())
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a stored record. The stored total is ignored and rebuilt from
    /// the items.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid cart record or its items
    /// add up to more than can be represented.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let mut cart: Self = serde_json::from_slice(bytes)?;

        cart.recompute_total()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;

        Ok(cart)
    }

    fn position(&self, product: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    fn user() -> UserId {
        UserId("u1".to_string())
    }

    fn item(product: u64, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            description: String::new(),
            price,
            image_url: String::new(),
            quantity,
        }
    }

    fn assert_total_matches_items(cart: &Cart) {
        let expected: Decimal = cart
            .items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        assert_eq!(cart.total, expected, "total drifted from items");
    }

    #[test]
    fn user_id_rejects_blank_values() {
        assert_eq!(UserId::parse(""), Err(ValidationError::MissingUserId));
        assert_eq!(UserId::parse("   "), Err(ValidationError::MissingUserId));
    }

    #[test]
    fn user_id_rejects_control_characters() {
        assert_eq!(
            UserId::parse("u1\r\nDEL basket:u2"),
            Err(ValidationError::UserIdControlCharacter)
        );
    }

    #[test]
    fn user_id_rejects_oversized_values() {
        let raw = "x".repeat(MAX_USER_ID_LEN + 1);

        assert_eq!(
            UserId::parse(&raw),
            Err(ValidationError::UserIdTooLong(MAX_USER_ID_LEN + 1))
        );
    }

    #[test]
    fn cache_key_is_prefixed_and_unescaped() -> TestResult {
        assert_eq!(UserId::parse("team:42")?.cache_key(), "basket:team:42");

        Ok(())
    }

    #[test]
    fn merging_same_product_sums_quantities_and_keeps_first_snapshot() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(7, dec!(9.5), 2))?;

        let mut repriced = item(7, dec!(12.0), 3);
        repriced.name = "Renamed".to_string();

        cart.merge_item(repriced)?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item(ProductId::new(7)).map(|i| i.quantity), Some(5));
        assert_eq!(cart.item(ProductId::new(7)).map(|i| i.price), Some(dec!(9.5)));
        assert_eq!(
            cart.item(ProductId::new(7)).map(|i| i.name.as_str()),
            Some("Product 7")
        );
        assert_eq!(cart.total, dec!(47.5));

        Ok(())
    }

    #[test]
    fn merging_overflowing_quantity_is_rejected() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, dec!(1), u32::MAX))?;

        assert_eq!(
            cart.merge_item(item(1, dec!(1), 1)),
            Err(CartLimitError::QuantityOverflow(ProductId::new(1)))
        );
        assert_eq!(cart.item(ProductId::new(1)).map(|i| i.quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn new_products_append_in_insertion_order() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(3, dec!(1), 1))?;
        cart.merge_item(item(1, dec!(1), 1))?;
        cart.merge_item(item(2, dec!(1), 1))?;

        let order: Vec<u64> = cart.items.iter().map(|i| i.product_id.get()).collect();

        assert_eq!(order, vec![3, 1, 2]);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_item() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, dec!(2.5), 2))?;
        cart.merge_item(item(2, dec!(4), 1))?;

        assert!(cart.set_quantity(ProductId::new(1), 0)?);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, dec!(4));

        Ok(())
    }

    #[test]
    fn missing_items_are_left_alone() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, dec!(3), 1))?;

        assert!(!cart.remove_item(ProductId::new(99))?);
        assert!(!cart.set_quantity(ProductId::new(99), 4)?);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, dec!(3));

        Ok(())
    }

    #[test]
    fn total_tracks_every_mutation_exactly() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, dec!(0.1), 3))?;
        assert_total_matches_items(&cart);

        cart.merge_item(item(2, dec!(0.2), 7))?;
        assert_total_matches_items(&cart);

        cart.set_quantity(ProductId::new(1), 10)?;
        assert_total_matches_items(&cart);

        cart.merge_item(item(2, dec!(0.2), 1))?;
        assert_total_matches_items(&cart);

        cart.remove_item(ProductId::new(1))?;
        assert_total_matches_items(&cart);

        assert_eq!(cart.total, dec!(1.6));

        cart.set_quantity(ProductId::new(2), 0)?;
        assert_total_matches_items(&cart);

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn encoding_is_stable_across_a_round_trip() -> TestResult {
        let mut cart = Cart::empty(user(), "2026-03-01T10:00:00Z".parse()?);

        cart.merge_item(item(1, dec!(19.99), 2))?;
        cart.merge_item(item(2, dec!(0.1), 3))?;

        let encoded = cart.encode()?;
        let decoded = Cart::decode(&encoded)?;

        assert_eq!(decoded, cart);
        assert_eq!(decoded.encode()?, encoded);

        Ok(())
    }

    #[test]
    fn decode_accepts_records_with_float_prices() -> TestResult {
        let cart = Cart::decode(
            br#"{
                "user_id": "u1",
                "items": [{
                    "product_id": 7,
                    "name": "Widget",
                    "description": "",
                    "price": 9.5,
                    "image_url": "",
                    "quantity": 2
                }],
                "total": 19.0,
                "created_at": "2026-03-01T10:00:00Z",
                "updated_at": "2026-03-01T10:00:00+03:00"
            }"#,
        )?;

        assert_eq!(cart.total, dec!(19));
        assert_eq!(
            cart.item(ProductId::new(7)).and_then(CartItem::line_total),
            Some(dec!(19))
        );

        Ok(())
    }

    #[test]
    fn decode_rebuilds_a_drifted_total_from_items() -> TestResult {
        let cart = Cart::decode(
            br#"{
                "user_id": "u1",
                "items": [{
                    "product_id": 7,
                    "name": "Widget",
                    "description": "",
                    "price": 0.1,
                    "image_url": "",
                    "quantity": 3
                }],
                "total": 0.30000000000000004,
                "created_at": "2026-03-01T10:00:00Z",
                "updated_at": "2026-03-01T10:00:00Z"
            }"#,
        )?;

        assert_eq!(cart.total, dec!(0.3));
        assert_total_matches_items(&cart);

        Ok(())
    }

    #[test]
    fn oversized_line_total_is_rejected_without_panicking() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, dec!(1), 2))?;

        let huge = item(2, Decimal::MAX, u32::MAX);

        assert_eq!(huge.line_total(), None);
        assert_eq!(cart.merge_item(huge), Err(CartLimitError::TotalOverflow));
        assert_eq!(cart.items, vec![item(1, dec!(1), 2)]);
        assert_eq!(cart.total, dec!(2));

        Ok(())
    }

    #[test]
    fn raising_a_quantity_past_the_representable_total_is_rejected() -> TestResult {
        let mut cart = Cart::empty(user(), Timestamp::UNIX_EPOCH);

        cart.merge_item(item(1, Decimal::MAX, 1))?;

        assert_eq!(
            cart.set_quantity(ProductId::new(1), 2),
            Err(CartLimitError::TotalOverflow)
        );
        assert_eq!(cart.item(ProductId::new(1)).map(|i| i.quantity), Some(1));

        Ok(())
    }

    #[test]
    fn decode_rejects_invalid_user_id() {
        let result = Cart::decode(
            br#"{"user_id":"","items":[],"total":"0","created_at":"2026-03-01T10:00:00Z","updated_at":"2026-03-01T10:00:00Z"}"#,
        );

        assert!(result.is_err(), "expected decode failure for blank user id");
    }
}
