//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use testresult::TestResult;

use basket_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartItem, UserId},
        },
        products::models::ProductId,
    },
};

use crate::{observability::request_logging, state::State};

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
    })
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(request_logging)
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

/// A mock that fails the test if any cart operation is called.
pub(crate) fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_remove_item().never();
    carts.expect_update_quantity().never();
    carts.expect_clear_cart().never();

    carts
}

pub(crate) fn make_cart(user_id: &str, items: Vec<CartItem>) -> TestResult<Cart> {
    let mut cart = Cart::empty(UserId::parse(user_id)?, Timestamp::UNIX_EPOCH);

    for item in items {
        cart.merge_item(item)?;
    }

    Ok(cart)
}

pub(crate) fn make_item(product_id: u64, name: &str, price: Decimal, quantity: u32) -> CartItem {
    CartItem {
        product_id: ProductId::new(product_id),
        name: name.to_owned(),
        description: format!("{name} description"),
        price,
        image_url: format!("https://img.example.com/{product_id}.png"),
        quantity,
    }
}
