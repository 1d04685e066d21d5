//! Remove Basket Item Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use basket_app::domain::{carts::errors::CartOperation, products::models::ProductId};

use crate::{
    baskets::{errors::into_status_error, responses::MessageResponse},
    extensions::*,
};

/// Remove Basket Item Handler
#[endpoint(
    tags("baskets"),
    summary = "Remove Item from Basket",
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Basket storage unavailable"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Timed out"),
    ),
)]
#[tracing::instrument(
    name = "baskets.items.remove",
    skip(user_id, product_id, depot),
    fields(
        user_id = tracing::field::Empty,
        product_id = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    user_id: PathParam<String>,
    product_id: PathParam<u64>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let carts = depot.carts_or_500()?;
    let user_id = user_id.into_inner();
    let product_id = ProductId::new(product_id.into_inner());

    let span = tracing::Span::current();

    span.record("user_id", user_id.as_str());
    span.record("product_id", product_id.get());

    carts
        .remove_item(&user_id, product_id)
        .await
        .map_err(|error| into_status_error(CartOperation::RemoveItem, error))?;

    Ok(Json(MessageResponse::new("Item removed from basket successfully")))
}
