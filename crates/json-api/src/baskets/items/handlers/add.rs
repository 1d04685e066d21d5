//! Add Basket Item Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use basket_app::domain::{carts::errors::CartOperation, products::models::ProductId};

use crate::{
    baskets::{errors::into_status_error, responses::MessageResponse},
    extensions::*,
};

/// Add Basket Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    /// Catalog identifier of the product
    pub product_id: u64,

    /// Units to add, at least 1
    pub quantity: i64,
}

/// Add Basket Item Handler
///
/// Looks the product up in the catalog and adds it to the basket. Adding a
/// product that is already present increases its quantity.
#[endpoint(
    tags("baskets"),
    summary = "Add Item to Basket",
    responses(
        (status_code = StatusCode::OK, description = "Item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Basket storage unavailable"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Timed out"),
    ),
)]
#[tracing::instrument(
    name = "baskets.items.add",
    skip(user_id, json, depot),
    fields(
        user_id = tracing::field::Empty,
        product_id = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    user_id: PathParam<String>,
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let carts = depot.carts_or_500()?;
    let user_id = user_id.into_inner();
    let request = json.into_inner();
    let product_id = ProductId::new(request.product_id);

    let span = tracing::Span::current();

    span.record("user_id", user_id.as_str());
    span.record("product_id", request.product_id);
    span.record("quantity", request.quantity);

    carts
        .add_item(&user_id, product_id, request.quantity)
        .await
        .map_err(|error| into_status_error(CartOperation::AddItem, error))?;

    tracing::info!(%user_id, %product_id, quantity = request.quantity, "added basket item");

    Ok(Json(MessageResponse::new("Item added to basket successfully")))
}
