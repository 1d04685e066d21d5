//! Update Basket Item Quantity Handler

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

/// Update Basket Item Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateQuantityRequest {
    /// New quantity; zero removes the item
    pub quantity: i64,
}

/// Update Basket Item Quantity Handler
///
/// Sets the quantity of a product already in the basket. Products that are
/// not in the basket are left alone.
#[endpoint(
    tags("baskets"),
    summary = "Update Basket Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Basket storage unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Timed out"),
    ),
)]
#[tracing::instrument(
    name = "baskets.items.update",
    skip(user_id, product_id, json, depot),
    fields(
        user_id = tracing::field::Empty,
        product_id = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    user_id: PathParam<String>,
    product_id: PathParam<u64>,
    json: JsonBody<UpdateQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let carts = depot.carts_or_500()?;
    let user_id = user_id.into_inner();
    let product_id = ProductId::new(product_id.into_inner());
    let quantity = json.into_inner().quantity;

    let span = tracing::Span::current();

    span.record("user_id", user_id.as_str());
    span.record("product_id", product_id.get());
    span.record("quantity", quantity);

    carts
        .update_quantity(&user_id, product_id, quantity)
        .await
        .map_err(|error| into_status_error(CartOperation::UpdateQuantity, error))?;

    Ok(Json(MessageResponse::new("Item quantity updated successfully")))
}
