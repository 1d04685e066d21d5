//! Get Basket Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use basket_app::domain::carts::errors::CartOperation;

use crate::{
    baskets::{errors::into_status_error, responses::CartResponse},
    extensions::*,
};

/// Get Basket Handler
///
/// Returns the user's basket. Users without a stored basket get an empty one.
#[endpoint(
    tags("baskets"),
    summary = "Get Basket",
    responses(
        (status_code = StatusCode::OK, description = "Basket"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid user id"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Basket storage unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Timed out"),
    ),
)]
#[tracing::instrument(
    name = "baskets.get",
    skip(user_id, depot),
    fields(user_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let carts = depot.carts_or_500()?;
    let user_id = user_id.into_inner();

    tracing::Span::current().record("user_id", user_id.as_str());

    let cart = carts
        .get_cart(&user_id)
        .await
        .map_err(|error| into_status_error(CartOperation::GetCart, error))?;

    Ok(Json(cart.into()))
}
