//! Clear Basket Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use basket_app::domain::carts::errors::CartOperation;

use crate::{
    baskets::{errors::into_status_error, responses::MessageResponse},
    extensions::*,
};

/// Clear Basket Handler
///
/// Deletes the user's basket. Clearing a missing basket still succeeds.
#[endpoint(
    tags("baskets"),
    summary = "Clear Basket",
    responses(
        (status_code = StatusCode::OK, description = "Basket cleared"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid user id"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Basket storage unavailable"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "Timed out"),
    ),
)]
#[tracing::instrument(
    name = "baskets.clear",
    skip(user_id, depot),
    fields(user_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let carts = depot.carts_or_500()?;
    let user_id = user_id.into_inner();

    tracing::Span::current().record("user_id", user_id.as_str());

    carts
        .clear_cart(&user_id)
        .await
        .map_err(|error| into_status_error(CartOperation::ClearCart, error))?;

    tracing::info!(%user_id, "cleared basket");

    Ok(Json(MessageResponse::new("Basket cleared successfully")))
}
