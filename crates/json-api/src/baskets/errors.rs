//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use basket_app::domain::carts::{CartsServiceError, errors::CartOperation};

use crate::observability::observe_cart_failure;

/// Map a cart service failure onto an HTTP status, logging server-side causes.
pub(crate) fn into_status_error(operation: CartOperation, error: CartsServiceError) -> StatusError {
    observe_cart_failure(operation.as_str(), failure_kind(&error));

    match error {
        CartsServiceError::Validation(reason) => {
            StatusError::bad_request().brief(reason.to_string())
        }
        CartsServiceError::ProductUnavailable { product_id, source } => {
            warn!(%operation, %product_id, "product lookup failed: {source}");

            StatusError::not_found().brief(format!("Product {product_id} not found"))
        }
        CartsServiceError::StoreUnavailable {
            operation,
            user_id,
            source,
        } => {
            error!(%operation, %user_id, "basket store unavailable: {source}");

            StatusError::service_unavailable().brief("Basket storage is unavailable")
        }
        error @ (CartsServiceError::DataCorruption { .. }
        | CartsServiceError::Serialization { .. }) => {
            error!(%operation, "{error}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Timeout { operation, user_id } => {
            error!(%operation, %user_id, "basket operation timed out");

            StatusError::gateway_timeout().brief("Basket operation timed out")
        }
    }
}

fn failure_kind(error: &CartsServiceError) -> &'static str {
    match error {
        CartsServiceError::Validation(_) => "validation",
        CartsServiceError::ProductUnavailable { .. } => "product_unavailable",
        CartsServiceError::StoreUnavailable { .. } => "store_unavailable",
        CartsServiceError::DataCorruption { .. } => "data_corruption",
        CartsServiceError::Serialization { .. } => "serialization",
        CartsServiceError::Timeout { .. } => "timeout",
    }
}
