//! Basket JSON API Healthcheck Handlers

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

const SERVICE_NAME: &str = "basket-service";

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Service status
    pub status: String,

    /// Name of the reporting service
    pub service: String,
}

/// Healthcheck handler
///
/// Reports that the process is up. It does not probe the cache or catalog.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_owned(),
        service: SERVICE_NAME.to_owned(),
    })
}

/// Body-less variant for load balancers probing with `HEAD`.
#[handler]
pub(crate) async fn head_handler(res: &mut Response) {
    res.status_code(StatusCode::OK);
}
