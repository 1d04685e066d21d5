//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors},
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{baskets, healthcheck, observability, state::State};

/// Basket routes, matching the paths clients of the basket service already use.
pub(crate) fn basket_router() -> Router {
    Router::with_path("baskets/{user_id}")
        .get(baskets::get::handler)
        .delete(baskets::clear::handler)
        .push(
            Router::with_path("items")
                .post(baskets::items::handlers::add::handler)
                .push(
                    Router::with_path("{product_id}")
                        .put(baskets::items::handlers::update::handler)
                        .delete(baskets::items::handlers::remove::handler),
                ),
        )
}

/// Full application router with middleware and operational endpoints.
pub(crate) fn app_router(state: Arc<State>) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("health")
                .get(healthcheck::handler)
                .head(healthcheck::head_handler),
        )
        .push(basket_router())
}

/// Any origin may call the API, matching the permissive CORS policy of the
/// public gateway.
pub(crate) fn cors() -> impl Handler {
    Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
        .into_handler()
}
