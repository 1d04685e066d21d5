//! Depot helper extensions.

use std::{any::Any, sync::Arc};

use salvo::prelude::{Depot, StatusError};

use basket_app::domain::carts::CartsService;

use crate::state::State;

/// Helpers for pulling shared state out of the depot inside handlers.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// The carts service from the injected application state.
    fn carts_or_500(&self) -> Result<Arc<dyn CartsService>, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_missing| StatusError::internal_server_error())
    }

    fn carts_or_500(&self) -> Result<Arc<dyn CartsService>, StatusError> {
        self.obtain_or_500::<Arc<State>>()
            .map(|state| Arc::clone(&state.app.carts))
    }
}
