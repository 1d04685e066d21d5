//! Carts

pub mod errors;
mod locks;
pub mod models;
pub mod service;
pub mod store;

pub use errors::{CartsServiceError, ValidationError};
pub use service::*;
