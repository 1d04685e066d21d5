//! Products
//!
//! Read-only view of the product catalog. Carts only ever need to resolve a
//! single product by id, so that is the whole surface.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::ProductLookupError;
pub use service::*;
