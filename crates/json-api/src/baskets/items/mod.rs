//! Basket Items

pub(crate) mod handlers;
