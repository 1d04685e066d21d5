//! Baskets

mod errors;
mod handlers;
pub(crate) mod items;
mod responses;

pub(crate) use handlers::*;
