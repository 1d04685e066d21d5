//! Basket Domain Concerns

pub mod carts;
pub mod products;
