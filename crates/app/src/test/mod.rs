//! Test doubles and fixtures shared by service-level tests.

mod products;

pub(crate) use cache::MemoryCache;
pub(crate) use products::{CatalogStub, descriptor};
