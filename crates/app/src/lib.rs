//! Shared basket domain, cart store and collaborator clients.

pub mod cache;
pub mod context;
pub mod domain;

#[cfg(test)]
mod test;
