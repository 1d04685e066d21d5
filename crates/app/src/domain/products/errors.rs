//! Product lookup errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::products::models::ProductId;

#[derive(Debug, Error)]
pub enum ProductLookupError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from product catalog: {0}")]
    UnexpectedResponse(StatusCode),
}
