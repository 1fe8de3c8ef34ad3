//! Catalog service errors.

use thiserror::Error;

use crate::{domain::catalog::models::RatingError, prices::PriceError, store::StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("referenced entity not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid price value")]
    InvalidPrice(#[from] PriceError),

    #[error("invalid rating value")]
    InvalidRating(#[from] RatingError),

    #[error("storage error")]
    Store(#[from] StoreError),
}
