//! Inventory service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("item not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("storage error")]
    Store(#[from] StoreError),
}
