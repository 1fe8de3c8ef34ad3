//! Orders service errors.

use thiserror::Error;

use crate::{domain::inventory::InventoryError, domain::orders::status::OrderStatus, store::StoreError};

#[derive(Debug, Error)]
pub enum OrdersError {
    #[error("referenced entity not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("illegal status transition {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("payment already recorded")]
    PaymentAlreadyRecorded,

    #[error("storage error")]
    Store(#[from] StoreError),
}

impl From<InventoryError> for OrdersError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::NotFound => Self::NotFound,
            InventoryError::InvalidArgument(reason) => Self::InvalidArgument(reason),
            InventoryError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            InventoryError::Store(source) => Self::Store(source),
        }
    }
}
