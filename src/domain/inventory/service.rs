//! Inventory service.
//!
//! Stock accounting for catalog items. There is no reservation concept
//! separate from the committed count: a decrease is applied immediately and
//! is the sole gate against overselling.

use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::inventory::errors::InventoryError,
    domain::catalog::models::ItemUuid,
    store::CatalogStore,
};

#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: Arc<S>,
}

impl<S: CatalogStore> InventoryService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the item's current stock quantity. Never negative.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NotFound`]: No such item.
    /// - [`InventoryError::Store`]: The persistence collaborator failed.
    pub async fn stock_level(&self, item: ItemUuid) -> Result<u32, InventoryError> {
        let item = self
            .store
            .load_item(item)
            .await?
            .ok_or(InventoryError::NotFound)?;

        Ok(item.stock)
    }

    /// Adds `amount` units to the item's stock, returning the new level.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidArgument`]: `amount` was zero, or the
    ///   increase would overflow the stock counter.
    /// - [`InventoryError::NotFound`]: No such item.
    /// - [`InventoryError::Store`]: The persistence collaborator failed.
    pub async fn increase_stock(
        &self,
        item: ItemUuid,
        amount: u32,
    ) -> Result<u32, InventoryError> {
        if amount == 0 {
            return Err(InventoryError::InvalidArgument(
                "amount must be a positive integer",
            ));
        }

        loop {
            let current = self.current_stock(item).await?;

            let new = current
                .checked_add(amount)
                .ok_or(InventoryError::InvalidArgument("stock counter overflow"))?;

            if self.store.compare_and_swap_stock(item, current, new).await? {
                debug!(%item, amount, new, "increased stock");

                return Ok(new);
            }
        }
    }

    /// Removes `amount` units from the item's stock, returning the new
    /// level.
    ///
    /// The check and the update run as one conditional write guarded by the
    /// pre-decrement quantity, so concurrent decreases never drive the count
    /// negative: each unit is sold at most once.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidArgument`]: `amount` was zero.
    /// - [`InventoryError::NotFound`]: No such item.
    /// - [`InventoryError::InsufficientStock`]: The decrease would drop the
    ///   quantity below zero; stock is left unchanged.
    /// - [`InventoryError::Store`]: The persistence collaborator failed.
    pub async fn decrease_stock(
        &self,
        item: ItemUuid,
        amount: u32,
    ) -> Result<u32, InventoryError> {
        if amount == 0 {
            return Err(InventoryError::InvalidArgument(
                "amount must be a positive integer",
            ));
        }

        loop {
            let current = self.current_stock(item).await?;

            let new = current
                .checked_sub(amount)
                .ok_or(InventoryError::InsufficientStock {
                    requested: amount,
                    available: current,
                })?;

            if self.store.compare_and_swap_stock(item, current, new).await? {
                debug!(%item, amount, new, "decreased stock");

                return Ok(new);
            }
        }
    }

    async fn current_stock(&self, item: ItemUuid) -> Result<u32, InventoryError> {
        Ok(self
            .store
            .load_item(item)
            .await?
            .ok_or(InventoryError::NotFound)?
            .stock)
    }
}
