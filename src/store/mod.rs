//! Persistence collaborator traits.
//!
//! The domain services are written against these traits and never against a
//! concrete engine. A real deployment binds them to its storage of choice;
//! [`MemoryStore`] is the in-process reference backend used by the test
//! suite.
//!
//! Two operations are deliberately conditional rather than plain writes:
//! [`CatalogStore::compare_and_swap_stock`] and
//! [`OrderStore::save_order_guarded`]. They are the serialization points for
//! the two contended resources (stock per item, status per order); an
//! implementation must apply each as a single atomic check-and-update.

mod memory;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub use memory::MemoryStore;

use crate::domain::{
    catalog::models::{
        AgeCategory, AgeCategoryUuid, Author, AuthorUuid, Customer, CustomerUuid, Genre,
        GenreUuid, Item, ItemUuid, Publisher, PublisherUuid, Review,
    },
    orders::{
        models::{Order, OrderUuid},
        status::OrderStatus,
    },
};

/// Errors surfaced by a persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed; the operation may or may not have been applied.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Predicate for item scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    All,
    ByPublisher(PublisherUuid),
    AgeCategoryIn(Vec<AgeCategoryUuid>),
}

/// Predicate for order scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    ByCustomer(CustomerUuid),
    ContainsItem(ItemUuid),
}

#[automock]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_item(&self, uuid: ItemUuid) -> Result<Option<Item>, StoreError>;

    /// Inserts or replaces an item.
    async fn save_item(&self, item: Item) -> Result<(), StoreError>;

    /// Removes an item and cascades its reviews, returning the number of
    /// items removed (0 or 1).
    async fn delete_item(&self, uuid: ItemUuid) -> Result<u64, StoreError>;

    async fn item_exists(&self, uuid: ItemUuid) -> Result<bool, StoreError>;

    async fn scan_items(&self, filter: ItemFilter) -> Result<Vec<Item>, StoreError>;

    /// Sets the item's stock to `new` only if it currently equals
    /// `expected`, as one atomic step. Returns false when the guard failed
    /// or the item is gone.
    async fn compare_and_swap_stock(
        &self,
        uuid: ItemUuid,
        expected: u32,
        new: u32,
    ) -> Result<bool, StoreError>;

    async fn load_publisher(&self, uuid: PublisherUuid) -> Result<Option<Publisher>, StoreError>;

    async fn save_publisher(&self, publisher: Publisher) -> Result<(), StoreError>;

    async fn publisher_exists(&self, uuid: PublisherUuid) -> Result<bool, StoreError>;

    async fn load_age_category(
        &self,
        uuid: AgeCategoryUuid,
    ) -> Result<Option<AgeCategory>, StoreError>;

    async fn save_age_category(&self, category: AgeCategory) -> Result<(), StoreError>;

    async fn age_category_exists(&self, uuid: AgeCategoryUuid) -> Result<bool, StoreError>;

    async fn list_age_categories(&self) -> Result<Vec<AgeCategory>, StoreError>;

    async fn save_author(&self, author: Author) -> Result<(), StoreError>;

    /// Loads the authors whose uuids appear in `uuids`; unknown uuids are
    /// simply absent from the result.
    async fn load_authors(&self, uuids: &[AuthorUuid]) -> Result<Vec<Author>, StoreError>;

    async fn save_genre(&self, genre: Genre) -> Result<(), StoreError>;

    async fn load_genres(&self, uuids: &[GenreUuid]) -> Result<Vec<Genre>, StoreError>;

    async fn save_customer(&self, customer: Customer) -> Result<(), StoreError>;

    async fn customer_exists(&self, uuid: CustomerUuid) -> Result<bool, StoreError>;

    async fn save_review(&self, review: Review) -> Result<(), StoreError>;

    async fn list_reviews_for_item(&self, item: ItemUuid) -> Result<Vec<Review>, StoreError>;
}

#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load_order(&self, uuid: OrderUuid) -> Result<Option<Order>, StoreError>;

    /// Inserts or replaces an order unconditionally.
    async fn save_order(&self, order: Order) -> Result<(), StoreError>;

    /// Replaces an order only if its persisted status still equals
    /// `expected`, as one atomic step. Returns false when the guard failed
    /// or the order is gone.
    async fn save_order_guarded(
        &self,
        order: Order,
        expected: OrderStatus,
    ) -> Result<bool, StoreError>;

    async fn scan_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, StoreError>;
}
