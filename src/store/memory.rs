//! In-memory persistence backend.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::{
    domain::{
        catalog::models::{
            AgeCategory, AgeCategoryUuid, Author, AuthorUuid, Customer, CustomerUuid, Genre,
            GenreUuid, Item, ItemUuid, Publisher, PublisherUuid, Review, ReviewUuid,
        },
        orders::{
            models::{Order, OrderUuid},
            status::OrderStatus,
        },
    },
    store::{CatalogStore, ItemFilter, OrderFilter, OrderStore, StoreError},
};

/// In-memory store implementation.
///
/// Backs the test suite and doubles as the reference semantics for a real
/// backend: upsert saves, review cascade on item delete, and conditional
/// writes applied under a single write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<FxHashMap<ItemUuid, Item>>>,
    publishers: Arc<RwLock<FxHashMap<PublisherUuid, Publisher>>>,
    age_categories: Arc<RwLock<FxHashMap<AgeCategoryUuid, AgeCategory>>>,
    authors: Arc<RwLock<FxHashMap<AuthorUuid, Author>>>,
    genres: Arc<RwLock<FxHashMap<GenreUuid, Genre>>>,
    customers: Arc<RwLock<FxHashMap<CustomerUuid, Customer>>>,
    reviews: Arc<RwLock<FxHashMap<ReviewUuid, Review>>>,
    orders: Arc<RwLock<FxHashMap<OrderUuid, Order>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load_item(&self, uuid: ItemUuid) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(&uuid).cloned())
    }

    async fn save_item(&self, item: Item) -> Result<(), StoreError> {
        self.items.write().await.insert(item.uuid, item);

        Ok(())
    }

    async fn delete_item(&self, uuid: ItemUuid) -> Result<u64, StoreError> {
        let removed = self.items.write().await.remove(&uuid);

        if removed.is_none() {
            return Ok(0);
        }

        // Reviews cascade with their item.
        self.reviews
            .write()
            .await
            .retain(|_, review| review.item_uuid != uuid);

        Ok(1)
    }

    async fn item_exists(&self, uuid: ItemUuid) -> Result<bool, StoreError> {
        Ok(self.items.read().await.contains_key(&uuid))
    }

    async fn scan_items(&self, filter: ItemFilter) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().await;

        let mut matched: Vec<Item> = items
            .values()
            .filter(|item| match &filter {
                ItemFilter::All => true,
                ItemFilter::ByPublisher(publisher) => item.publisher_uuid == *publisher,
                ItemFilter::AgeCategoryIn(categories) => {
                    categories.contains(&item.age_category_uuid)
                }
            })
            .cloned()
            .collect();

        matched.sort_by_key(|item| item.uuid);

        Ok(matched)
    }

    async fn compare_and_swap_stock(
        &self,
        uuid: ItemUuid,
        expected: u32,
        new: u32,
    ) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;

        match items.get_mut(&uuid) {
            Some(item) if item.stock == expected => {
                item.stock = new;

                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn load_publisher(&self, uuid: PublisherUuid) -> Result<Option<Publisher>, StoreError> {
        Ok(self.publishers.read().await.get(&uuid).cloned())
    }

    async fn save_publisher(&self, publisher: Publisher) -> Result<(), StoreError> {
        self.publishers
            .write()
            .await
            .insert(publisher.uuid, publisher);

        Ok(())
    }

    async fn publisher_exists(&self, uuid: PublisherUuid) -> Result<bool, StoreError> {
        Ok(self.publishers.read().await.contains_key(&uuid))
    }

    async fn load_age_category(
        &self,
        uuid: AgeCategoryUuid,
    ) -> Result<Option<AgeCategory>, StoreError> {
        Ok(self.age_categories.read().await.get(&uuid).cloned())
    }

    async fn save_age_category(&self, category: AgeCategory) -> Result<(), StoreError> {
        self.age_categories
            .write()
            .await
            .insert(category.uuid, category);

        Ok(())
    }

    async fn age_category_exists(&self, uuid: AgeCategoryUuid) -> Result<bool, StoreError> {
        Ok(self.age_categories.read().await.contains_key(&uuid))
    }

    async fn list_age_categories(&self) -> Result<Vec<AgeCategory>, StoreError> {
        let mut categories: Vec<AgeCategory> =
            self.age_categories.read().await.values().cloned().collect();

        categories.sort_by_key(|category| category.uuid);

        Ok(categories)
    }

    async fn save_author(&self, author: Author) -> Result<(), StoreError> {
        self.authors.write().await.insert(author.uuid, author);

        Ok(())
    }

    async fn load_authors(&self, uuids: &[AuthorUuid]) -> Result<Vec<Author>, StoreError> {
        let authors = self.authors.read().await;

        Ok(uuids
            .iter()
            .filter_map(|uuid| authors.get(uuid).cloned())
            .collect())
    }

    async fn save_genre(&self, genre: Genre) -> Result<(), StoreError> {
        self.genres.write().await.insert(genre.uuid, genre);

        Ok(())
    }

    async fn load_genres(&self, uuids: &[GenreUuid]) -> Result<Vec<Genre>, StoreError> {
        let genres = self.genres.read().await;

        Ok(uuids
            .iter()
            .filter_map(|uuid| genres.get(uuid).cloned())
            .collect())
    }

    async fn save_customer(&self, customer: Customer) -> Result<(), StoreError> {
        self.customers.write().await.insert(customer.uuid, customer);

        Ok(())
    }

    async fn customer_exists(&self, uuid: CustomerUuid) -> Result<bool, StoreError> {
        Ok(self.customers.read().await.contains_key(&uuid))
    }

    async fn save_review(&self, review: Review) -> Result<(), StoreError> {
        self.reviews.write().await.insert(review.uuid, review);

        Ok(())
    }

    async fn list_reviews_for_item(&self, item: ItemUuid) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;

        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|review| review.item_uuid == item)
            .cloned()
            .collect();

        matched.sort_by_key(|review| (review.created_at, review.uuid));

        Ok(matched)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn load_order(&self, uuid: OrderUuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&uuid).cloned())
    }

    async fn save_order(&self, order: Order) -> Result<(), StoreError> {
        self.orders.write().await.insert(order.uuid, order);

        Ok(())
    }

    async fn save_order_guarded(
        &self,
        order: Order,
        expected: OrderStatus,
    ) -> Result<bool, StoreError> {
        let mut orders = self.orders.write().await;

        match orders.get(&order.uuid) {
            Some(current) if current.status == expected => {
                orders.insert(order.uuid, order);

                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn scan_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;

        let mut matched: Vec<Order> = orders
            .values()
            .filter(|order| match filter {
                OrderFilter::ByCustomer(customer) => order.customer_uuid == customer,
                OrderFilter::ContainsItem(item) => {
                    order.lines.iter().any(|line| line.item_uuid == item)
                }
            })
            .cloned()
            .collect();

        matched.sort_by_key(|order| (order.created_at, order.uuid));

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::domain::{
        catalog::models::{ConditionFacet, NewItem, Rating},
        orders::models::OrderLine,
    };

    use super::*;

    fn item(stock: u32) -> Item {
        Item::new(NewItem {
            uuid: ItemUuid::new(),
            name: "Stocked".to_string(),
            description: String::new(),
            image_url: String::new(),
            published_on: date(2020, 1, 1),
            language: "en".to_string(),
            price: Decimal::new(999, 2),
            stock,
            publisher_uuid: PublisherUuid::new(),
            age_category_uuid: AgeCategoryUuid::new(),
            condition: ConditionFacet::New { is_sealed: true },
            content: None,
        })
        .unwrap()
    }

    fn review_for(item_uuid: ItemUuid) -> Review {
        Review {
            uuid: ReviewUuid::new(),
            rating: Rating::new(4).unwrap(),
            text: "good".to_string(),
            created_at: Timestamp::now(),
            customer_uuid: CustomerUuid::new(),
            item_uuid,
        }
    }

    #[tokio::test]
    async fn save_item_is_an_upsert() -> TestResult {
        let store = MemoryStore::new();
        let mut subject = item(3);
        let uuid = subject.uuid;

        store.save_item(subject.clone()).await?;

        subject.name = "Renamed".to_string();
        store.save_item(subject).await?;

        assert_eq!(store.load_item(uuid).await?.unwrap().name, "Renamed");

        Ok(())
    }

    #[tokio::test]
    async fn delete_item_cascades_reviews() -> TestResult {
        let store = MemoryStore::new();
        let subject = item(1);
        let uuid = subject.uuid;

        store.save_item(subject).await?;
        store.save_review(review_for(uuid)).await?;
        store.save_review(review_for(uuid)).await?;

        let other = item(1);
        store.save_item(other.clone()).await?;
        store.save_review(review_for(other.uuid)).await?;

        assert_eq!(store.delete_item(uuid).await?, 1);
        assert!(store.list_reviews_for_item(uuid).await?.is_empty());

        // Unrelated reviews survive.
        assert_eq!(store.list_reviews_for_item(other.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_item_affects_nothing() -> TestResult {
        let store = MemoryStore::new();

        assert_eq!(store.delete_item(ItemUuid::new()).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cas_stock_rejects_stale_expectation() -> TestResult {
        let store = MemoryStore::new();
        let subject = item(5);
        let uuid = subject.uuid;

        store.save_item(subject).await?;

        assert!(store.compare_and_swap_stock(uuid, 5, 4).await?);
        assert!(!store.compare_and_swap_stock(uuid, 5, 3).await?);
        assert_eq!(store.load_item(uuid).await?.unwrap().stock, 4);

        Ok(())
    }

    #[tokio::test]
    async fn cas_stock_on_missing_item_fails_guard() -> TestResult {
        let store = MemoryStore::new();

        assert!(!store.compare_and_swap_stock(ItemUuid::new(), 1, 0).await?);

        Ok(())
    }

    #[tokio::test]
    async fn guarded_order_save_rejects_stale_status() -> TestResult {
        let store = MemoryStore::new();
        let mut order = Order::new_cart(CustomerUuid::new(), Timestamp::now());
        let uuid = order.uuid;

        store.save_order(order.clone()).await?;

        order
            .apply_transition(OrderStatus::Pending, Timestamp::now())
            .unwrap();
        assert!(store
            .save_order_guarded(order.clone(), OrderStatus::Cart)
            .await?);

        // A second writer holding the old status loses.
        assert!(!store.save_order_guarded(order, OrderStatus::Cart).await?);

        assert_eq!(
            store.load_order(uuid).await?.unwrap().status,
            OrderStatus::Pending
        );

        Ok(())
    }

    #[tokio::test]
    async fn scan_orders_by_contained_item() -> TestResult {
        let store = MemoryStore::new();
        let wanted = ItemUuid::new();

        let mut with_item = Order::new_cart(CustomerUuid::new(), Timestamp::now());
        with_item.lines.push(OrderLine {
            item_uuid: wanted,
            quantity: 1,
        });

        let without_item = Order::new_cart(CustomerUuid::new(), Timestamp::now());

        store.save_order(with_item.clone()).await?;
        store.save_order(without_item).await?;

        let matched = store.scan_orders(OrderFilter::ContainsItem(wanted)).await?;

        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().unwrap().uuid, with_item.uuid);

        Ok(())
    }
}
