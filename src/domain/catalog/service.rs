//! Catalog service.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::info;

use crate::{
    domain::catalog::{
        data::{ContentView, ItemSummary, ItemView, ReviewSummary, to_civil},
        errors::CatalogError,
        models::{
            AgeCategory, AgeCategoryUuid, Author, AuthorUuid, ContentFacet, Customer, Genre,
            GenreUuid, Item, ItemUpdate, ItemUuid, NewItem, NewReview, Publisher, PublisherUuid,
            Rating, Review,
        },
        rating::average_rating,
    },
    prices::Price,
    store::{CatalogStore, ItemFilter},
};

#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S: CatalogStore> CatalogService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates and stores a new item.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidPrice`] / [`CatalogError::InvalidArgument`]:
    ///   The item shape failed validation (see [`Item::new`]).
    /// - [`CatalogError::NotFound`]: The referenced publisher, age category,
    ///   author or genre does not exist.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_item(&self, item: NewItem) -> Result<Item, CatalogError> {
        let item = Item::new(item)?;

        if !self.store.publisher_exists(item.publisher_uuid).await? {
            return Err(CatalogError::NotFound);
        }

        if !self.store.age_category_exists(item.age_category_uuid).await? {
            return Err(CatalogError::NotFound);
        }

        if let Some(ContentFacet::Book(book)) = &item.content {
            self.require_authors(&book.author_uuids).await?;
            self.require_genres(&book.genre_uuids).await?;
        }

        self.store.save_item(item.clone()).await?;

        info!(item_uuid = %item.uuid, "created item");

        Ok(item)
    }

    /// Applies a partial update to an existing item.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: No such item.
    /// - [`CatalogError::InvalidPrice`]: The new price was zero or negative.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn update_item(
        &self,
        uuid: ItemUuid,
        update: ItemUpdate,
    ) -> Result<Item, CatalogError> {
        let mut item = self
            .store
            .load_item(uuid)
            .await?
            .ok_or(CatalogError::NotFound)?;

        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = description;
        }
        if let Some(image_url) = update.image_url {
            item.image_url = image_url;
        }
        if let Some(language) = update.language {
            item.language = language;
        }
        if let Some(price) = update.price {
            item.price = Price::new(price)?;
        }

        self.store.save_item(item.clone()).await?;

        Ok(item)
    }

    /// Removes an item. Its reviews cascade with it; order history keeps
    /// referencing the dead uuid.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: No such item; nothing is written.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn delete_item(&self, uuid: ItemUuid) -> Result<(), CatalogError> {
        let rows_affected = self.store.delete_item(uuid).await?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(item_uuid = %uuid, "deleted item");

        Ok(())
    }

    /// Resolves the full detail view of an item.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: No such item.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn get_item(&self, uuid: ItemUuid) -> Result<ItemView, CatalogError> {
        let item = self
            .store
            .load_item(uuid)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let publisher = self
            .store
            .load_publisher(item.publisher_uuid)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let age_category = self
            .store
            .load_age_category(item.age_category_uuid)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let reviews = self.store.list_reviews_for_item(item.uuid).await?;

        let content = match &item.content {
            Some(facet) => Some(self.content_view(facet).await?),
            None => None,
        };

        Ok(ItemView {
            uuid: item.uuid,
            name: item.name,
            description: item.description,
            image_url: item.image_url,
            published_on: item.published_on,
            language: item.language,
            price: item.price,
            stock: item.stock,
            publisher_name: publisher.name,
            age_category_tag: age_category.tag,
            condition: item.condition,
            content,
            average_rating: average_rating(&reviews),
            reviews: reviews
                .into_iter()
                .map(|review| ReviewSummary {
                    uuid: review.uuid,
                    rating: review.rating.get(),
                    text: review.text,
                    created_at: to_civil(review.created_at),
                    customer_uuid: review.customer_uuid,
                })
                .collect(),
        })
    }

    /// Lists every item in the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn list_items(&self) -> Result<Vec<ItemSummary>, CatalogError> {
        self.summaries(ItemFilter::All).await
    }

    /// Lists the items of one publisher.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: No such publisher.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn list_by_publisher(
        &self,
        publisher: PublisherUuid,
    ) -> Result<Vec<ItemSummary>, CatalogError> {
        if !self.store.publisher_exists(publisher).await? {
            return Err(CatalogError::NotFound);
        }

        self.summaries(ItemFilter::ByPublisher(publisher)).await
    }

    /// Lists the items of one age category.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: No such age category.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn list_by_age_category(
        &self,
        age_category: AgeCategoryUuid,
    ) -> Result<Vec<ItemSummary>, CatalogError> {
        if !self.store.age_category_exists(age_category).await? {
            return Err(CatalogError::NotFound);
        }

        self.summaries(ItemFilter::AgeCategoryIn(vec![age_category]))
            .await
    }

    /// Lists the items appropriate for a reader of `age`: those whose age
    /// category's minimum age does not exceed it.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`]: `age` was negative.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn list_appropriate_for_age(
        &self,
        age: i16,
    ) -> Result<Vec<ItemSummary>, CatalogError> {
        if age < 0 {
            return Err(CatalogError::InvalidArgument("age must not be negative"));
        }

        let qualifying: Vec<AgeCategoryUuid> = self
            .store
            .list_age_categories()
            .await?
            .into_iter()
            .filter(|category| category.appropriate_for(age))
            .map(|category| category.uuid)
            .collect();

        self.summaries(ItemFilter::AgeCategoryIn(qualifying)).await
    }

    /// Attaches a review to an item, re-validating the rating exactly as at
    /// creation time.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidRating`]: The rating was outside 1..=5.
    /// - [`CatalogError::NotFound`]: The item or customer does not exist.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn add_review(&self, review: NewReview) -> Result<Review, CatalogError> {
        let rating = Rating::new(review.rating)?;

        if !self.store.item_exists(review.item_uuid).await? {
            return Err(CatalogError::NotFound);
        }

        if !self.store.customer_exists(review.customer_uuid).await? {
            return Err(CatalogError::NotFound);
        }

        let review = Review {
            uuid: review.uuid,
            rating,
            text: review.text,
            created_at: Timestamp::now(),
            customer_uuid: review.customer_uuid,
            item_uuid: review.item_uuid,
        };

        self.store.save_review(review.clone()).await?;

        Ok(review)
    }

    /// Stores a publisher.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_publisher(&self, publisher: Publisher) -> Result<(), CatalogError> {
        self.store.save_publisher(publisher).await?;

        Ok(())
    }

    /// Stores an age category.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`]: `minimum_age` exceeded 100.
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_age_category(&self, category: AgeCategory) -> Result<(), CatalogError> {
        if category.minimum_age > 100 {
            return Err(CatalogError::InvalidArgument(
                "minimum age must be between 0 and 100",
            ));
        }

        self.store.save_age_category(category).await?;

        Ok(())
    }

    /// Stores an author.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_author(&self, author: Author) -> Result<(), CatalogError> {
        self.store.save_author(author).await?;

        Ok(())
    }

    /// Stores a genre.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_genre(&self, genre: Genre) -> Result<(), CatalogError> {
        self.store.save_genre(genre).await?;

        Ok(())
    }

    /// Stores a customer.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Store`]: The persistence collaborator failed.
    pub async fn create_customer(&self, customer: Customer) -> Result<(), CatalogError> {
        self.store.save_customer(customer).await?;

        Ok(())
    }

    async fn summaries(&self, filter: ItemFilter) -> Result<Vec<ItemSummary>, CatalogError> {
        let items = self.store.scan_items(filter).await?;

        let mut summaries = Vec::with_capacity(items.len());

        for item in items {
            summaries.push(self.summary(item).await?);
        }

        Ok(summaries)
    }

    async fn summary(&self, item: Item) -> Result<ItemSummary, CatalogError> {
        let publisher = self
            .store
            .load_publisher(item.publisher_uuid)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let reviews = self.store.list_reviews_for_item(item.uuid).await?;

        let (authors, genres) = match &item.content {
            Some(ContentFacet::Book(book)) => (
                self.author_names(&book.author_uuids).await?,
                self.genre_names(&book.genre_uuids).await?,
            ),
            _ => (Vec::new(), Vec::new()),
        };

        Ok(ItemSummary {
            uuid: item.uuid,
            name: item.name,
            image_url: item.image_url,
            price: item.price,
            publisher_name: publisher.name,
            average_rating: average_rating(&reviews),
            authors,
            genres,
        })
    }

    async fn content_view(&self, facet: &ContentFacet) -> Result<ContentView, CatalogError> {
        Ok(match facet {
            ContentFacet::Book(book) => ContentView::Book {
                pages: book.pages,
                cover: book.cover,
                authors: self.author_names(&book.author_uuids).await?,
                genres: self.genre_names(&book.genre_uuids).await?,
            },
            ContentFacet::Magazine { is_special_edition } => ContentView::Magazine {
                is_special_edition: *is_special_edition,
            },
            ContentFacet::Newspaper(paper) => ContentView::Newspaper {
                headline: paper.headline.clone(),
                topics: paper.topics.clone(),
            },
        })
    }

    async fn author_names(&self, uuids: &[AuthorUuid]) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .store
            .load_authors(uuids)
            .await?
            .iter()
            .map(Author::display_name)
            .collect())
    }

    async fn genre_names(&self, uuids: &[GenreUuid]) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .store
            .load_genres(uuids)
            .await?
            .into_iter()
            .map(|genre| genre.name)
            .collect())
    }

    async fn require_authors(&self, uuids: &[AuthorUuid]) -> Result<(), CatalogError> {
        let found = self.store.load_authors(uuids).await?;

        for uuid in uuids {
            if !found.iter().any(|author| author.uuid == *uuid) {
                return Err(CatalogError::NotFound);
            }
        }

        Ok(())
    }

    async fn require_genres(&self, uuids: &[GenreUuid]) -> Result<(), CatalogError> {
        let found = self.store.load_genres(uuids).await?;

        for uuid in uuids {
            if !found.iter().any(|genre| genre.uuid == *uuid) {
                return Err(CatalogError::NotFound);
            }
        }

        Ok(())
    }
}
