//! Catalog Models

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::catalog::errors::CatalogError, prices::Price, uuids::TypedUuid};

/// Item UUID
pub type ItemUuid = TypedUuid<Item>;

/// Publisher UUID
pub type PublisherUuid = TypedUuid<Publisher>;

/// Age Category UUID
pub type AgeCategoryUuid = TypedUuid<AgeCategory>;

/// Author UUID
pub type AuthorUuid = TypedUuid<Author>;

/// Genre UUID
pub type GenreUuid = TypedUuid<Genre>;

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// Newspaper topics must contain between one and this many entries.
pub const MAX_NEWSPAPER_TOPICS: usize = 10;

/// Physical grade of a used item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsedGrade {
    Mint,
    Good,
    Fair,
    Poor,
}

impl UsedGrade {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "Mint",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Condition classification of an item, without the facet payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    New,
    Used,
}

/// The condition facet of an item.
///
/// Every item is exactly one of these; representing the axis as an enum makes
/// a zero-condition or double-condition item unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition")]
pub enum ConditionFacet {
    New {
        is_sealed: bool,
    },
    Used {
        grade: UsedGrade,
        has_annotations: bool,
    },
}

impl ConditionFacet {
    /// Returns the condition classification of this facet.
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        match self {
            Self::New { .. } => ConditionKind::New,
            Self::Used { .. } => ConditionKind::Used,
        }
    }
}

/// Book cover binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverKind {
    Hard,
    Soft,
    SpiralBound,
}

/// Book-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFacet {
    pub pages: u32,
    pub cover: CoverKind,
    pub author_uuids: Vec<AuthorUuid>,
    pub genre_uuids: Vec<GenreUuid>,
}

/// Newspaper-specific attributes.
///
/// Topics are an ordered list with 1..=[`MAX_NEWSPAPER_TOPICS`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewspaperFacet {
    pub headline: String,
    pub topics: Vec<String>,
}

/// Content classification of an item, without the facet payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Book,
    Magazine,
    Newspaper,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Magazine => "Magazine",
            Self::Newspaper => "Newspaper",
        }
    }
}

/// The optional content facet of an item.
///
/// At most one facet applies; an item carrying none is valid and "typeless".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFacet {
    Book(BookFacet),
    Magazine { is_special_edition: bool },
    Newspaper(NewspaperFacet),
}

impl ContentFacet {
    /// Returns the content classification of this facet.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Book(_) => ContentKind::Book,
            Self::Magazine { .. } => ContentKind::Magazine,
            Self::Newspaper(_) => ContentKind::Newspaper,
        }
    }
}

/// Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub uuid: ItemUuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub published_on: Date,
    pub language: String,
    pub price: Price,
    pub stock: u32,
    pub publisher_uuid: PublisherUuid,
    pub age_category_uuid: AgeCategoryUuid,
    pub condition: ConditionFacet,
    pub content: Option<ContentFacet>,
}

/// New Item Model
#[derive(Debug, Clone)]
pub struct NewItem {
    pub uuid: ItemUuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub published_on: Date,
    pub language: String,
    pub price: Decimal,
    pub stock: u32,
    pub publisher_uuid: PublisherUuid,
    pub age_category_uuid: AgeCategoryUuid,
    pub condition: ConditionFacet,
    pub content: Option<ContentFacet>,
}

/// Item Update Model
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub language: Option<String>,
    pub price: Option<Decimal>,
}

impl Item {
    /// Validates a [`NewItem`] into an [`Item`].
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidPrice`]: The price was zero or negative.
    /// - [`CatalogError::InvalidArgument`]: A book had zero pages, or a
    ///   newspaper's topic list was empty or longer than
    ///   [`MAX_NEWSPAPER_TOPICS`].
    pub fn new(item: NewItem) -> Result<Self, CatalogError> {
        let price = Price::new(item.price)?;

        match &item.content {
            Some(ContentFacet::Book(book)) if book.pages == 0 => {
                return Err(CatalogError::InvalidArgument("book pages must be positive"));
            }
            Some(ContentFacet::Newspaper(paper))
                if paper.topics.is_empty() || paper.topics.len() > MAX_NEWSPAPER_TOPICS =>
            {
                return Err(CatalogError::InvalidArgument(
                    "newspaper topics must contain between 1 and 10 entries",
                ));
            }
            _ => {}
        }

        Ok(Self {
            uuid: item.uuid,
            name: item.name,
            description: item.description,
            image_url: item.image_url,
            published_on: item.published_on,
            language: item.language,
            price,
            stock: item.stock,
            publisher_uuid: item.publisher_uuid,
            age_category_uuid: item.age_category_uuid,
            condition: item.condition,
            content: item.content,
        })
    }

    /// Returns the content classification, or `None` for a typeless item.
    #[must_use]
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.content.as_ref().map(ContentFacet::kind)
    }

    /// Returns the condition classification.
    #[must_use]
    pub const fn condition_kind(&self) -> ConditionKind {
        self.condition.kind()
    }
}

/// Age Category Model
///
/// `minimum_age` monotonically gates visibility: an item is appropriate for
/// age `a` iff its category's `minimum_age <= a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeCategory {
    pub uuid: AgeCategoryUuid,
    pub tag: String,
    pub description: String,
    pub minimum_age: u8,
}

impl AgeCategory {
    /// Returns true if items in this category are appropriate for `age`.
    #[must_use]
    pub fn appropriate_for(&self, age: i16) -> bool {
        i16::from(self.minimum_age) <= age
    }
}

/// Author Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub uuid: AuthorUuid,
    pub name: String,
    pub surname: String,
    pub born_on: Date,
    pub pseudonym: Option<String>,
}

impl Author {
    /// Display name: the pseudonym when one exists, else "name surname".
    #[must_use]
    pub fn display_name(&self) -> String {
        self.pseudonym
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.name, self.surname))
    }
}

/// Genre Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub uuid: GenreUuid,
    pub name: String,
    pub description: String,
}

/// Publisher Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    pub uuid: PublisherUuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// Customer Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: String,
}

/// Errors that can occur while constructing a [`Rating`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    /// The value fell outside the 1..=5 range.
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

/// A review rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Creates a new rating.
    ///
    /// # Errors
    ///
    /// - [`RatingError::OutOfRange`]: The value was not within 1..=5.
    pub const fn new(value: u8) -> Result<Self, RatingError> {
        if value < 1 || value > 5 {
            return Err(RatingError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    /// Returns the rating value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Review Model
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub rating: Rating,
    pub text: String,
    pub created_at: Timestamp,
    pub customer_uuid: CustomerUuid,
    pub item_uuid: ItemUuid,
}

/// New Review Model
///
/// The raw rating is validated into a [`Rating`] by the service, identically
/// for creation and any later edit.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub rating: u8,
    pub text: String,
    pub customer_uuid: CustomerUuid,
    pub item_uuid: ItemUuid,
}
