//! Catalog read-side views.
//!
//! These are the shapes handed to the transport layer. Timestamps are
//! rendered as civil datetimes (`yyyy-MM-ddTHH:mm:ss`, no offset) and prices
//! as two-decimal fixed point, preserving the textual contract existing
//! clients rely on.

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use serde::Serialize;

use crate::{
    domain::catalog::models::{
        ConditionFacet, CoverKind, CustomerUuid, ItemUuid, ReviewUuid,
    },
    prices::Price,
};

/// Renders a stored instant in the legacy wire shape: whole seconds, no
/// offset.
pub(crate) fn to_civil(timestamp: Timestamp) -> DateTime {
    let datetime = timestamp.to_zoned(TimeZone::UTC).datetime();

    datetime
        .with()
        .subsec_nanosecond(0)
        .build()
        .unwrap_or(datetime)
}

/// Content facet of an item with author and genre references resolved to
/// display names.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum ContentView {
    Book {
        pages: u32,
        cover: CoverKind,
        authors: Vec<String>,
        genres: Vec<String>,
    },
    Magazine {
        is_special_edition: bool,
    },
    Newspaper {
        headline: String,
        topics: Vec<String>,
    },
}

/// A single review as shown on an item page.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub uuid: ReviewUuid,
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime,
    pub customer_uuid: CustomerUuid,
}

/// Full item detail view.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub uuid: ItemUuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub published_on: Date,
    pub language: String,
    pub price: Price,
    pub stock: u32,
    pub publisher_name: String,
    pub age_category_tag: String,
    #[serde(flatten)]
    pub condition: ConditionFacet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentView>,
    pub average_rating: f64,
    pub reviews: Vec<ReviewSummary>,
}

/// Compact item listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub uuid: ItemUuid,
    pub name: String,
    pub image_url: String,
    pub price: Price,
    pub publisher_name: String,
    pub average_rating: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}
