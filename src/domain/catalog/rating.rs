//! Rating aggregation.

use crate::domain::catalog::models::Review;

/// Returns the arithmetic mean of the ratings attached to an item, or `0.0`
/// when it has no reviews.
///
/// No rounding is applied here; rendering precision belongs to the
/// presentation layer.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }

    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.get())).sum();

    f64::from(sum) / reviews.len() as f64
}
