//! Product and review domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use velour_core::{ProductId, Rating, ReviewId, UserId};

/// A catalog product.
///
/// `rating` and `num_reviews` are derived from the product's reviews and are
/// recomputed in the same transaction that inserts a review, so the
/// invariants `num_reviews == reviews.len()` and `rating == avg(ratings)`
/// hold on every committed row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Admin user that created the product.
    pub user_id: UserId,
    /// Product name, matched case-insensitively by catalog search.
    pub name: String,
    /// Image path under `/uploads`.
    pub image: String,
    /// Brand name.
    pub brand: String,
    /// Category name.
    pub category: String,
    /// Long-form description.
    pub description: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Units in stock, non-negative.
    pub count_in_stock: i32,
    /// Average of all review ratings, 0 when unreviewed.
    pub rating: Decimal,
    /// Number of reviews.
    pub num_reviews: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Compute the derived review aggregates for a set of ratings.
    ///
    /// Returns `(rating, num_reviews)` where `rating` is the exact
    /// arithmetic mean of the inputs (0 when there are none). Callers must
    /// write both values together with the review rows they were computed
    /// from, in one transaction.
    #[must_use]
    pub fn review_aggregate(ratings: &[i16]) -> (Decimal, i32) {
        let count = i32::try_from(ratings.len()).unwrap_or(i32::MAX);
        if ratings.is_empty() {
            return (Decimal::ZERO, 0);
        }
        let sum: Decimal = ratings.iter().map(|r| Decimal::from(*r)).sum();
        (sum / Decimal::from(count), count)
    }
}

/// A review left by a user on a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// The reviewed product.
    pub product_id: ProductId,
    /// The authoring user.
    pub user_id: UserId,
    /// Author display name, snapshotted at review time.
    pub author_name: String,
    /// Star rating, 1-5.
    pub rating: Rating,
    /// Free-form comment.
    pub comment: String,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

/// A product together with its reviews (detail endpoint).
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    /// The product fields, flattened into the top-level object.
    #[serde(flatten)]
    pub product: Product,
    /// All reviews, oldest first.
    pub reviews: Vec<Review>,
}

/// One page of catalog results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// The products on this page.
    pub products: Vec<Product>,
    /// The 1-based page number.
    pub page: u32,
    /// Total number of pages for the current filter.
    pub pages: u32,
    /// Total matching products across all pages.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_review_aggregate_empty() {
        assert_eq!(Product::review_aggregate(&[]), (Decimal::ZERO, 0));
    }

    #[test]
    fn test_review_aggregate_single() {
        assert_eq!(Product::review_aggregate(&[4]), (dec!(4), 1));
    }

    #[test]
    fn test_review_aggregate_is_arithmetic_mean() {
        let (rating, count) = Product::review_aggregate(&[5, 4, 3]);
        assert_eq!(count, 3);
        assert_eq!(rating, dec!(4));

        let (rating, count) = Product::review_aggregate(&[5, 4]);
        assert_eq!(count, 2);
        assert_eq!(rating, dec!(4.5));
    }

    #[test]
    fn test_review_aggregate_non_terminating_mean() {
        // 1 + 2 + 2 = 5, 5/3 keeps full decimal precision
        let (rating, count) = Product::review_aggregate(&[1, 2, 2]);
        assert_eq!(count, 3);
        assert_eq!(rating, Decimal::from(5) / Decimal::from(3));
    }
}
