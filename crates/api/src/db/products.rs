//! Product repository for database operations.
//!
//! Review insertion and the derived `rating`/`num_reviews` columns are
//! updated in a single transaction so the aggregates on a committed product
//! row always match its reviews.

use sqlx::PgPool;

use velour_core::{ProductId, Rating, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{Product, Review};

const PRODUCT_COLUMNS: &str = "id, user_id, name, image, brand, category, description, \
     price, count_in_stock, rating, num_reviews, created_at, updated_at";

const REVIEW_COLUMNS: &str = "id, product_id, user_id, author_name, rating, comment, created_at";

/// Fields applied by a full product update (admin edit form).
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: rust_decimal::Decimal,
    pub count_in_stock: i32,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page of products, optionally filtered by a case-insensitive
    /// name substring. Returns the page and the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        keyword: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let pattern = keyword.map(like_pattern);

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok((products, u64::try_from(total).unwrap_or(0)))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Fetch the products referenced by an order payload, in one round trip.
    ///
    /// Missing IDs are simply absent from the result; the caller decides
    /// whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// The highest-rated products (home page carousel).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rating DESC, id ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Insert a new product row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products
                 (user_id, name, image, brand, category, description, price, count_in_stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&update.name)
        .bind(&update.image)
        .bind(&update.brand)
        .bind(&update.category)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.count_in_stock)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a full update to a product (admin edit form).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products
             SET name = $2, image = $3, brand = $4, category = $5, description = $6,
                 price = $7, count_in_stock = $8, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.image)
        .bind(&update.brand)
        .bind(&update.category)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.count_in_stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Delete a product by ID. Its reviews are removed by cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All reviews for a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at ASC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Append a review and recompute the product's aggregates, atomically.
    ///
    /// The insert and the aggregate update share one transaction, so a
    /// concurrent reader never observes a product whose `rating` or
    /// `num_reviews` disagrees with its review rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if this user already reviewed the
    /// product. Returns `RepositoryError::NotFound` if the product doesn't
    /// exist. Returns `RepositoryError::Database` for other database errors.
    pub async fn add_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        author_name: &str,
        rating: Rating,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (product_id, user_id, author_name, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(product_id)
        .bind(user_id)
        .bind(author_name)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            conflict_on_unique(e, "product already reviewed")
        })?;

        let ratings: Vec<i16> =
            sqlx::query_scalar("SELECT rating FROM reviews WHERE product_id = $1")
                .bind(product_id)
                .fetch_all(&mut *tx)
                .await?;

        let (rating_avg, num_reviews) = Product::review_aggregate(&ratings);

        let updated = sqlx::query(
            "UPDATE products SET rating = $2, num_reviews = $3, updated_at = now() WHERE id = $1",
        )
        .bind(product_id)
        .bind(rating_avg)
        .bind(num_reviews)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(review)
    }
}

/// Build an ILIKE pattern from a raw keyword, escaping LIKE metacharacters.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_keyword() {
        assert_eq!(like_pattern("shirt"), "%shirt%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
