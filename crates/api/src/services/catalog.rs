//! Catalog service.
//!
//! Keyword search with pagination over products, plus the review aggregate
//! operation that keeps `rating`/`num_reviews` consistent with the review
//! rows.

use sqlx::PgPool;
use thiserror::Error;

use velour_core::{ProductId, Rating, UserId};

use crate::db::RepositoryError;
use crate::db::products::{ProductRepository, ProductUpdate};
use crate::models::{Product, ProductDetail, ProductPage, Review, User};

/// How many products the top-rated listing returns.
const TOP_PRODUCTS_LIMIT: i64 = 3;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request payload is malformed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The product doesn't exist.
    #[error("product not found")]
    ProductNotFound,

    /// The user already reviewed this product.
    #[error("product already reviewed")]
    DuplicateReview,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Service for catalog queries and mutations.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    page_size: u32,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, page_size: u32) -> Self {
        Self {
            products: ProductRepository::new(pool),
            page_size,
        }
    }

    /// Fetch one page of products, optionally filtered by a case-insensitive
    /// name keyword.
    ///
    /// A filter matching nothing yields an empty page with `pages == 0`,
    /// never an error. A page past the end likewise yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if a query fails.
    pub async fn list_products(
        &self,
        keyword: Option<&str>,
        page: u32,
    ) -> Result<ProductPage, CatalogError> {
        let page = page.max(1);
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let offset = i64::from(page - 1) * i64::from(self.page_size);

        let (products, total) = self
            .products
            .list(keyword, i64::from(self.page_size), offset)
            .await?;

        Ok(ProductPage {
            products,
            page,
            pages: page_count(total, self.page_size),
            total,
        })
    }

    /// Get a product with its reviews.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product doesn't exist.
    pub async fn get_product(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let product = self
            .products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        let reviews = self.products.reviews(id).await?;

        Ok(ProductDetail { product, reviews })
    }

    /// The highest-rated products (home page carousel).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn top_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.top(TOP_PRODUCTS_LIMIT).await?)
    }

    /// Create a placeholder product owned by an admin, to be filled in via
    /// the edit form.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the insert fails.
    pub async fn create_product(&self, admin: &User) -> Result<Product, CatalogError> {
        let placeholder = ProductUpdate {
            name: "Sample name".to_owned(),
            image: "/uploads/sample.jpg".to_owned(),
            brand: "Sample brand".to_owned(),
            category: "Sample category".to_owned(),
            description: "Sample description".to_owned(),
            price: rust_decimal::Decimal::ZERO,
            count_in_stock: 0,
        };

        Ok(self.products.create(admin.id, &placeholder).await?)
    }

    /// Apply a full update to a product (admin edit form).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a negative price or stock
    /// count or a blank name. Returns `CatalogError::ProductNotFound` if
    /// the product doesn't exist.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, CatalogError> {
        if update.name.trim().is_empty() {
            return Err(CatalogError::Validation("name is required".to_owned()));
        }
        if update.price.is_sign_negative() {
            return Err(CatalogError::Validation(
                "price must not be negative".to_owned(),
            ));
        }
        if update.count_in_stock < 0 {
            return Err(CatalogError::Validation(
                "stock count must not be negative".to_owned(),
            ));
        }

        self.products.update(id, update).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::ProductNotFound,
            other => CatalogError::Repository(other),
        })
    }

    /// Delete a product and its reviews.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound)
        }
    }

    /// Append a review by `user` and recompute the product's aggregates.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a blank comment,
    /// `CatalogError::ProductNotFound` if the product doesn't exist, and
    /// `CatalogError::DuplicateReview` if this user already reviewed it (the
    /// product's review count is unchanged in that case).
    pub async fn add_review(
        &self,
        product_id: ProductId,
        user: &User,
        rating: Rating,
        comment: &str,
    ) -> Result<Review, CatalogError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(CatalogError::Validation("comment is required".to_owned()));
        }

        self.products
            .add_review(product_id, user.id, &user.name, rating, comment)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::ProductNotFound,
                RepositoryError::Conflict(_) => CatalogError::DuplicateReview,
                other => CatalogError::Repository(other),
            })
    }
}

/// Number of pages needed for `total` rows at `page_size` rows per page.
const fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(page_size as u64);
    if pages > u32::MAX as u64 {
        return u32::MAX;
    }
    #[allow(clippy::cast_possible_truncation)] // bounded by the check above
    let pages = pages as u32;
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_exact_division() {
        assert_eq!(page_count(16, 8), 2);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(17, 8), 3);
        assert_eq!(page_count(1, 8), 1);
    }

    #[test]
    fn test_page_count_zero_matches() {
        assert_eq!(page_count(0, 8), 0);
    }
}
