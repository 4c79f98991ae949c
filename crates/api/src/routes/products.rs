//! Product and review route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use velour_core::{ProductId, Rating};

use crate::db::products::ProductUpdate;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Product, ProductDetail, ProductPage, Review};
use crate::services::CatalogService;
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Case-insensitive name filter.
    pub keyword: Option<String>,
    /// 1-based page number.
    pub page_number: Option<u32>,
}

/// Admin product edit payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEditRequest {
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub count_in_stock: i32,
}

impl From<ProductEditRequest> for ProductUpdate {
    fn from(body: ProductEditRequest) -> Self {
        Self {
            name: body.name,
            image: body.image,
            brand: body.brand,
            category: body.category,
            description: body.description,
            price: body.price,
            count_in_stock: body.count_in_stock,
        }
    }
}

/// Review submission payload. Out-of-range ratings are rejected during
/// deserialization by the [`Rating`] type.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: Rating,
    pub comment: String,
}

/// `GET /api/products?keyword=&pageNumber=` - Paged catalog listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ProductPage>> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let page = catalog
        .list_products(query.keyword.as_deref(), query.page_number.unwrap_or(1))
        .await?;

    Ok(Json(page))
}

/// `GET /api/products/top` - Highest-rated products.
#[instrument(skip(state))]
pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let products = catalog.top_products().await?;

    Ok(Json(products))
}

/// `GET /api/products/{id}` - Product detail with reviews.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetail>> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let detail = catalog.get_product(ProductId::new(id)).await?;

    Ok(Json(detail))
}

/// `POST /api/products` - Create a placeholder product (admin).
#[instrument(skip(state, admin))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<(StatusCode, Json<Product>)> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let product = catalog.create_product(&admin).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - Update a product (admin).
#[instrument(skip(state, _admin, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<ProductEditRequest>,
) -> Result<Json<Product>> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let product = catalog
        .update_product(ProductId::new(id), &body.into())
        .await?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` - Delete a product (admin).
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    catalog.delete_product(ProductId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/products/{id}/reviews` - Review a product (one per user).
#[instrument(skip(state, user, body))]
pub async fn add_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    let catalog = CatalogService::new(state.pool(), state.config().page_size);
    let review = catalog
        .add_review(ProductId::new(id), &user, body.rating, &body.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}
