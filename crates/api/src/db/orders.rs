//! Order repository for database operations.
//!
//! Order creation writes the order row and its line items in one
//! transaction. The payment and delivery flips are single conditional
//! UPDATEs, so two concurrent confirmations of the same order serialize in
//! the database and exactly one of them wins.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use velour_core::{OrderId, ProductId, ShippingAddress, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderSummary, PaymentResult};

const ORDER_COLUMNS: &str = "id, user_id, ship_address, ship_city, ship_postal_code, \
     ship_country, payment_method, items_price, shipping_price, tax_price, total_price, \
     is_paid, paid_at, is_delivered, delivered_at, \
     payment_id, payment_status, payment_update_time, payment_email, created_at";

const ITEM_COLUMNS: &str = "id, product_id, name, image, price, quantity";

const SUMMARY_COLUMNS: &str = "o.id, o.user_id, u.name AS user_name, o.total_price, \
     o.is_paid, o.paid_at, o.is_delivered, o.delivered_at, o.created_at";

/// A product snapshot prepared by the order service, ready to be written as
/// a line item.
#[derive(Debug, Clone)]
pub struct OrderItemSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// The computed totals for a new order.
#[derive(Debug, Clone, Copy)]
pub struct OrderTotals {
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create(
        &self,
        user_id: UserId,
        items: &[OrderItemSnapshot],
        shipping_address: &ShippingAddress,
        payment_method: &str,
        totals: OrderTotals,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (user_id, ship_address, ship_city, ship_postal_code, ship_country,
                  payment_method, items_price, shipping_price, tax_price, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&shipping_address.address)
        .bind(&shipping_address.city)
        .bind(&shipping_address.postal_code)
        .bind(&shipping_address.country)
        .bind(payment_method)
        .bind(totals.items_price)
        .bind(totals.shipping_price)
        .bind(totals.tax_price)
        .bind(totals.total_price)
        .fetch_one(&mut *tx)
        .await?;

        let mut persisted_items = Vec::with_capacity(items.len());
        for item in items {
            let persisted = sqlx::query_as::<_, OrderItem>(&format!(
                "INSERT INTO order_items (order_id, product_id, name, image, price, quantity)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order_row.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(&item.image)
            .bind(item.price)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;
            persisted_items.push(persisted);
        }

        tx.commit().await?;

        Ok(order_row.into_order(persisted_items))
    }

    /// Get an order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;
        Ok(Some(row.into_order(items)))
    }

    /// Orders placed by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, OrderSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM orders o JOIN users u ON u.id = o.user_id
             WHERE o.user_id = $1
             ORDER BY o.created_at DESC, o.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// All orders, newest first (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderSummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, OrderSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM orders o JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC, o.id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// Flip an order to paid and store the provider's payment result.
    ///
    /// The UPDATE is conditional on `is_paid = FALSE`; when two payment
    /// confirmations race, the database serializes them and the loser falls
    /// through to the conflict path below without touching `paid_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Conflict` if the order is already paid.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment: &PaymentResult,
    ) -> Result<Order, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET is_paid = TRUE, paid_at = now(),
                 payment_id = $2, payment_status = $3,
                 payment_update_time = $4, payment_email = $5
             WHERE id = $1 AND is_paid = FALSE",
        )
        .bind(id)
        .bind(&payment.id)
        .bind(&payment.status)
        .bind(&payment.update_time)
        .bind(&payment.email_address)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.flags(id).await? {
                None => Err(RepositoryError::NotFound),
                Some(_) => Err(RepositoryError::Conflict("order already paid".to_owned())),
            };
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Flip an order to delivered. Requires the order to be paid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::FailedPrecondition` if it isn't paid yet.
    /// Returns `RepositoryError::Conflict` if it's already delivered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_delivered(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET is_delivered = TRUE, delivered_at = now()
             WHERE id = $1 AND is_paid = TRUE AND is_delivered = FALSE",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.flags(id).await? {
                None => Err(RepositoryError::NotFound),
                Some((false, _)) => Err(RepositoryError::FailedPrecondition(
                    "order is not paid yet".to_owned(),
                )),
                Some((true, _)) => Err(RepositoryError::Conflict(
                    "order already delivered".to_owned(),
                )),
            };
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Fetch `(is_paid, is_delivered)` for an order, if it exists.
    async fn flags(&self, id: OrderId) -> Result<Option<(bool, bool)>, RepositoryError> {
        let row = sqlx::query("SELECT is_paid, is_delivered FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| (r.get("is_paid"), r.get("is_delivered"))))
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Flat order row, assembled into [`Order`] once the items are loaded.
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    ship_address: String,
    ship_city: String,
    ship_postal_code: String,
    ship_country: String,
    payment_method: String,
    items_price: Decimal,
    shipping_price: Decimal,
    tax_price: Decimal,
    total_price: Decimal,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
    payment_id: Option<String>,
    payment_status: Option<String>,
    payment_update_time: Option<String>,
    payment_email: Option<String>,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            ship_address: row.try_get("ship_address")?,
            ship_city: row.try_get("ship_city")?,
            ship_postal_code: row.try_get("ship_postal_code")?,
            ship_country: row.try_get("ship_country")?,
            payment_method: row.try_get("payment_method")?,
            items_price: row.try_get("items_price")?,
            shipping_price: row.try_get("shipping_price")?,
            tax_price: row.try_get("tax_price")?,
            total_price: row.try_get("total_price")?,
            is_paid: row.try_get("is_paid")?,
            paid_at: row.try_get("paid_at")?,
            is_delivered: row.try_get("is_delivered")?,
            delivered_at: row.try_get("delivered_at")?,
            payment_id: row.try_get("payment_id")?,
            payment_status: row.try_get("payment_status")?,
            payment_update_time: row.try_get("payment_update_time")?,
            payment_email: row.try_get("payment_email")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        // The payment columns are written together by mark_paid; a row with
        // only some of them set would be corrupt, so presence of the id is
        // the deciding field.
        let payment_result = self.payment_id.map(|payment_id| PaymentResult {
            id: payment_id,
            status: self.payment_status.unwrap_or_default(),
            update_time: self.payment_update_time.unwrap_or_default(),
            email_address: self.payment_email.unwrap_or_default(),
        });

        Order {
            id: self.id,
            user_id: self.user_id,
            items,
            shipping_address: ShippingAddress {
                address: self.ship_address,
                city: self.ship_city,
                postal_code: self.ship_postal_code,
                country: self.ship_country,
            },
            payment_method: self.payment_method,
            items_price: self.items_price,
            shipping_price: self.shipping_price,
            tax_price: self.tax_price,
            total_price: self.total_price,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            is_delivered: self.is_delivered,
            delivered_at: self.delivered_at,
            payment_result,
            created_at: self.created_at,
        }
    }
}
