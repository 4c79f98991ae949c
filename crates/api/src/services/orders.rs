//! Order/checkout service.
//!
//! Converts a client-submitted cart payload into a persisted order with
//! correct totals, and drives the order through its one-way state machine:
//! created, then paid, then delivered.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use velour_core::{OrderId, ProductId, ShippingAddress, UserId};

use super::pricing;
use crate::db::RepositoryError;
use crate::db::orders::{OrderItemSnapshot, OrderRepository};
use crate::db::products::ProductRepository;
use crate::models::{Order, OrderSummary, PaymentResult};

/// Upper bound on a single line's quantity; a larger value is a malformed
/// payload, not a plausible cart.
const MAX_LINE_QUANTITY: i32 = 99;

/// One line of a checkout payload: the product and how many of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    /// The referenced product.
    pub product_id: ProductId,
    /// Requested quantity.
    pub quantity: i32,
}

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart payload is malformed (empty, bad quantity, missing fields).
    #[error("invalid order: {0}")]
    Validation(String),

    /// A referenced product no longer exists.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The order doesn't exist.
    #[error("order not found")]
    OrderNotFound,

    /// Payment was already confirmed for this order.
    #[error("order is already paid")]
    AlreadyPaid,

    /// Delivery requires payment first.
    #[error("order is not paid yet")]
    NotPaidYet,

    /// Delivery was already confirmed for this order.
    #[error("order is already delivered")]
    AlreadyDelivered,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Service for checkout and order lifecycle operations.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Create an order from a cart payload.
    ///
    /// Each line's product is snapshotted (name, price, image) so the order
    /// is immune to later catalog changes, then the deterministic pricing
    /// rules produce the totals and everything is persisted in one
    /// transaction with `is_paid = false, is_delivered = false`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty cart, a quantity
    /// outside `1..=99`, a duplicated product line, an incomplete shipping
    /// address, or a blank payment method. Returns
    /// `OrderError::ProductNotFound` if any referenced product is absent.
    pub async fn create_order(
        &self,
        user_id: UserId,
        lines: &[OrderLineInput],
        shipping_address: &ShippingAddress,
        payment_method: &str,
    ) -> Result<Order, OrderError> {
        validate_cart(lines, shipping_address, payment_method)?;

        let ids: Vec<ProductId> = lines.iter().map(|line| line.product_id).collect();
        let products = self.products.get_many(&ids).await?;

        let mut snapshots = Vec::with_capacity(lines.len());
        for line in lines {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(OrderError::ProductNotFound(line.product_id))?;

            snapshots.push(OrderItemSnapshot {
                product_id: product.id,
                name: product.name.clone(),
                image: product.image.clone(),
                price: product.price,
                quantity: line.quantity,
            });
        }

        let totals = pricing::totals(&snapshots);

        let order = self
            .orders
            .create(user_id, &snapshots, shipping_address, payment_method, totals)
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total_price,
            "order created"
        );

        Ok(order)
    }

    /// Get an order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if the order doesn't exist.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::OrderNotFound)
    }

    /// Confirm payment for an order.
    ///
    /// Rejects re-confirmation: a second call on a paid order fails with
    /// `AlreadyPaid` and leaves `paid_at` untouched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` or `OrderError::AlreadyPaid`.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment: &PaymentResult,
    ) -> Result<Order, OrderError> {
        let order = self.orders.mark_paid(id, payment).await.map_err(|e| match e {
            RepositoryError::NotFound => OrderError::OrderNotFound,
            RepositoryError::Conflict(_) => OrderError::AlreadyPaid,
            other => OrderError::Repository(other),
        })?;

        tracing::info!(order_id = %order.id, payment_id = %payment.id, "order paid");

        Ok(order)
    }

    /// Confirm delivery for an order. The order must already be paid.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound`, `OrderError::NotPaidYet`, or
    /// `OrderError::AlreadyDelivered`.
    pub async fn mark_delivered(&self, id: OrderId) -> Result<Order, OrderError> {
        let order = self.orders.mark_delivered(id).await.map_err(|e| match e {
            RepositoryError::NotFound => OrderError::OrderNotFound,
            RepositoryError::FailedPrecondition(_) => OrderError::NotPaidYet,
            RepositoryError::Conflict(_) => OrderError::AlreadyDelivered,
            other => OrderError::Repository(other),
        })?;

        tracing::info!(order_id = %order.id, "order delivered");

        Ok(order)
    }

    /// Orders placed by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_orders_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSummary>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// All orders, newest first (admin).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all_orders(&self) -> Result<Vec<OrderSummary>, OrderError> {
        Ok(self.orders.list_all().await?)
    }
}

/// Validate a checkout payload before touching the database.
fn validate_cart(
    lines: &[OrderLineInput],
    shipping_address: &ShippingAddress,
    payment_method: &str,
) -> Result<(), OrderError> {
    if lines.is_empty() {
        return Err(OrderError::Validation("no order items".to_owned()));
    }

    for line in lines {
        if line.quantity < 1 {
            return Err(OrderError::Validation(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(OrderError::Validation(format!(
                "quantity for product {} exceeds {MAX_LINE_QUANTITY}",
                line.product_id
            )));
        }
    }

    let mut seen: Vec<ProductId> = Vec::with_capacity(lines.len());
    for line in lines {
        if seen.contains(&line.product_id) {
            return Err(OrderError::Validation(format!(
                "product {} appears more than once",
                line.product_id
            )));
        }
        seen.push(line.product_id);
    }

    if !shipping_address.is_complete() {
        return Err(OrderError::Validation(
            "shipping address is incomplete".to_owned(),
        ));
    }

    if payment_method.trim().is_empty() {
        return Err(OrderError::Validation(
            "payment method is required".to_owned(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            address: "12 Mulberry Lane".to_owned(),
            city: "Portland".to_owned(),
            postal_code: "97201".to_owned(),
            country: "USA".to_owned(),
        }
    }

    fn line(id: i32, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_cart() {
        let lines = [line(1, 2), line(2, 1)];
        assert!(validate_cart(&lines, &address(), "PayPal").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        assert!(matches!(
            validate_cart(&[], &address(), "PayPal"),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_quantity() {
        assert!(matches!(
            validate_cart(&[line(1, 0)], &address(), "PayPal"),
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            validate_cart(&[line(1, -3)], &address(), "PayPal"),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_excessive_quantity() {
        assert!(matches!(
            validate_cart(&[line(1, 100)], &address(), "PayPal"),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_product_lines() {
        assert!(matches!(
            validate_cart(&[line(1, 2), line(1, 1)], &address(), "PayPal"),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_incomplete_address() {
        let mut incomplete = address();
        incomplete.postal_code = String::new();
        assert!(matches!(
            validate_cart(&[line(1, 1)], &incomplete, "PayPal"),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_payment_method() {
        assert!(matches!(
            validate_cart(&[line(1, 1)], &address(), "  "),
            Err(OrderError::Validation(_))
        ));
    }
}
