//! Order domain types.
//!
//! Orders snapshot the product fields they reference at creation time, so a
//! later price or name change never rewrites history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{OrderId, OrderItemId, ProductId, ShippingAddress, UserId};

/// A persisted order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The user that placed the order.
    pub user_id: UserId,
    /// Snapshotted line items.
    pub items: Vec<OrderItem>,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Chosen payment method (e.g. "PayPal").
    pub payment_method: String,
    /// Sum of `price * quantity` across items.
    pub items_price: Decimal,
    /// Deterministic shipping fee.
    pub shipping_price: Decimal,
    /// Deterministic tax amount.
    pub tax_price: Decimal,
    /// `items_price + shipping_price + tax_price`.
    pub total_price: Decimal,
    /// Set exactly once by payment confirmation.
    pub is_paid: bool,
    /// When payment was confirmed.
    pub paid_at: Option<DateTime<Utc>>,
    /// Set exactly once by delivery confirmation, only after payment.
    pub is_delivered: bool,
    /// When delivery was confirmed.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Payment provider's result reference, stored by `mark_paid`.
    pub payment_result: Option<PaymentResult>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// A line item: a product snapshot plus quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Unique line item ID.
    pub id: OrderItemId,
    /// The product this line referenced. Not a foreign key: the product may
    /// be deleted later without touching the order.
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Product image at order time.
    pub image: String,
    /// Unit price at order time.
    pub price: Decimal,
    /// Quantity ordered, always >= 1.
    pub quantity: i32,
}

/// The payment provider's confirmation, echoed back by the UI after the
/// provider approves the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// Provider-side transaction id.
    pub id: String,
    /// Provider-side status string.
    pub status: String,
    /// Provider-side update timestamp (opaque string).
    pub update_time: String,
    /// Payer email reported by the provider.
    pub email_address: String,
}

/// A row in an order listing, newest first.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Unique order ID.
    pub id: OrderId,
    /// The user that placed the order.
    pub user_id: UserId,
    /// Name of the user that placed the order (admin listing).
    pub user_name: String,
    /// Order total.
    pub total_price: Decimal,
    /// Whether payment was confirmed.
    pub is_paid: bool,
    /// When payment was confirmed.
    pub paid_at: Option<DateTime<Utc>>,
    /// Whether delivery was confirmed.
    pub is_delivered: bool,
    /// When delivery was confirmed.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
