//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use velour_core::{OrderId, ShippingAddress};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Order, OrderSummary, PaymentResult, User};
use crate::services::{OrderLineInput, OrderService};
use crate::state::AppState;

/// Checkout payload submitted by the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderLineInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// Reject access unless the caller owns the order or is an admin.
fn ensure_owner_or_admin(order: &Order, user: &User) -> Result<()> {
    if order.user_id == user.id || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "order belongs to another user".to_owned(),
        ))
    }
}

/// `POST /api/orders` - Create an order from the submitted cart.
#[instrument(skip(state, user, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let orders = OrderService::new(state.pool());
    let order = orders
        .create_order(
            user.id,
            &body.order_items,
            &body.shipping_address,
            &body.payment_method,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders` - All orders, newest first (admin).
#[instrument(skip_all)]
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = OrderService::new(state.pool());
    let summaries = orders.list_all_orders().await?;

    Ok(Json(summaries))
}

/// `GET /api/orders/myorders` - The caller's orders, newest first.
#[instrument(skip_all)]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = OrderService::new(state.pool());
    let summaries = orders.list_orders_for_user(user.id).await?;

    Ok(Json(summaries))
}

/// `GET /api/orders/{id}` - Order detail (owner or admin).
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let orders = OrderService::new(state.pool());
    let order = orders.get_order(OrderId::new(id)).await?;
    ensure_owner_or_admin(&order, &user)?;

    Ok(Json(order))
}

/// `PUT /api/orders/{id}/pay` - Confirm payment (owner or admin).
///
/// Rejects a second confirmation with 409; the stored `paid_at` is never
/// overwritten.
#[instrument(skip(state, user, payment))]
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(payment): Json<PaymentResult>,
) -> Result<Json<Order>> {
    let orders = OrderService::new(state.pool());
    let order = orders.get_order(OrderId::new(id)).await?;
    ensure_owner_or_admin(&order, &user)?;

    let order = orders.mark_paid(order.id, &payment).await?;

    Ok(Json(order))
}

/// `PUT /api/orders/{id}/deliver` - Confirm delivery (admin).
///
/// Fails with 412 if the order has not been paid.
#[instrument(skip(state, _admin))]
pub async fn deliver(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let orders = OrderService::new(state.pool());
    let order = orders.mark_delivered(OrderId::new(id)).await?;

    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use velour_core::{Email, UserId};

    use super::*;

    fn order_for(user_id: i32) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(user_id),
            items: Vec::new(),
            shipping_address: ShippingAddress {
                address: "12 Mulberry Lane".to_owned(),
                city: "Portland".to_owned(),
                postal_code: "97201".to_owned(),
                country: "USA".to_owned(),
            },
            payment_method: "PayPal".to_owned(),
            items_price: Decimal::ZERO,
            shipping_price: Decimal::ZERO,
            tax_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            payment_result: None,
            created_at: Utc::now(),
        }
    }

    fn user(id: i32, is_admin: bool) -> User {
        User {
            id: UserId::new(id),
            name: "Ada".to_owned(),
            email: Email::parse("ada@example.com").expect("email"),
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_access_own_order() {
        assert!(ensure_owner_or_admin(&order_for(7), &user(7, false)).is_ok());
    }

    #[test]
    fn test_admin_can_access_any_order() {
        assert!(ensure_owner_or_admin(&order_for(7), &user(1, true)).is_ok());
    }

    #[test]
    fn test_other_user_is_rejected() {
        assert!(matches!(
            ensure_owner_or_admin(&order_for(7), &user(8, false)),
            Err(AppError::Forbidden(_))
        ));
    }
}
