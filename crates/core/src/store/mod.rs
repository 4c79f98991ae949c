//! Typed client application state.
//!
//! The storefront UI holds one global store: the cart contents, checkout
//! selections, the logged-in user, and drawer visibility. Instead of ambient
//! mutable globals, the state is an explicit value mutated only through
//! [`Action`] values applied by the pure [`reduce`] function, so every
//! transition is enumerable and testable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ShippingAddress, UserId};

/// A line in the client-held cart: a product reference plus the display
/// fields the UI needs without refetching, and the chosen quantity.
///
/// This is ephemeral client state; the authoritative snapshot is taken
/// server-side at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The referenced product.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Product image path at the time it was added.
    pub image: String,
    /// Unit price at the time it was added.
    pub price: Decimal,
    /// Stock available when added, used to cap the quantity selector.
    pub count_in_stock: i32,
    /// Chosen quantity, always >= 1.
    pub quantity: u32,
}

/// The logged-in user as held client-side after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// The user's id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Whether admin screens should be reachable.
    pub is_admin: bool,
    /// Bearer token presented on authenticated requests.
    pub token: String,
}

/// Cart slice: items plus checkout selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Cart line items, one per product.
    pub items: Vec<CartItem>,
    /// Shipping address saved at the checkout address step.
    pub shipping_address: Option<ShippingAddress>,
    /// Payment method saved at the checkout payment step.
    pub payment_method: Option<String>,
}

impl CartState {
    /// Total number of units across all lines (header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn items_subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }
}

/// UI slice: drawer visibility toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Whether the cart drawer is open.
    pub cart_drawer_open: bool,
    /// Whether the search drawer is open.
    pub search_drawer_open: bool,
}

/// The whole client store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Cart contents and checkout selections.
    pub cart: CartState,
    /// The logged-in user, if any.
    pub user: Option<SessionUser>,
    /// Drawer toggles.
    pub ui: UiState,
}

/// Every mutation the UI can apply to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add an item to the cart. If the product is already present, the
    /// existing line is replaced (quantity is set, not accumulated).
    AddToCart(CartItem),
    /// Remove the line for a product, if present.
    RemoveFromCart(ProductId),
    /// Save the shipping address from the checkout address step.
    SaveShippingAddress(ShippingAddress),
    /// Save the payment method from the checkout payment step.
    SavePaymentMethod(String),
    /// Empty the cart lines after a successful checkout. Checkout
    /// selections are kept for the next order.
    ClearCartItems,
    /// Record a successful login.
    Login(SessionUser),
    /// Drop the session on logout.
    Logout,
    /// Open or close the cart drawer.
    SetCartDrawer(bool),
    /// Open or close the search drawer.
    SetSearchDrawer(bool),
}

/// Apply an action to the store, producing the next state.
///
/// Adding an item whose quantity is 0 is a no-op: the UI never produces it,
/// and a zero-quantity line must not reach checkout.
#[must_use]
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::AddToCart(item) => {
            if item.quantity == 0 {
                return state;
            }
            match state
                .cart
                .items
                .iter_mut()
                .find(|existing| existing.product_id == item.product_id)
            {
                Some(existing) => *existing = item,
                None => state.cart.items.push(item),
            }
        }
        Action::RemoveFromCart(product_id) => {
            state.cart.items.retain(|item| item.product_id != product_id);
        }
        Action::SaveShippingAddress(address) => {
            state.cart.shipping_address = Some(address);
        }
        Action::SavePaymentMethod(method) => {
            state.cart.payment_method = Some(method);
        }
        Action::ClearCartItems => {
            state.cart.items.clear();
        }
        Action::Login(user) => {
            state.user = Some(user);
        }
        Action::Logout => {
            state.user = None;
        }
        Action::SetCartDrawer(open) => {
            state.ui.cart_drawer_open = open;
        }
        Action::SetSearchDrawer(open) => {
            state.ui.search_drawer_open = open;
        }
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn item(id: i32, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            image: format!("/uploads/{id}.jpg"),
            price,
            count_in_stock: 10,
            quantity,
        }
    }

    #[test]
    fn test_add_to_cart_appends_new_line() {
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(20), 2)));
        let state = reduce(state, Action::AddToCart(item(2, dec!(5), 1)));

        assert_eq!(state.cart.items.len(), 2);
        assert_eq!(state.cart.item_count(), 3);
    }

    #[test]
    fn test_add_to_cart_replaces_existing_line() {
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(20), 2)));
        let state = reduce(state, Action::AddToCart(item(1, dec!(20), 5)));

        assert_eq!(state.cart.items.len(), 1);
        assert_eq!(state.cart.items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(20), 0)));
        assert!(state.cart.items.is_empty());
    }

    #[test]
    fn test_remove_from_cart() {
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(20), 2)));
        let state = reduce(state, Action::RemoveFromCart(ProductId::new(1)));
        assert!(state.cart.items.is_empty());

        // Removing an absent product is harmless
        let state = reduce(state, Action::RemoveFromCart(ProductId::new(9)));
        assert!(state.cart.items.is_empty());
    }

    #[test]
    fn test_items_subtotal() {
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(19.99), 2)));
        let state = reduce(state, Action::AddToCart(item(2, dec!(5.50), 3)));

        assert_eq!(state.cart.items_subtotal(), dec!(56.48));
    }

    #[test]
    fn test_checkout_selections_survive_clear() {
        let address = ShippingAddress {
            address: "12 Mulberry Lane".to_owned(),
            city: "Portland".to_owned(),
            postal_code: "97201".to_owned(),
            country: "USA".to_owned(),
        };
        let state = reduce(StoreState::default(), Action::AddToCart(item(1, dec!(20), 2)));
        let state = reduce(state, Action::SaveShippingAddress(address.clone()));
        let state = reduce(state, Action::SavePaymentMethod("PayPal".to_owned()));
        let state = reduce(state, Action::ClearCartItems);

        assert!(state.cart.items.is_empty());
        assert_eq!(state.cart.shipping_address, Some(address));
        assert_eq!(state.cart.payment_method.as_deref(), Some("PayPal"));
    }

    #[test]
    fn test_login_logout() {
        let user = SessionUser {
            id: UserId::new(1),
            name: "Ada".to_owned(),
            is_admin: false,
            token: "token".to_owned(),
        };
        let state = reduce(StoreState::default(), Action::Login(user.clone()));
        assert_eq!(state.user, Some(user));

        let state = reduce(state, Action::Logout);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_drawer_toggles_are_independent() {
        let state = reduce(StoreState::default(), Action::SetCartDrawer(true));
        let state = reduce(state, Action::SetSearchDrawer(true));
        assert!(state.ui.cart_drawer_open);
        assert!(state.ui.search_drawer_open);

        let state = reduce(state, Action::SetCartDrawer(false));
        assert!(!state.ui.cart_drawer_open);
        assert!(state.ui.search_drawer_open);
    }
}
