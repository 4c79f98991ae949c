//! Deterministic order pricing.
//!
//! The rules are fixed so the same cart always produces the same totals:
//! shipping is a flat fee waived once the item subtotal reaches the free
//! threshold, and tax is a flat rate on the item subtotal, rounded half-up
//! to cents. `items + shipping + tax == total` holds exactly for every
//! order this module prices.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::orders::{OrderItemSnapshot, OrderTotals};

/// Flat shipping fee for orders under the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Item subtotal at which shipping becomes free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Tax rate applied to the item subtotal (0.15 == 15%).
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Sum of `price * quantity` across line items.
#[must_use]
pub fn items_price(items: &[OrderItemSnapshot]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

/// Shipping fee for a given item subtotal.
#[must_use]
pub fn shipping_price(items_price: Decimal) -> Decimal {
    if items_price >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Tax for a given item subtotal, rounded half-up to cents.
#[must_use]
pub fn tax_price(items_price: Decimal) -> Decimal {
    (items_price * TAX_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price a full set of line items.
#[must_use]
pub fn totals(items: &[OrderItemSnapshot]) -> OrderTotals {
    let items_price = items_price(items);
    let shipping_price = shipping_price(items_price);
    let tax_price = tax_price(items_price);

    OrderTotals {
        items_price,
        shipping_price,
        tax_price,
        total_price: items_price + shipping_price + tax_price,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use velour_core::ProductId;

    use super::*;

    fn snapshot(price: Decimal, quantity: i32) -> OrderItemSnapshot {
        OrderItemSnapshot {
            product_id: ProductId::new(1),
            name: "Linen Shirt".to_owned(),
            image: "/uploads/shirt.jpg".to_owned(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_constants_have_expected_values() {
        assert_eq!(FLAT_SHIPPING_FEE, dec!(5));
        assert_eq!(FREE_SHIPPING_THRESHOLD, dec!(100));
        assert_eq!(TAX_RATE, dec!(0.15));
    }

    #[test]
    fn test_worked_example() {
        // 2 x 20.00 -> items 40.00, flat shipping 5.00, 15% tax 6.00, total 51.00
        let totals = totals(&[snapshot(dec!(20.00), 2)]);
        assert_eq!(totals.items_price, dec!(40.00));
        assert_eq!(totals.shipping_price, dec!(5.00));
        assert_eq!(totals.tax_price, dec!(6.00));
        assert_eq!(totals.total_price, dec!(51.00));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let totals = totals(&[snapshot(dec!(50.00), 2)]);
        assert_eq!(totals.items_price, dec!(100.00));
        assert_eq!(totals.shipping_price, Decimal::ZERO);
    }

    #[test]
    fn test_shipping_charged_just_under_threshold() {
        assert_eq!(shipping_price(dec!(99.99)), dec!(5));
    }

    #[test]
    fn test_tax_rounds_half_up_to_cents() {
        // 33.33 * 0.15 = 4.9995 -> 5.00
        assert_eq!(tax_price(dec!(33.33)), dec!(5.00));
        // 0.10 * 0.15 = 0.015 -> 0.02 (midpoint rounds away from zero)
        assert_eq!(tax_price(dec!(0.10)), dec!(0.02));
    }

    #[test]
    fn test_total_invariant_over_assorted_carts() {
        let carts: Vec<Vec<OrderItemSnapshot>> = vec![
            vec![snapshot(dec!(19.99), 1)],
            vec![snapshot(dec!(19.99), 3), snapshot(dec!(7.25), 2)],
            vec![snapshot(dec!(149.50), 1)],
            vec![snapshot(dec!(0.01), 1)],
            vec![snapshot(dec!(33.33), 3), snapshot(dec!(66.67), 1)],
        ];

        for cart in carts {
            let t = totals(&cart);
            assert_eq!(
                t.items_price + t.shipping_price + t.tax_price,
                t.total_price,
                "invariant violated for cart {cart:?}"
            );
        }
    }

    #[test]
    fn test_empty_cart_prices_to_tax_plus_shipping_base() {
        // The service rejects empty carts before pricing; this documents the
        // raw arithmetic anyway.
        let t = totals(&[]);
        assert_eq!(t.items_price, Decimal::ZERO);
        assert_eq!(t.shipping_price, FLAT_SHIPPING_FEE);
        assert_eq!(t.total_price, FLAT_SHIPPING_FEE);
    }
}
