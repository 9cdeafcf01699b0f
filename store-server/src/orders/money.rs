//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done with `Decimal` internally, then converted to
//! `f64` (rounded to 2 decimal places) for storage and serialization.

use rust_decimal::prelude::*;
use shared::models::{Order, OrderLine};

use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum accepted monetary input
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is rejected at the boundary; reaching here with one is a bug.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(
            value = ?value,
            "Non-finite f64 in monetary calculation, defaulting to zero"
        );
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Reject negative, non-finite or absurdly large amounts
pub fn validate_amount(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// price × quantity
pub fn line_subtotal(price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

/// Totals of a freshly resolved order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Σ line subtotals
    pub items_total: f64,
    /// items_total − discount + delivery_fee
    pub order_amount: f64,
}

/// Compute order totals from resolved lines
pub fn compute_totals(lines: &[OrderLine], discount: f64, delivery_fee: f64) -> OrderTotals {
    let items_total: Decimal = lines.iter().map(|l| to_decimal(l.subtotal)).sum();
    let order_amount = items_total - to_decimal(discount) + to_decimal(delivery_fee);
    OrderTotals {
        items_total: to_f64(items_total),
        order_amount: to_f64(order_amount),
    }
}

/// Σ line subtotals of a stored order
pub fn items_total(order: &Order) -> Decimal {
    order.items.iter().map(|l| to_decimal(l.subtotal)).sum()
}

/// Portion of the order the business keeps
///
/// The delivery fee stays with the store only when no courier was paid.
pub fn store_amount(order: &Order) -> Decimal {
    let fee = if order.delivery_cost > 0.0 {
        Decimal::ZERO
    } else {
        to_decimal(order.delivery_fee)
    };
    items_total(order) - to_decimal(order.discount) + fee
}

/// store_amount − delivery_cost
pub fn profit(order: &Order) -> Decimal {
    store_amount(order) - to_decimal(order.delivery_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, OrderType, PaymentMethod, VariationSnapshot};

    fn line(price: f64, quantity: i64) -> OrderLine {
        OrderLine {
            item_id: 1,
            name_snapshot: "Samosa".into(),
            variation_snapshot: VariationSnapshot {
                label: "Single".into(),
                base_cost: 0.0,
                price,
            },
            quantity,
            subtotal: line_subtotal(price, quantity),
        }
    }

    fn order(lines: Vec<OrderLine>, discount: f64, fee: f64, cost: f64) -> Order {
        let totals = compute_totals(&lines, discount, fee);
        Order {
            id: 1,
            order_no: 1,
            customer_id: 1,
            order_type: OrderType::Customer,
            items: lines,
            order_amount: totals.order_amount,
            discount,
            delivery_fee: fee,
            delivery_cost: cost,
            payment_method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Pending,
            date: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn mango_example_totals() {
        let lines = vec![line(300.0, 2)];
        assert_eq!(lines[0].subtotal, 600.0);

        let totals = compute_totals(&lines, 0.0, 50.0);
        assert_eq!(totals.items_total, 600.0);
        assert_eq!(totals.order_amount, 650.0);
    }

    #[test]
    fn decimal_sums_are_exact() {
        // 0.1 + 0.2 style drift must not leak into totals
        let lines = vec![line(0.1, 3), line(0.2, 1), line(19.99, 3)];
        let totals = compute_totals(&lines, 0.3, 0.0);
        assert_eq!(lines[0].subtotal, 0.3);
        assert_eq!(lines[2].subtotal, 59.97);
        assert_eq!(totals.items_total, 60.47);
        assert_eq!(totals.order_amount, 60.17);
    }

    #[test]
    fn store_keeps_fee_only_without_courier() {
        let own_delivery = order(vec![line(300.0, 2)], 20.0, 50.0, 0.0);
        assert_eq!(to_f64(store_amount(&own_delivery)), 630.0);
        assert_eq!(to_f64(profit(&own_delivery)), 630.0);

        let courier = order(vec![line(300.0, 2)], 20.0, 50.0, 120.0);
        assert_eq!(to_f64(store_amount(&courier)), 580.0);
        assert_eq!(to_f64(profit(&courier)), 460.0);
    }

    #[test]
    fn amounts_are_validated() {
        assert!(validate_amount(0.0, "discount").is_ok());
        assert!(validate_amount(-1.0, "discount").is_err());
        assert!(validate_amount(f64::NAN, "deliveryFee").is_err());
        assert!(validate_amount(f64::INFINITY, "deliveryCost").is_err());
        assert!(validate_amount(MAX_AMOUNT * 2.0, "price").is_err());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }
}
