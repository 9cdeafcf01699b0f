//! Order statistics returned with the order list

use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use shared::models::{Order, OrderStats};

use super::money::{to_decimal, to_f64};
use crate::utils::time::month_range_millis;

/// Whether a stored date maps to a real point in time
fn has_valid_date(order: &Order) -> bool {
    DateTime::from_timestamp_millis(order.date).is_some()
}

/// Count all orders, and count and sum `order_amount` over the current month
///
/// The month is `[1st 00:00, next 1st 00:00)` in `now`'s timezone. Orders
/// whose date cannot be converted are left out of the monthly figures.
pub fn compute_stats<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> OrderStats {
    let (start, end) = month_range_millis(now);

    let this_month: Vec<&Order> = orders
        .iter()
        .filter(|o| has_valid_date(o) && o.date >= start && o.date < end)
        .collect();

    let earnings: Decimal = this_month.iter().map(|o| to_decimal(o.order_amount)).sum();

    OrderStats {
        total_orders: orders.len() as i64,
        total_orders_this_month: this_month.len() as i64,
        earnings_this_month: to_f64(earnings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use shared::models::{OrderStatus, OrderType, PaymentMethod};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn order(date: i64, amount: f64) -> Order {
        Order {
            id: date,
            order_no: 1,
            customer_id: 1,
            order_type: OrderType::Customer,
            items: vec![],
            order_amount: amount,
            discount: 0.0,
            delivery_fee: 0.0,
            delivery_cost: 0.0,
            payment_method: PaymentMethod::Card,
            status: OrderStatus::Completed,
            date,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn month_boundaries_are_half_open() {
        let now = tz().with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let first_instant = tz()
            .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let next_month = tz()
            .with_ymd_and_hms(2024, 7, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis();

        let orders = vec![
            order(first_instant, 100.0),     // 1st of this month 00:00, included
            order(first_instant - 1, 200.0), // last instant of previous month
            order(next_month - 1, 50.25),    // last instant of this month
            order(next_month, 400.0),        // 1st of next month
        ];

        let stats = compute_stats(&orders, &now);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.total_orders_this_month, 2);
        assert_eq!(stats.earnings_this_month, 150.25);
    }

    #[test]
    fn unconvertible_dates_are_excluded() {
        let now = tz().with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let orders = vec![order(i64::MAX, 999.0), order(i64::MIN, 999.0)];

        let stats = compute_stats(&orders, &now);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_orders_this_month, 0);
        assert_eq!(stats.earnings_this_month, 0.0);
    }

    #[test]
    fn empty_store_has_zero_stats() {
        let now = tz().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(compute_stats(&[], &now), OrderStats::default());
    }
}
