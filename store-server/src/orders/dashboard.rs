//! Dashboard report
//!
//! Aggregates over orders filtered by an inclusive date range: totals,
//! twelve monthly buckets ending with the current month, the five most
//! recent orders and quantity sold per item.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use shared::models::{DashboardReport, ItemSales, MonthlyBucket, OrderWithCustomer};

use super::money::{profit, to_decimal, to_f64};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, shift_month};
use crate::utils::{AppError, AppResult};

/// Number of monthly buckets
pub const MONTHS: usize = 12;

/// Number of recent orders shown
pub const RECENT_ORDERS: usize = 5;

/// Lower bound when no start date is given
const DEFAULT_START: (i32, u32, u32) = (2000, 1, 1);

/// Inclusive `[start, end]` range in millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    /// Build the range from optional query values
    ///
    /// A plain `YYYY-MM-DD` end date covers that whole day. Defaults are
    /// 2000-01-01 and `now`.
    pub fn from_query<Tz: TimeZone>(
        start: Option<&str>,
        end: Option<&str>,
        now: &DateTime<Tz>,
    ) -> AppResult<Self> {
        let tz = now.timezone();

        let start = match start.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => bound(s, &tz, false)?,
            None => {
                let (y, m, d) = DEFAULT_START;
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
                day_start_millis(date, &tz)
            }
        };
        let end = match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(e) => bound(e, &tz, true)?,
            None => now.timestamp_millis(),
        };

        if start > end {
            return Err(AppError::validation("startDate must not be after endDate"));
        }
        Ok(Self { start, end })
    }
}

fn bound<Tz: TimeZone>(value: &str, tz: &Tz, is_end: bool) -> AppResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    let date = parse_date(value)?;
    Ok(if is_end {
        day_end_millis(date, tz) - 1
    } else {
        day_start_millis(date, tz)
    })
}

/// `YYYY-MM` label of a month's first day
fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Build the report from already filtered orders
pub fn build_report<Tz: TimeZone>(
    orders: Vec<OrderWithCustomer>,
    total_users: i64,
    now: &DateTime<Tz>,
) -> DashboardReport {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut revenue = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;

    let first_month = shift_month(today, -(MONTHS as i32 - 1));
    let mut monthly_revenue = [Decimal::ZERO; MONTHS];
    let mut monthly_profit = [Decimal::ZERO; MONTHS];

    let mut sales: HashMap<String, i64> = HashMap::new();

    for o in &orders {
        let order = &o.order;
        let amount = to_decimal(order.order_amount);
        let order_profit = profit(order);
        revenue += amount;
        total_profit += order_profit;

        if let Some(dt) = DateTime::from_timestamp_millis(order.date) {
            let local = dt.with_timezone(&tz).date_naive();
            let diff = (local.year() - first_month.year()) * 12 + local.month0() as i32
                - first_month.month0() as i32;
            if (0..MONTHS as i32).contains(&diff) {
                monthly_revenue[diff as usize] += amount;
                monthly_profit[diff as usize] += order_profit;
            }
        }

        for line in &order.items {
            *sales.entry(line.name_snapshot.clone()).or_default() += line.quantity;
        }
    }

    let monthly = (0..MONTHS)
        .map(|i| MonthlyBucket {
            month: month_label(shift_month(first_month, i as i32)),
            revenue: to_f64(monthly_revenue[i]),
            profit: to_f64(monthly_profit[i]),
        })
        .collect();

    let mut item_sales: Vec<ItemSales> = sales
        .into_iter()
        .map(|(name, quantity)| ItemSales { name, quantity })
        .collect();
    item_sales.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));

    let total_orders = orders.len() as i64;
    let average = if total_orders > 0 {
        revenue / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    let mut recent = orders;
    recent.sort_by(|a, b| {
        b.order
            .date
            .cmp(&a.order.date)
            .then_with(|| b.order.order_no.cmp(&a.order.order_no))
    });
    recent.truncate(RECENT_ORDERS);

    DashboardReport {
        total_users,
        total_orders,
        total_revenue: to_f64(revenue),
        total_profit: to_f64(total_profit),
        average_order_value: to_f64(average),
        recent_orders: recent,
        monthly,
        item_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use shared::models::{
        Order, OrderLine, OrderStatus, OrderType, PaymentMethod, VariationSnapshot,
    };

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> i64 {
        tz().with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().timestamp_millis()
    }

    fn order(no: i64, date: i64, name: &str, qty: i64, fee: f64, cost: f64) -> OrderWithCustomer {
        let subtotal = 100.0 * qty as f64;
        OrderWithCustomer {
            order: Order {
                id: no,
                order_no: no,
                customer_id: 1,
                order_type: OrderType::Customer,
                items: vec![OrderLine {
                    item_id: 1,
                    name_snapshot: name.into(),
                    variation_snapshot: VariationSnapshot {
                        label: "Single".into(),
                        base_cost: 50.0,
                        price: 100.0,
                    },
                    quantity: qty,
                    subtotal,
                }],
                order_amount: subtotal + fee,
                discount: 0.0,
                delivery_fee: fee,
                delivery_cost: cost,
                payment_method: PaymentMethod::CashOnDelivery,
                status: OrderStatus::Completed,
                date,
                created_at: 0,
                updated_at: 0,
            },
            customer: None,
        }
    }

    #[test]
    fn totals_profit_and_average() {
        let now = tz().with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap();
        let orders = vec![
            order(1, at(2024, 6, 1), "Samosa", 2, 50.0, 0.0),   // revenue 250, profit 250
            order(2, at(2024, 5, 10), "Samosa", 1, 50.0, 80.0), // revenue 150, profit 20
        ];

        let report = build_report(orders, 3, &now);
        assert_eq!(report.total_users, 3);
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, 400.0);
        assert_eq!(report.total_profit, 270.0);
        assert_eq!(report.average_order_value, 200.0);
    }

    #[test]
    fn twelve_buckets_end_with_current_month() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let orders = vec![
            order(1, at(2024, 3, 1), "A", 1, 0.0, 0.0),
            order(2, at(2023, 4, 15), "A", 2, 0.0, 0.0),
            order(3, at(2023, 3, 31), "A", 5, 0.0, 0.0), // thirteen months back
        ];

        let report = build_report(orders, 0, &now);
        assert_eq!(report.monthly.len(), MONTHS);
        assert_eq!(report.monthly[0].month, "2023-04");
        assert_eq!(report.monthly[11].month, "2024-03");
        assert_eq!(report.monthly[0].revenue, 200.0);
        assert_eq!(report.monthly[11].revenue, 100.0);
        let bucketed: f64 = report.monthly.iter().map(|b| b.revenue).sum();
        assert_eq!(bucketed, 300.0);
    }

    #[test]
    fn recent_orders_and_item_sales() {
        let now = tz().with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap();
        let orders: Vec<OrderWithCustomer> = (1..=7)
            .map(|i| {
                let name = if i % 2 == 0 { "Samosa" } else { "Mango Ice Cream" };
                order(i, at(2024, 6, i as u32), name, 1, 0.0, 0.0)
            })
            .collect();

        let report = build_report(orders, 0, &now);
        let recent: Vec<i64> = report.recent_orders.iter().map(|o| o.order.order_no).collect();
        assert_eq!(recent, vec![7, 6, 5, 4, 3]);

        assert_eq!(report.item_sales[0].name, "Mango Ice Cream");
        assert_eq!(report.item_sales[0].quantity, 4);
        assert_eq!(report.item_sales[1].quantity, 3);
    }

    #[test]
    fn range_defaults_and_inclusive_end() {
        let now = tz().with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap();

        let range = DateRange::from_query(None, None, &now).unwrap();
        assert_eq!(
            range.start,
            tz().with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap().timestamp_millis()
        );
        assert_eq!(range.end, now.timestamp_millis());

        let range = DateRange::from_query(Some("2024-06-01"), Some("2024-06-10"), &now).unwrap();
        assert!(range.end >= at(2024, 6, 10));
        let next_day = tz().with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap();
        assert!(range.end < next_day.timestamp_millis());

        assert!(DateRange::from_query(Some("2024-06-10"), Some("2024-06-01"), &now).is_err());
        assert!(DateRange::from_query(Some("June"), None, &now).is_err());
    }
}
