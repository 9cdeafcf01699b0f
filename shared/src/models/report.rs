//! Dashboard report

use serde::{Deserialize, Serialize};

use super::order::OrderWithCustomer;

/// Revenue and profit for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub profit: f64,
}

/// Quantity sold per item name snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSales {
    pub name: String,
    pub quantity: i64,
}

/// Aggregated figures over a date-filtered set of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub total_users: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub average_order_value: f64,
    pub recent_orders: Vec<OrderWithCustomer>,
    pub monthly: Vec<MonthlyBucket>,
    pub item_sales: Vec<ItemSales>,
}
