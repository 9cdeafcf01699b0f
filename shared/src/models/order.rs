//! Order Model
//!
//! Orders own their lines. Each line embeds a snapshot of the catalog
//! values at creation time, so later catalog edits or deletions never
//! change a historical order.

use serde::{Deserialize, Serialize};

use super::item::Item;
use super::user::User;

/// Order type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderType {
    #[default]
    Customer,
    Wholesale,
    #[serde(rename = "Walk-in")]
    #[cfg_attr(feature = "db", sqlx(rename = "Walk-in"))]
    WalkIn,
}

/// Order status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

/// Payment method (closed set)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash (CoD)")]
    #[cfg_attr(feature = "db", sqlx(rename = "Cash (CoD)"))]
    CashOnDelivery,
    #[serde(rename = "Online (EasyPaisa)")]
    #[cfg_attr(feature = "db", sqlx(rename = "Online (EasyPaisa)"))]
    EasyPaisa,
    #[serde(rename = "Online (JazzCash)")]
    #[cfg_attr(feature = "db", sqlx(rename = "Online (JazzCash)"))]
    JazzCash,
    Card,
}

/// Variation values copied into an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSnapshot {
    pub label: String,
    pub base_cost: f64,
    pub price: f64,
}

/// Order line (embedded, no identity of its own)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Source item (non-owning, may no longer exist)
    pub item_id: i64,
    pub name_snapshot: String,
    pub variation_snapshot: VariationSnapshot,
    pub quantity: i64,
    /// price × quantity, fixed at creation
    pub subtotal: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: i64,
    pub customer_id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderLine>,
    pub order_amount: f64,
    pub discount: f64,
    /// Charged to the customer
    pub delivery_fee: f64,
    /// Paid by the business to the courier
    pub delivery_cost: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Business date (millis)
    pub date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with the customer reference expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: Order,
    /// `None` when the customer has since been deleted
    pub customer: Option<User>,
}

/// Order line joined with the current catalog item, if it still exists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDetail {
    #[serde(flatten)]
    pub line: OrderLine,
    pub item: Option<Item>,
}

/// Full order view for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<User>,
    pub lines: Vec<OrderLineDetail>,
}

/// Requested order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDraft {
    #[serde(rename = "item", alias = "itemId")]
    pub item_id: i64,
    #[serde(rename = "variation", alias = "variationLabel")]
    pub variation_label: String,
    /// Omitted or 0 means 1
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Proposed order submitted to the intake workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Customer name
    pub customer: String,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLineDraft>,
    pub discount: Option<f64>,
    pub delivery_fee: Option<f64>,
    pub delivery_cost: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
}

/// Partial order update
///
/// Lines are never touched and totals are never recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub discount: Option<f64>,
    pub delivery_fee: Option<f64>,
    pub delivery_cost: Option<f64>,
    pub order_amount: Option<f64>,
    pub date: Option<String>,
    /// Customer id
    pub customer: Option<i64>,
}

/// Summary figures returned with the order list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_orders_this_month: i64,
    pub earnings_this_month: f64,
}

/// `GET /api/orders` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderWithCustomer>,
    pub stats: OrderStats,
}
