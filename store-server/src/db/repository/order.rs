//! Order Repository
//!
//! Order numbers come from the `order_counter` row, incremented in the same
//! transaction that inserts the order. A failed insert rolls the increment
//! back, so no number is consumed.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderLine, OrderStatus, OrderType, PaymentMethod};
use sqlx::SqlitePool;
use sqlx::types::Json;

const ORDER_SELECT: &str = "SELECT id, order_no, customer_id, order_type, items, order_amount, discount, delivery_fee, delivery_cost, payment_method, status, date, created_at, updated_at FROM orders";

/// Counter row backing `orders.order_no`
const ORDER_NO_COUNTER: &str = "order_no";

/// Fully computed order, ready to be numbered and stored
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub order_type: OrderType,
    pub items: Vec<OrderLine>,
    pub order_amount: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    pub delivery_cost: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub date: i64,
}

/// Partial update of the order header. Lines are not updatable.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub customer_id: Option<i64>,
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub discount: Option<f64>,
    pub delivery_fee: Option<f64>,
    pub delivery_cost: Option<f64>,
    pub order_amount: Option<f64>,
    pub date: Option<i64>,
}

/// All orders, newest business date first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY date DESC, order_no DESC");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Orders with `start <= date <= end`, newest first
pub async fn find_in_range(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE date >= ?1 AND date <= ?2 ORDER BY date DESC, order_no DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Assign the next order number and insert the order atomically
pub async fn insert_numbered(pool: &SqlitePool, data: NewOrder) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    let order_no: i64 = sqlx::query_scalar(
        "UPDATE order_counter SET value = value + 1 WHERE name = ? RETURNING value",
    )
    .bind(ORDER_NO_COUNTER)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::Database("Order number counter is missing".into()))?;

    sqlx::query(
        "INSERT INTO orders (id, order_no, customer_id, order_type, items, order_amount, discount, delivery_fee, delivery_cost, payment_method, status, date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
    )
    .bind(id)
    .bind(order_no)
    .bind(data.customer_id)
    .bind(data.order_type)
    .bind(Json(&data.items))
    .bind(data.order_amount)
    .bind(data.discount)
    .bind(data.delivery_fee)
    .bind(data.delivery_cost)
    .bind(data.payment_method)
    .bind(data.status)
    .bind(data.date)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(order_id = id, order_no, "Order inserted");

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: OrderChanges) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET customer_id = COALESCE(?1, customer_id), order_type = COALESCE(?2, order_type), status = COALESCE(?3, status), payment_method = COALESCE(?4, payment_method), discount = COALESCE(?5, discount), delivery_fee = COALESCE(?6, delivery_fee), delivery_cost = COALESCE(?7, delivery_cost), order_amount = COALESCE(?8, order_amount), date = COALESCE(?9, date), updated_at = ?10 WHERE id = ?11",
    )
    .bind(data.customer_id)
    .bind(data.order_type)
    .bind(data.status)
    .bind(data.payment_method)
    .bind(data.discount)
    .bind(data.delivery_fee)
    .bind(data.delivery_cost)
    .bind(data.order_amount)
    .bind(data.date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
