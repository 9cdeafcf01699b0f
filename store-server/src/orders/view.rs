//! Read models: orders joined with their customer and current catalog items

use std::collections::HashMap;

use shared::models::{Order, OrderDetail, OrderLineDetail, OrderWithCustomer, User};
use sqlx::SqlitePool;

use crate::db::repository::{item, user};
use crate::utils::AppResult;

/// Attach each order's customer, loading every distinct customer once
///
/// A deleted customer leaves `customer` empty.
pub async fn with_customers(
    pool: &SqlitePool,
    orders: Vec<Order>,
) -> AppResult<Vec<OrderWithCustomer>> {
    let mut customers: HashMap<i64, Option<User>> = HashMap::new();
    for order in &orders {
        if !customers.contains_key(&order.customer_id) {
            let found = user::find_by_id(pool, order.customer_id).await?;
            customers.insert(order.customer_id, found);
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let customer = customers.get(&order.customer_id).cloned().flatten();
            OrderWithCustomer { order, customer }
        })
        .collect())
}

/// Order with its customer and each line's current catalog item
pub async fn order_detail(pool: &SqlitePool, order: Order) -> AppResult<OrderDetail> {
    let customer = user::find_by_id(pool, order.customer_id).await?;

    let mut lines = Vec::with_capacity(order.items.len());
    for line in &order.items {
        let current = item::find_by_id(pool, line.item_id).await?;
        lines.push(OrderLineDetail {
            line: line.clone(),
            item: current,
        });
    }

    Ok(OrderDetail {
        order,
        customer,
        lines,
    })
}
