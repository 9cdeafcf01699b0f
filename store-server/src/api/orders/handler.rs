//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    OrderDetail, OrderDraft, OrderListResponse, OrderUpdate, OrderWithCustomer,
};

use crate::api::DeleteResponse;
use crate::core::ServerState;
use crate::db::repository::order::{self, OrderChanges};
use crate::db::repository::user;
use crate::orders::money::validate_amount;
use crate::orders::stats::compute_stats;
use crate::orders::{place_order, view};
use crate::utils::time::parse_timestamp;
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
}

/// GET /api/orders - newest first, with stats
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<OrderListResponse>> {
    let orders = order::find_all(&state.pool).await?;
    let stats = compute_stats(&orders, &chrono::Local::now());
    let orders = view::with_customers(&state.pool, orders).await?;
    Ok(Json(OrderListResponse { orders, stats }))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let detail = view::order_detail(&state.pool, order).await?;
    Ok(Json(detail))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    AppJson(draft): AppJson<OrderDraft>,
) -> AppResult<(StatusCode, Json<OrderWithCustomer>)> {
    let placed = place_order(&state.pool, &state.password_policy, draft).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// Check an update payload and turn it into repository changes
fn to_changes(payload: OrderUpdate) -> AppResult<OrderChanges> {
    for (value, field) in [
        (payload.discount, "discount"),
        (payload.delivery_fee, "deliveryFee"),
        (payload.delivery_cost, "deliveryCost"),
        (payload.order_amount, "orderAmount"),
    ] {
        if let Some(v) = value {
            validate_amount(v, field)?;
        }
    }

    let date = match payload.date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => Some(parse_timestamp(d)?),
        _ => None,
    };

    Ok(OrderChanges {
        customer_id: payload.customer,
        order_type: payload.order_type,
        status: payload.status,
        payment_method: payload.payment_method,
        discount: payload.discount,
        delivery_fee: payload.delivery_fee,
        delivery_cost: payload.delivery_cost,
        order_amount: payload.order_amount,
        date,
    })
}

/// PUT /api/orders/{id}
///
/// Lines and totals are left as stored; `orderAmount` is only changed
/// when sent explicitly.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<OrderUpdate>,
) -> AppResult<Json<OrderWithCustomer>> {
    let changes = to_changes(payload)?;

    if order::find_by_id(&state.pool, id).await?.is_none() {
        return Err(order_not_found(id));
    }
    if let Some(customer_id) = changes.customer_id
        && user::find_by_id(&state.pool, customer_id).await?.is_none()
    {
        return Err(AppError::with_message(
            ErrorCode::UserNotFound,
            format!("Customer {customer_id} not found"),
        ));
    }

    let updated = order::update(&state.pool, id, changes)
        .await
        .map_err(|e| e.into_app_error(ErrorCode::OrderNotFound))?;
    tracing::info!(
        order_id = id,
        order_no = updated.order_no,
        status = ?updated.status,
        "Order updated"
    );

    let mut with_customer = view::with_customers(&state.pool, vec![updated]).await?;
    with_customer
        .pop()
        .map(Json)
        .ok_or_else(|| order_not_found(id))
}

/// DELETE /api/orders/{id}
///
/// The order number is not reused.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    if !order::delete(&state.pool, id).await? {
        return Err(order_not_found(id));
    }
    tracing::info!(order_id = id, "Order deleted");
    Ok(DeleteResponse::ok())
}
