//! Dashboard API
//!
//! `GET /api/dashboard?startDate=..&endDate=..` with inclusive bounds.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use shared::models::DashboardReport;

use crate::core::ServerState;
use crate::db::repository::{order, user};
use crate::orders::dashboard::{DateRange, build_report};
use crate::orders::view;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/dashboard", get(report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/dashboard
pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardReport>> {
    let now = chrono::Local::now();
    let range = DateRange::from_query(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        &now,
    )?;

    let orders = order::find_in_range(&state.pool, range.start, range.end).await?;
    let orders = view::with_customers(&state.pool, orders).await?;
    let total_users = user::count(&state.pool).await?;

    tracing::debug!(
        start = range.start,
        end = range.end,
        orders = orders.len(),
        "Dashboard report"
    );
    Ok(Json(build_report(orders, total_users, &now)))
}
