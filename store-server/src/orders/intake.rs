//! Order intake workflow
//!
//! validate draft → resolve/provision customer → resolve lines against the
//! catalog → compute totals → number and insert in one transaction.
//!
//! A customer created in step two stays even when a later step fails.

use shared::models::{OrderDraft, OrderWithCustomer};
use sqlx::SqlitePool;

use super::catalog::resolve_lines;
use super::customer::{PlaceholderPasswordPolicy, resolve_or_provision};
use super::money::{compute_totals, validate_amount};
use crate::db::repository::RepoError;
use crate::db::repository::order::{self, NewOrder};
use crate::utils::time::parse_timestamp;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum lines per order
pub const MAX_LINES: usize = 200;

/// Check the draft before touching the database
pub fn validate_draft(draft: &OrderDraft) -> AppResult<()> {
    if draft.customer.trim().is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }
    if draft.customer.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "customer is too long ({} chars, max {MAX_NAME_LEN})",
            draft.customer.len()
        )));
    }
    validate_optional_text(&draft.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;

    if draft.items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    if draft.items.len() > MAX_LINES {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Too many lines ({}, max {MAX_LINES})", draft.items.len()),
        ));
    }

    for (value, field) in [
        (draft.discount, "discount"),
        (draft.delivery_fee, "deliveryFee"),
        (draft.delivery_cost, "deliveryCost"),
    ] {
        if let Some(v) = value {
            validate_amount(v, field)?;
        }
    }
    Ok(())
}

/// Business date of the draft (now when omitted)
fn draft_date(draft: &OrderDraft) -> AppResult<i64> {
    match draft.date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => parse_timestamp(d),
        _ => Ok(shared::util::now_millis()),
    }
}

/// Run the whole intake workflow and return the stored order
pub async fn place_order(
    pool: &SqlitePool,
    policy: &PlaceholderPasswordPolicy,
    draft: OrderDraft,
) -> AppResult<OrderWithCustomer> {
    validate_draft(&draft)?;
    let date = draft_date(&draft)?;

    let customer =
        resolve_or_provision(pool, &draft.customer, draft.customer_phone.as_deref(), policy)
            .await?
            .into_user();

    let lines = resolve_lines(pool, &draft.items).await?;

    let discount = draft.discount.unwrap_or(0.0);
    let delivery_fee = draft.delivery_fee.unwrap_or(0.0);
    let totals = compute_totals(&lines, discount, delivery_fee);

    let stored = order::insert_numbered(
        pool,
        NewOrder {
            customer_id: customer.id,
            order_type: draft.order_type.unwrap_or_default(),
            items: lines,
            order_amount: totals.order_amount,
            discount,
            delivery_fee,
            delivery_cost: draft.delivery_cost.unwrap_or(0.0),
            payment_method: draft.payment_method.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            date,
        },
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::OrderNoConflict, msg),
        other => other.into(),
    })?;

    tracing::info!(
        order_id = stored.id,
        order_no = stored.order_no,
        customer_id = customer.id,
        lines = stored.items.len(),
        order_amount = stored.order_amount,
        "Order placed"
    );

    Ok(OrderWithCustomer {
        order: stored,
        customer: Some(customer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{item, user};
    use shared::models::{
        Item, ItemCategory, ItemCreate, OrderLineDraft, OrderStatus, OrderType, PaymentMethod,
        Variation,
    };

    async fn mango(pool: &SqlitePool) -> Item {
        item::create(
            pool,
            ItemCreate {
                name: "Mango Ice Cream".into(),
                category: ItemCategory::IceCream,
                variations: vec![Variation {
                    label: "500ml".into(),
                    base_cost: 150.0,
                    price: 300.0,
                    quantity: 50,
                }],
                images: vec![],
            },
        )
        .await
        .unwrap()
    }

    fn draft(customer: &str, lines: Vec<OrderLineDraft>) -> OrderDraft {
        OrderDraft {
            customer: customer.into(),
            customer_phone: None,
            items: lines,
            discount: None,
            delivery_fee: None,
            delivery_cost: None,
            payment_method: None,
            date: None,
            order_type: None,
            status: None,
        }
    }

    fn line(item_id: i64, label: &str, quantity: Option<i64>) -> OrderLineDraft {
        OrderLineDraft {
            item_id,
            variation_label: label.into(),
            quantity,
        }
    }

    async fn order_count(pool: &SqlitePool) -> i64 {
        order::count(pool).await.unwrap()
    }

    #[tokio::test]
    async fn mango_order_totals_and_defaults() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;

        let mut d = draft("Ali", vec![line(item.id, "500ml", Some(2))]);
        d.delivery_fee = Some(50.0);
        d.customer_phone = Some("0300-1234567".into());

        let placed = place_order(&db.pool, &PlaceholderPasswordPolicy::Random, d)
            .await
            .unwrap();

        let order = &placed.order;
        assert_eq!(order.order_no, 1);
        assert_eq!(order.items[0].subtotal, 600.0);
        assert_eq!(order.order_amount, 650.0);
        assert_eq!(order.discount, 0.0);
        assert_eq!(order.order_type, OrderType::Customer);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);

        let customer = placed.customer.unwrap();
        assert_eq!(customer.name, "Ali");
        assert_eq!(customer.phone.as_deref(), Some("0300-1234567"));
        assert_eq!(order.customer_id, customer.id);
    }

    #[tokio::test]
    async fn totals_follow_lines_discount_and_fee() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;

        let mut d = draft(
            "Wholesale Mart",
            vec![line(item.id, "500ml", Some(3)), line(item.id, "500ml", None)],
        );
        d.discount = Some(75.5);
        d.delivery_fee = Some(120.0);
        d.delivery_cost = Some(100.0);
        d.order_type = Some(OrderType::Wholesale);

        let order = place_order(&db.pool, &PlaceholderPasswordPolicy::Random, d)
            .await
            .unwrap()
            .order;

        let subtotals: Vec<f64> = order.items.iter().map(|l| l.subtotal).collect();
        assert_eq!(subtotals, vec![900.0, 300.0]);
        assert_eq!(order.order_amount, 1200.0 - 75.5 + 120.0);
        assert_eq!(order.delivery_cost, 100.0);
    }

    #[tokio::test]
    async fn sequential_orders_are_numbered_one_two() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;
        let policy = PlaceholderPasswordPolicy::Random;

        let a = place_order(&db.pool, &policy, draft("A", vec![line(item.id, "500ml", None)]))
            .await
            .unwrap();
        let b = place_order(&db.pool, &policy, draft("B", vec![line(item.id, "500ml", None)]))
            .await
            .unwrap();
        assert_eq!(a.order.order_no, 1);
        assert_eq!(b.order.order_no, 2);
    }

    #[tokio::test]
    async fn unknown_item_creates_no_order() {
        let db = DbService::in_memory().await.unwrap();
        mango(&db.pool).await;

        let err = place_order(
            &db.pool,
            &PlaceholderPasswordPolicy::Random,
            draft("Ghost", vec![line(987654, "500ml", Some(1))]),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ItemNotFound);
        assert!(err.message.contains("987654"));
        assert_eq!(order_count(&db.pool).await, 0);
        // The provisioned customer is not rolled back
        assert!(user::find_by_name(&db.pool, "Ghost").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_variation_creates_no_order() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;

        let err = place_order(
            &db.pool,
            &PlaceholderPasswordPolicy::Random,
            draft("Ali", vec![line(item.id, "2L", Some(1))]),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::VariationNotFound);
        assert!(err.message.contains("Mango Ice Cream"));
        assert!(err.message.contains("2L"));
        assert_eq!(order_count(&db.pool).await, 0);
    }

    #[tokio::test]
    async fn same_new_customer_is_created_once() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;
        let policy = PlaceholderPasswordPolicy::Random;

        let lines = || vec![line(item.id, "500ml", None)];
        let first = place_order(&db.pool, &policy, draft("Nadia", lines()))
            .await
            .unwrap();
        let second = place_order(&db.pool, &policy, draft("NADIA", lines()))
            .await
            .unwrap();

        assert_eq!(first.order.customer_id, second.order.customer_id);
        assert_eq!(user::count(&db.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_an_item_keeps_snapshots() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;

        let placed = place_order(
            &db.pool,
            &PlaceholderPasswordPolicy::Random,
            draft("Ali", vec![line(item.id, "500ml", Some(2))]),
        )
        .await
        .unwrap();

        assert!(item::delete(&db.pool, item.id).await.unwrap());

        let stored = order::find_by_id(&db.pool, placed.order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items, placed.order.items);
        assert_eq!(stored.items[0].name_snapshot, "Mango Ice Cream");
        assert_eq!(stored.items[0].variation_snapshot.price, 300.0);
    }

    #[test]
    fn draft_validation_rules() {
        let ok = draft("Ali", vec![line(1, "500ml", None)]);
        assert!(validate_draft(&ok).is_ok());

        let blank = draft("  ", vec![line(1, "500ml", None)]);
        assert_eq!(validate_draft(&blank).unwrap_err().code, ErrorCode::ValidationFailed);

        let empty = draft("Ali", vec![]);
        assert_eq!(validate_draft(&empty).unwrap_err().code, ErrorCode::OrderEmpty);

        let mut negative = draft("Ali", vec![line(1, "500ml", None)]);
        negative.discount = Some(-5.0);
        assert!(validate_draft(&negative).is_err());

        let mut nan = draft("Ali", vec![line(1, "500ml", None)]);
        nan.delivery_cost = Some(f64::NAN);
        assert!(validate_draft(&nan).is_err());
    }

    #[tokio::test]
    async fn bad_date_is_rejected_before_any_write() {
        let db = DbService::in_memory().await.unwrap();
        let item = mango(&db.pool).await;

        let mut d = draft("Ali", vec![line(item.id, "500ml", None)]);
        d.date = Some("31/12/2024".into());
        let err = place_order(&db.pool, &PlaceholderPasswordPolicy::Random, d)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(user::count(&db.pool).await.unwrap(), 0);
    }
}
