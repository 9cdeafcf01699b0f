//! Catalog resolution
//!
//! Turns a requested (item id, variation label, quantity) into an order line
//! carrying a snapshot of the catalog values at this moment. Lookup only.

use async_trait::async_trait;
use shared::models::{Item, OrderLine, OrderLineDraft, VariationSnapshot};
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::money::line_subtotal;
use crate::db::repository::item;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Upper bound for a single line quantity
pub const MAX_QUANTITY: i64 = 9999;

/// Read access to catalog items
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn find_item(&self, id: i64) -> AppResult<Option<Item>>;
}

#[async_trait]
impl CatalogSource for SqlitePool {
    async fn find_item(&self, id: i64) -> AppResult<Option<Item>> {
        Ok(item::find_by_id(self, id).await?)
    }
}

#[async_trait]
impl CatalogSource for HashMap<i64, Item> {
    async fn find_item(&self, id: i64) -> AppResult<Option<Item>> {
        Ok(self.get(&id).cloned())
    }
}

/// Omitted or zero means one; negative is rejected
pub fn normalize_quantity(quantity: Option<i64>) -> AppResult<i64> {
    match quantity {
        None | Some(0) => Ok(1),
        Some(q) if q < 0 => Err(AppError::validation(format!(
            "quantity must be positive, got {q}"
        ))),
        Some(q) if q > MAX_QUANTITY => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("quantity exceeds maximum allowed ({MAX_QUANTITY}), got {q}"),
        )),
        Some(q) => Ok(q),
    }
}

/// Build an order line from a catalog item
pub fn snapshot_line(item: &Item, label: &str, quantity: i64) -> AppResult<OrderLine> {
    let variation = item.variation(label).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::VariationNotFound,
            format!("Variation '{}' not found for item '{}'", label, item.name),
        )
        .with_detail("item_id", item.id)
        .with_detail("item_name", item.name.clone())
        .with_detail("variation", label)
    })?;

    Ok(OrderLine {
        item_id: item.id,
        name_snapshot: item.name.clone(),
        variation_snapshot: VariationSnapshot {
            label: variation.label.clone(),
            base_cost: variation.base_cost,
            price: variation.price,
        },
        quantity,
        subtotal: line_subtotal(variation.price, quantity),
    })
}

/// Resolve one requested line against the catalog
pub async fn resolve_line<C>(catalog: &C, draft: &OrderLineDraft) -> AppResult<OrderLine>
where
    C: CatalogSource + ?Sized,
{
    let quantity = normalize_quantity(draft.quantity)?;
    let item = catalog.find_item(draft.item_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ItemNotFound,
            format!("Item not found: {}", draft.item_id),
        )
        .with_detail("item_id", draft.item_id)
    })?;
    snapshot_line(&item, &draft.variation_label, quantity)
}

/// Resolve every line; the first failure aborts
pub async fn resolve_lines<C>(catalog: &C, drafts: &[OrderLineDraft]) -> AppResult<Vec<OrderLine>>
where
    C: CatalogSource + ?Sized,
{
    let mut lines = Vec::with_capacity(drafts.len());
    for draft in drafts {
        lines.push(resolve_line(catalog, draft).await?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ItemCategory, Variation};

    fn catalog() -> HashMap<i64, Item> {
        let item = Item {
            id: 7,
            name: "Mango Ice Cream".into(),
            category: ItemCategory::IceCream,
            variations: vec![
                Variation {
                    label: "500ml".into(),
                    base_cost: 150.0,
                    price: 300.0,
                    quantity: 20,
                },
                Variation {
                    label: "1L".into(),
                    base_cost: 280.0,
                    price: 550.0,
                    quantity: 5,
                },
            ],
            images: vec![],
            created_at: 0,
            updated_at: 0,
        };
        HashMap::from([(item.id, item)])
    }

    fn draft(item_id: i64, label: &str, quantity: Option<i64>) -> OrderLineDraft {
        OrderLineDraft {
            item_id,
            variation_label: label.into(),
            quantity,
        }
    }

    #[tokio::test]
    async fn resolves_snapshot_and_subtotal() {
        let line = resolve_line(&catalog(), &draft(7, "500ml", Some(2)))
            .await
            .unwrap();

        assert_eq!(line.item_id, 7);
        assert_eq!(line.name_snapshot, "Mango Ice Cream");
        assert_eq!(line.variation_snapshot.label, "500ml");
        assert_eq!(line.variation_snapshot.base_cost, 150.0);
        assert_eq!(line.variation_snapshot.price, 300.0);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.subtotal, 600.0);
    }

    #[tokio::test]
    async fn missing_or_zero_quantity_means_one() {
        let cat = catalog();
        let line = resolve_line(&cat, &draft(7, "1L", None)).await.unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.subtotal, 550.0);

        let line = resolve_line(&cat, &draft(7, "1L", Some(0))).await.unwrap();
        assert_eq!(line.quantity, 1);
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected() {
        let err = resolve_line(&catalog(), &draft(7, "1L", Some(-2)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unknown_item_names_the_id() {
        let err = resolve_line(&catalog(), &draft(404, "1L", Some(1)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
        assert!(err.message.contains("404"));
    }

    #[tokio::test]
    async fn unknown_variation_names_item_and_label() {
        let err = resolve_line(&catalog(), &draft(7, "250ml", Some(1)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VariationNotFound);
        assert!(err.message.contains("Mango Ice Cream"));
        assert!(err.message.contains("250ml"));
    }

    #[tokio::test]
    async fn first_bad_line_aborts_the_batch() {
        let drafts = vec![draft(7, "500ml", Some(1)), draft(8, "500ml", Some(1))];
        let err = resolve_lines(&catalog(), &drafts).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[test]
    fn labels_match_exactly() {
        let cat = catalog();
        let item = cat.get(&7).unwrap();
        assert!(snapshot_line(item, "1l", 1).is_err());
        assert!(snapshot_line(item, "1L", 1).is_ok());
    }
}
