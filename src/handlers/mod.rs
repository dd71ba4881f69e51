pub mod activity;
pub mod alerts;
pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod damaged;
pub mod inventory;
pub mod reports;
pub mod transactions;
pub mod users;

use axum::{extract::State, response::Json};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{database::Database, error::ApiError};

/// Inventory rows as the dashboard sees them, reference names joined in.
/// Shared by the inventory and low-stock listings.
pub(crate) const ITEM_WITH_REFS: &str = r#"
    SELECT
        i.id, i.item_name, i.category_id, i.quantity, i.location_id,
        i.reorder_level, i.price, i.supplier_id, i.damaged_status, i.date_added,
        c.category_name AS category,
        l.location_name AS location,
        s.supplier_name AS supplier
    FROM inventory_items i
    LEFT JOIN categories c ON i.category_id = c.id
    LEFT JOIN locations l ON i.location_id = l.id
    LEFT JOIN suppliers s ON i.supplier_id = s.id
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub damaged_items: i64,
    pub total_value: Decimal,
    pub total_in: i64,
    pub total_out: i64,
    pub upcoming_appointments: i64,
}

pub async fn dashboard_stats(
    State(db): State<Database>,
) -> Result<Json<DashboardStats>, ApiError> {
    let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
        .fetch_one(&db)
        .await?;

    let low_stock_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE quantity <= reorder_level")
            .fetch_one(&db)
            .await?;

    let damaged_items: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE damaged_status = 'Damaged'")
            .fetch_one(&db)
            .await?;

    let total_value: Option<Decimal> =
        sqlx::query_scalar("SELECT SUM(quantity * price) FROM inventory_items")
            .fetch_one(&db)
            .await?;

    let total_in: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(quantity) FROM stock_transactions WHERE transaction_type = 'IN'",
    )
    .fetch_one(&db)
    .await?;

    let total_out: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(quantity) FROM stock_transactions WHERE transaction_type = 'OUT'",
    )
    .fetch_one(&db)
    .await?;

    let upcoming_appointments: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM appointments
        WHERE date >= CURRENT_DATE AND status IN ('pending', 'confirmed')
        "#,
    )
    .fetch_one(&db)
    .await?;

    Ok(Json(DashboardStats {
        total_items,
        low_stock_items,
        damaged_items,
        total_value: total_value.unwrap_or_default(),
        total_in: total_in.unwrap_or(0),
        total_out: total_out.unwrap_or(0),
        upcoming_appointments,
    }))
}
