use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use super::ITEM_WITH_REFS;
use crate::{database::Database, error::ApiError, models::ItemDetails};

/// Every item at or below its reorder threshold, worst first.
pub async fn low_stock_items(
    State(db): State<Database>,
) -> Result<Json<Vec<ItemDetails>>, ApiError> {
    let query = format!(
        "{} WHERE i.quantity <= i.reorder_level ORDER BY i.quantity ASC",
        ITEM_WITH_REFS
    );

    let items = sqlx::query_as::<_, ItemDetails>(&query)
        .fetch_all(&db)
        .await?;

    Ok(Json(items))
}

/// Threshold breaches the notifier has not yet emailed: low-stock items with
/// no row in the pending-alert set.
pub async fn pending_alerts(
    State(db): State<Database>,
) -> Result<Json<Vec<ItemDetails>>, ApiError> {
    let query = format!(
        r#"{}
        LEFT JOIN low_stock_alerts lsa ON i.id = lsa.item_id
        WHERE i.quantity <= i.reorder_level AND lsa.id IS NULL
        ORDER BY i.quantity ASC"#,
        ITEM_WITH_REFS
    );

    let items = sqlx::query_as::<_, ItemDetails>(&query)
        .fetch_all(&db)
        .await?;

    Ok(Json(items))
}

pub async fn mark_alert_sent(
    State(db): State<Database>,
    Path(item_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM inventory_items WHERE id = $1")
        .bind(item_id)
        .fetch_optional(&db)
        .await?;

    if exists.is_none() {
        return Err(ApiError::NotFound("Item"));
    }

    sqlx::query("INSERT INTO low_stock_alerts (item_id) VALUES ($1) ON CONFLICT (item_id) DO NOTHING")
        .bind(item_id)
        .execute(&db)
        .await?;

    Ok(Json(json!({ "message": "Low stock alert marked as sent" })))
}

pub async fn clear_alert(
    State(db): State<Database>,
    Path(item_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    sqlx::query("DELETE FROM low_stock_alerts WHERE item_id = $1")
        .bind(item_id)
        .execute(&db)
        .await?;

    Ok(Json(json!({ "message": "Low stock alert cleared" })))
}
