use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{DamagedItemUpdate, DamagedRecord},
};

pub async fn damaged_items_list(
    State(db): State<Database>,
) -> Result<Json<Vec<DamagedRecord>>, ApiError> {
    let items = sqlx::query_as::<_, DamagedRecord>(
        r#"
        SELECT
            d.id, d.item_id, d.quantity, d.reason, d.status, d.notes,
            d.date_damaged, d.last_updated,
            i.item_name, l.location_name AS location, i.price
        FROM damaged_items d
        JOIN inventory_items i ON d.item_id = i.id
        LEFT JOIN locations l ON i.location_id = l.id
        ORDER BY d.date_damaged DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(items))
}

pub async fn update_damaged_item(
    State(db): State<Database>,
    Path(damaged_id): Path<i32>,
    Json(payload): Json<DamagedItemUpdate>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query(
        "UPDATE damaged_items SET status = $1, notes = $2, last_updated = now() WHERE id = $3",
    )
    .bind(payload.status)
    .bind(&payload.notes)
    .bind(damaged_id)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Damaged item"));
    }

    Ok(Json(json!({ "message": "Damaged item updated successfully" })))
}

pub async fn delete_damaged_item(
    State(db): State<Database>,
    Path(damaged_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query("DELETE FROM damaged_items WHERE id = $1")
        .bind(damaged_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Damaged item"));
    }

    Ok(Json(json!({ "message": "Damaged item removed successfully" })))
}
