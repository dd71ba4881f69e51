use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::ITEM_WITH_REFS;
use crate::{
    database::Database,
    error::ApiError,
    models::{DamagedStatus, ItemDetails, NewItem, UpdateItem},
};

pub async fn items_list(State(db): State<Database>) -> Result<Json<Vec<ItemDetails>>, ApiError> {
    let query = format!("{} ORDER BY i.id DESC", ITEM_WITH_REFS);

    let items = sqlx::query_as::<_, ItemDetails>(&query)
        .fetch_all(&db)
        .await?;

    Ok(Json(items))
}

pub async fn item_detail(
    State(db): State<Database>,
    Path(item_id): Path<i32>,
) -> Result<Json<ItemDetails>, ApiError> {
    let query = format!("{} WHERE i.id = $1", ITEM_WITH_REFS);

    let item = sqlx::query_as::<_, ItemDetails>(&query)
        .bind(item_id)
        .fetch_optional(&db)
        .await?
        .ok_or(ApiError::NotFound("Item"))?;

    Ok(Json(item))
}

pub async fn create_item(
    State(db): State<Database>,
    Json(payload): Json<NewItem>,
) -> Result<Json<Value>, ApiError> {
    if payload.quantity < 0 || payload.reorder_level < 0 {
        return Err(ApiError::Validation(
            "Quantity and reorder level cannot be negative".to_string(),
        ));
    }

    let date_added = payload
        .date_added
        .unwrap_or_else(|| Utc::now().date_naive());

    let item_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO inventory_items
            (item_name, category_id, quantity, location_id, reorder_level, price, supplier_id, date_added)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(&payload.item_name)
    .bind(payload.category_id)
    .bind(payload.quantity)
    .bind(payload.location_id)
    .bind(payload.reorder_level)
    .bind(payload.price)
    .bind(payload.supplier_id)
    .bind(date_added)
    .fetch_one(&db)
    .await?;

    log::info!("added inventory item {} ({})", item_id, payload.item_name);

    Ok(Json(json!({
        "id": item_id,
        "message": "Item added successfully"
    })))
}

/// Direct edit of an item, quantity included. Edits through this path are
/// not stock movements and write no ledger rows.
pub async fn update_item(
    State(db): State<Database>,
    Path(item_id): Path<i32>,
    Json(payload): Json<UpdateItem>,
) -> Result<Json<Value>, ApiError> {
    if payload.quantity < 0 || payload.reorder_level < 0 {
        return Err(ApiError::Validation(
            "Quantity and reorder level cannot be negative".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE inventory_items
        SET item_name = $1, category_id = $2, quantity = $3, location_id = $4,
            reorder_level = $5, price = $6, supplier_id = $7, damaged_status = $8
        WHERE id = $9
        "#,
    )
    .bind(&payload.item_name)
    .bind(payload.category_id)
    .bind(payload.quantity)
    .bind(payload.location_id)
    .bind(payload.reorder_level)
    .bind(payload.price)
    .bind(payload.supplier_id)
    .bind(payload.damaged_status.unwrap_or(DamagedStatus::Good))
    .bind(item_id)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Item"));
    }

    Ok(Json(json!({ "message": "Item updated successfully" })))
}

pub async fn delete_item(
    State(db): State<Database>,
    Path(item_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
        .bind(item_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Item"));
    }

    Ok(Json(json!({ "message": "Item deleted successfully" })))
}
