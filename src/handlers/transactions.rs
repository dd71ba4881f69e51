use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::inventory::DAMAGED_WRITE_OFF_REASON,
    models::{TransactionKind, TransactionPayload, TransactionRecord},
};

pub async fn transactions_list(
    State(db): State<Database>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let transactions = sqlx::query_as::<_, TransactionRecord>(
        r#"
        SELECT
            t.id, t.item_id, t.transaction_type, t.quantity, t.reason, t.user_id,
            t.stock_before, t.stock_after, t.timestamp,
            i.item_name, u.name AS user_name, u.role AS user_role
        FROM stock_transactions t
        JOIN inventory_items i ON t.item_id = i.id
        LEFT JOIN users u ON t.user_id = u.id
        ORDER BY t.timestamp DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(transactions))
}

/// Records a stock movement: one atomic unit covering the ledger insert, the
/// quantity overwrite, the damaged-item write-off, and alert reconciliation.
///
/// The item row is locked before anything is written. The caller's
/// `stockBefore` snapshot must match the locked quantity (a stale snapshot
/// means a concurrent movement won the race) and its `stockAfter` must match
/// the arithmetic; both are rejected rather than trusted.
pub async fn record_transaction(
    State(db): State<Database>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = db.begin().await?;

    let (current, reorder_level) = sqlx::query_as::<_, (i32, i32)>(
        "SELECT quantity, reorder_level FROM inventory_items WHERE id = $1 FOR UPDATE",
    )
    .bind(payload.item_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Item"))?;

    if payload.stock_before != current {
        return Err(ApiError::Conflict(format!(
            "Stock level changed: expected {} on hand, found {}",
            payload.stock_before, current
        )));
    }

    let new_quantity = payload.transaction_type.apply(current, payload.quantity)?;
    if payload.stock_after != new_quantity {
        return Err(ApiError::Validation(format!(
            "stockAfter is inconsistent with the movement: expected {}, got {}",
            new_quantity, payload.stock_after
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO stock_transactions
            (item_id, transaction_type, quantity, reason, user_id, stock_before, stock_after)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(payload.item_id)
    .bind(payload.transaction_type)
    .bind(payload.quantity)
    .bind(&payload.reason)
    .bind(payload.user_id)
    .bind(current)
    .bind(new_quantity)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE inventory_items SET quantity = $1 WHERE id = $2")
        .bind(new_quantity)
        .bind(payload.item_id)
        .execute(&mut *tx)
        .await?;

    if payload.transaction_type == TransactionKind::Out
        && payload.reason == DAMAGED_WRITE_OFF_REASON
    {
        sqlx::query(
            r#"
            INSERT INTO damaged_items (item_id, quantity, reason, status, date_damaged)
            VALUES ($1, $2, $3, 'Standby', CURRENT_DATE)
            "#,
        )
        .bind(payload.item_id)
        .bind(payload.quantity)
        .bind(&payload.reason)
        .execute(&mut *tx)
        .await?;
    }

    // The pending-alert set tracks breaches; a movement that lifts the item
    // back above its threshold retires the alert.
    if new_quantity > reorder_level {
        sqlx::query("DELETE FROM low_stock_alerts WHERE item_id = $1")
            .bind(payload.item_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    log::info!(
        "recorded {:?} movement of {} units for item {} ({} -> {})",
        payload.transaction_type,
        payload.quantity,
        payload.item_id,
        current,
        new_quantity
    );

    Ok(Json(json!({ "message": "Transaction recorded successfully" })))
}
