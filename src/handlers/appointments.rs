use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::inventory::RESTOCK_REASON,
    models::{
        AppointmentLine, AppointmentPayload, AppointmentRecord, AppointmentStatus,
        AppointmentWithItems, CompleteAppointment, LineInput,
    },
};

pub async fn appointments_list(
    State(db): State<Database>,
) -> Result<Json<Vec<AppointmentWithItems>>, ApiError> {
    let appointments = sqlx::query_as::<_, AppointmentRecord>(
        r#"
        SELECT
            a.id, a.supplier_id, a.date, a.time, a.status, a.notes,
            a.scheduled_by_user_id, a.scheduled_date, a.last_updated,
            s.supplier_name, u.name AS scheduled_by
        FROM appointments a
        JOIN suppliers s ON a.supplier_id = s.id
        LEFT JOIN users u ON a.scheduled_by_user_id = u.id
        ORDER BY a.date, a.time
        "#,
    )
    .fetch_all(&db)
    .await?;

    let mut detailed = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        let items = sqlx::query_as::<_, AppointmentLine>(
            r#"
            SELECT ai.item_id, i.item_name, ai.quantity
            FROM appointment_items ai
            JOIN inventory_items i ON ai.item_id = i.id
            WHERE ai.appointment_id = $1
            ORDER BY ai.id
            "#,
        )
        .bind(appointment.id)
        .fetch_all(&db)
        .await?;

        detailed.push(AppointmentWithItems { appointment, items });
    }

    Ok(Json(detailed))
}

fn validate_lines(items: &[LineInput]) -> Result<(), ApiError> {
    if items.iter().any(|line| line.quantity <= 0) {
        return Err(ApiError::Validation(
            "Appointment line quantities must be positive".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_appointment(
    State(db): State<Database>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<Json<Value>, ApiError> {
    validate_lines(&payload.items)?;

    let mut tx = db.begin().await?;

    let appointment_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO appointments (supplier_id, date, time, status, notes, scheduled_by_user_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(payload.supplier_id)
    .bind(payload.date)
    .bind(payload.time)
    .bind(payload.status)
    .bind(&payload.notes)
    .bind(payload.scheduled_by_user_id)
    .fetch_one(&mut *tx)
    .await?;

    for line in &payload.items {
        sqlx::query(
            "INSERT INTO appointment_items (appointment_id, item_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(appointment_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Json(json!({
        "id": appointment_id,
        "message": "Appointment scheduled successfully"
    })))
}

/// Edits replace the line set wholesale: prior lines are discarded and the
/// submitted set becomes the plan.
pub async fn update_appointment(
    State(db): State<Database>,
    Path(appointment_id): Path<i32>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<Json<Value>, ApiError> {
    validate_lines(&payload.items)?;

    let mut tx = db.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE appointments
        SET supplier_id = $1, date = $2, time = $3, status = $4, notes = $5, last_updated = now()
        WHERE id = $6
        "#,
    )
    .bind(payload.supplier_id)
    .bind(payload.date)
    .bind(payload.time)
    .bind(payload.status)
    .bind(&payload.notes)
    .bind(appointment_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Appointment"));
    }

    sqlx::query("DELETE FROM appointment_items WHERE appointment_id = $1")
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

    for line in &payload.items {
        sqlx::query(
            "INSERT INTO appointment_items (appointment_id, item_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(appointment_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Json(json!({ "message": "Appointment updated successfully" })))
}

/// Applies every planned line to the inventory ledger and flips the
/// appointment to completed, as one atomic unit. A missing item on any line
/// aborts the whole completion.
///
/// Restocked items are reassigned to the appointment's supplier; that is the
/// business rule, not a side effect.
pub async fn complete_appointment(
    State(db): State<Database>,
    Path(appointment_id): Path<i32>,
    Json(payload): Json<CompleteAppointment>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = db.begin().await?;

    let (supplier_id, status) = sqlx::query_as::<_, (i32, AppointmentStatus)>(
        "SELECT supplier_id, status FROM appointments WHERE id = $1 FOR UPDATE",
    )
    .bind(appointment_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Appointment"))?;

    // Completing twice would double-apply every line.
    if status.is_terminal() {
        return Err(ApiError::Conflict(
            "Appointment has already been completed or cancelled".to_string(),
        ));
    }

    let lines = sqlx::query_as::<_, (i32, i32)>(
        "SELECT item_id, quantity FROM appointment_items WHERE appointment_id = $1 ORDER BY id",
    )
    .bind(appointment_id)
    .fetch_all(&mut *tx)
    .await?;

    for (item_id, planned) in lines {
        let (current, reorder_level) = sqlx::query_as::<_, (i32, i32)>(
            "SELECT quantity, reorder_level FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Item"))?;

        let new_quantity = current + planned;

        sqlx::query("UPDATE inventory_items SET quantity = $1, supplier_id = $2 WHERE id = $3")
            .bind(new_quantity)
            .bind(supplier_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO stock_transactions
                (item_id, transaction_type, quantity, reason, user_id, stock_before, stock_after)
            VALUES ($1, 'IN', $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item_id)
        .bind(planned)
        .bind(RESTOCK_REASON)
        .bind(payload.user_id)
        .bind(current)
        .bind(new_quantity)
        .execute(&mut *tx)
        .await?;

        if new_quantity > reorder_level {
            sqlx::query("DELETE FROM low_stock_alerts WHERE item_id = $1")
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    sqlx::query("UPDATE appointments SET status = 'completed', last_updated = now() WHERE id = $1")
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("completed appointment {}", appointment_id);

    Ok(Json(json!({ "message": "Appointment completed and inventory updated" })))
}

/// Pure status transition; never touches the ledger. Cancelling an already
/// cancelled appointment is a no-op success, but a completed one stays
/// completed.
pub async fn cancel_appointment(
    State(db): State<Database>,
    Path(appointment_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut tx = db.begin().await?;

    let status: AppointmentStatus = sqlx::query_scalar(
        "SELECT status FROM appointments WHERE id = $1 FOR UPDATE",
    )
    .bind(appointment_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Appointment"))?;

    match status {
        AppointmentStatus::Completed => {
            return Err(ApiError::Conflict(
                "Cannot cancel a completed appointment".to_string(),
            ))
        }
        AppointmentStatus::Cancelled => {}
        _ => {
            sqlx::query(
                "UPDATE appointments SET status = 'cancelled', last_updated = now() WHERE id = $1",
            )
            .bind(appointment_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }
    }

    Ok(Json(json!({ "message": "Appointment cancelled" })))
}
