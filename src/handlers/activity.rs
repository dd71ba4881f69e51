use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{ActivityLogEntry, NewActivityLog},
};

pub async fn activity_logs_list(
    State(db): State<Database>,
) -> Result<Json<Vec<ActivityLogEntry>>, ApiError> {
    let logs = sqlx::query_as::<_, ActivityLogEntry>(
        r#"
        SELECT
            a.id, a.item_name, a.action, a.user_id, a.timestamp, a.details,
            u.name AS user_name, u.role AS user_role
        FROM activity_logs a
        LEFT JOIN users u ON a.user_id = u.id
        ORDER BY a.timestamp DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(logs))
}

pub async fn create_activity_log(
    State(db): State<Database>,
    Json(payload): Json<NewActivityLog>,
) -> Result<Json<Value>, ApiError> {
    let log_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO activity_logs (item_name, action, user_id, details)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&payload.item_name)
    .bind(payload.action)
    .bind(payload.user_id)
    .bind(&payload.details)
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({
        "id": log_id,
        "message": "Activity logged successfully"
    })))
}
