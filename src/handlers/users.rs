use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{UserRole, UserSummary},
};

pub async fn pending_users(
    State(db): State<Database>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username, email, name, role, status, signup_date
        FROM users
        WHERE status = 'pending'
        ORDER BY signup_date DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(users))
}

pub async fn approved_users(
    State(db): State<Database>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username, email, name, role, status, signup_date
        FROM users
        WHERE status = 'approved' AND role = 'Staff'
        ORDER BY name
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(users))
}

pub async fn approve_user(
    State(db): State<Database>,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query("UPDATE users SET status = 'approved' WHERE id = $1")
        .bind(user_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(json!({ "message": "User approved successfully" })))
}

pub async fn reject_user(
    State(db): State<Database>,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND status = 'pending'")
        .bind(user_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(json!({ "message": "User rejected and removed" })))
}

/// Deletes a staff account. Ledger rows referencing the user keep their
/// history; the FK nulls the user reference out.
pub async fn delete_user(
    State(db): State<Database>,
    Path(user_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let user = sqlx::query_as::<_, (i32, String, UserRole)>(
        "SELECT id, username, role FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&db)
    .await?
    .ok_or(ApiError::NotFound("User"))?;

    let (id, username, role) = user;

    if role == UserRole::Admin {
        return Err(ApiError::Forbidden(
            "Cannot delete admin accounts".to_string(),
        ));
    }

    sqlx::query("DELETE FROM users WHERE id = $1 AND role != 'Admin'")
        .bind(user_id)
        .execute(&db)
        .await?;

    log::info!("deleted user account {} ({})", id, username);

    Ok(Json(json!({
        "message": "User account deleted successfully",
        "deletedUser": { "id": id, "username": username }
    })))
}
