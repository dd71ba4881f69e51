use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{LoginPayload, SignupPayload, User, UserSummary},
};

const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|err| ApiError::Internal(format!("password hashing failed: {}", err)))
}

pub async fn login(
    State(db): State<Database>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE (username = $1 OR email = $1) AND status = 'approved'",
    )
    .bind(&payload.username_or_email)
    .fetch_optional(&db)
    .await?;

    let user = match user {
        Some(user) => user,
        None => {
            let pending: Option<i32> = sqlx::query_scalar(
                "SELECT id FROM users WHERE (username = $1 OR email = $1) AND status = 'pending'",
            )
            .bind(&payload.username_or_email)
            .fetch_optional(&db)
            .await?;

            if pending.is_some() {
                return Err(ApiError::Unauthorized(
                    "Account pending approval".to_string(),
                ));
            }

            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let valid = bcrypt::verify(&payload.password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(Json(UserSummary {
        id: user.id,
        username: user.username,
        email: user.email,
        name: user.name,
        role: user.role,
        status: user.status,
        signup_date: user.signup_date,
    }))
}

pub async fn signup(
    State(db): State<Database>,
    Json(payload): Json<SignupPayload>,
) -> Result<Json<Value>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let existing = sqlx::query_as::<_, (String, String)>(
        "SELECT username, email FROM users WHERE username = $1 OR email = $2",
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .fetch_optional(&db)
    .await?;

    if let Some((username, email)) = existing {
        if username == payload.username {
            return Err(ApiError::Validation("Username already exists".to_string()));
        }
        if email == payload.email {
            return Err(ApiError::Validation(
                "Email already registered".to_string(),
            ));
        }
    }

    let password_hash = hash_password(&payload.password)?;

    let user_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password_hash, name, role, status)
        VALUES ($1, $2, $3, $4, 'Staff', 'pending')
        RETURNING id
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.name)
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({
        "id": user_id,
        "message": "Account created successfully. Waiting for admin approval."
    })))
}

/// Creates the initial admin account from the ADMIN_* environment variables
/// when no admin exists yet. Runs once at startup, after migrations.
pub async fn ensure_admin_account(db: &Database) -> Result<(), ApiError> {
    let admin_exists: Option<i32> =
        sqlx::query_scalar("SELECT id FROM users WHERE role = 'Admin' LIMIT 1")
            .fetch_optional(db)
            .await?;

    if admin_exists.is_some() {
        return Ok(());
    }

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            log::warn!("no admin account and ADMIN_PASSWORD unset; skipping admin bootstrap");
            return Ok(());
        }
    };

    let password_hash = hash_password(&password)?;

    sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, name, role, status)
        VALUES ($1, $2, $3, $4, 'Admin', 'approved')
        "#,
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(&name)
    .execute(db)
    .await?;

    log::info!("bootstrapped admin account '{}'", username);

    Ok(())
}
