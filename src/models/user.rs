use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub signup_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// What the dashboard gets back from login and the user listings. The
/// password hash never leaves the server.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub signup_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_payload_uses_camel_case() {
        let payload: LoginPayload = serde_json::from_str(
            r#"{"usernameOrEmail": "admin", "password": "secret"}"#,
        )
        .unwrap();
        assert_eq!(payload.username_or_email, "admin");
        assert_eq!(payload.password, "secret");
    }

    #[test]
    fn role_and_status_serialize_as_stored() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), r#""Admin""#);
        assert_eq!(
            serde_json::to_string(&AccountStatus::Pending).unwrap(),
            r#""pending""#
        );
    }
}
