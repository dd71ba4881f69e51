use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Completed and cancelled appointments admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: i32,
    pub supplier_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub scheduled_by_user_id: Option<i32>,
    pub scheduled_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub supplier_name: String,
    pub scheduled_by: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentLine {
    pub item_id: i32,
    pub item_name: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct AppointmentWithItems {
    #[serde(flatten)]
    pub appointment: AppointmentRecord,
    pub items: Vec<AppointmentLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub supplier_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default = "default_status")]
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub scheduled_by_user_id: Option<i32>,
    pub items: Vec<LineInput>,
}

fn default_status() -> AppointmentStatus {
    AppointmentStatus::Pending
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAppointment {
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_cancelled_are_terminal() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_uses_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Confirmed).unwrap(),
            r#""confirmed""#
        );
        let status: AppointmentStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn payload_defaults_to_pending_and_parses_lines() {
        let payload: AppointmentPayload = serde_json::from_str(
            r#"{
                "supplierId": 2,
                "date": "2025-11-03",
                "time": "09:30:00",
                "notes": null,
                "scheduledByUserId": 1,
                "items": [{"itemId": 4, "quantity": 10}, {"itemId": 5, "quantity": 5}]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.status, AppointmentStatus::Pending);
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].item_id, 4);
        assert_eq!(payload.items[1].quantity, 5);
    }
}
