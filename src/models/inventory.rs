use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;
use crate::models::UserRole;

/// OUT movements with exactly this reason also write a damaged_items row.
pub const DAMAGED_WRITE_OFF_REASON: &str = "Damaged/Discarded";

/// Reason stamped on the IN movements created by appointment fulfillment.
pub const RESTOCK_REASON: &str = "Restock from appointment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "damaged_status")]
pub enum DamagedStatus {
    Good,
    Damaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "damage_state")]
pub enum DamageState {
    Standby,
    Thrown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    In,
    Out,
}

impl TransactionKind {
    /// Applies a movement of `quantity` units to `stock_before` and returns
    /// the resulting quantity. Rejects non-positive quantities and OUT
    /// movements that would take the stock below zero.
    pub fn apply(self, stock_before: i32, quantity: i32) -> Result<i32, ApiError> {
        if quantity <= 0 {
            return Err(ApiError::Validation(
                "Transaction quantity must be positive".to_string(),
            ));
        }

        match self {
            TransactionKind::In => Ok(stock_before + quantity),
            TransactionKind::Out => {
                if quantity > stock_before {
                    return Err(ApiError::Validation(format!(
                        "Cannot stock out {} units; only {} on hand",
                        quantity, stock_before
                    )));
                }
                Ok(stock_before - quantity)
            }
        }
    }
}

/// Inventory row with the category/location/supplier names joined in, as the
/// dashboard displays it.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i32,
    pub item_name: String,
    pub category_id: Option<i32>,
    pub quantity: i32,
    pub location_id: Option<i32>,
    pub reorder_level: i32,
    pub price: Decimal,
    pub supplier_id: Option<i32>,
    pub damaged_status: DamagedStatus,
    pub date_added: NaiveDate,
    pub category: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub item_name: String,
    pub category_id: Option<i32>,
    pub quantity: i32,
    pub location_id: Option<i32>,
    pub reorder_level: i32,
    pub price: Decimal,
    pub supplier_id: Option<i32>,
    pub date_added: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub item_name: String,
    pub category_id: Option<i32>,
    pub quantity: i32,
    pub location_id: Option<i32>,
    pub reorder_level: i32,
    pub price: Decimal,
    pub supplier_id: Option<i32>,
    pub damaged_status: Option<DamagedStatus>,
}

/// Ledger row joined with the item and the recording user. The user join is
/// LEFT: movement history outlives deleted accounts.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i32,
    pub item_id: i32,
    pub transaction_type: TransactionKind,
    pub quantity: i32,
    pub reason: String,
    pub user_id: Option<i32>,
    pub stock_before: i32,
    pub stock_after: i32,
    pub timestamp: DateTime<Utc>,
    pub item_name: String,
    pub user_name: Option<String>,
    pub user_role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub item_id: i32,
    pub transaction_type: TransactionKind,
    pub quantity: i32,
    pub reason: String,
    pub user_id: i32,
    pub stock_before: i32,
    pub stock_after: i32,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DamagedRecord {
    pub id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub reason: Option<String>,
    pub status: DamageState,
    pub notes: Option<String>,
    pub date_damaged: NaiveDate,
    pub last_updated: DateTime<Utc>,
    pub item_name: String,
    pub location: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagedItemUpdate {
    pub status: DamageState,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_in_adds_to_the_snapshot() {
        assert_eq!(TransactionKind::In.apply(5, 20).unwrap(), 25);
        assert_eq!(TransactionKind::In.apply(0, 1).unwrap(), 1);
    }

    #[test]
    fn stock_out_subtracts_from_the_snapshot() {
        assert_eq!(TransactionKind::Out.apply(8, 3).unwrap(), 5);
        assert_eq!(TransactionKind::Out.apply(4, 4).unwrap(), 0);
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert!(TransactionKind::In.apply(10, 0).is_err());
        assert!(TransactionKind::Out.apply(10, -2).is_err());
    }

    #[test]
    fn stock_out_never_goes_negative() {
        let err = TransactionKind::Out.apply(3, 5).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transaction_kind_matches_the_wire_format() {
        assert_eq!(serde_json::to_string(&TransactionKind::In).unwrap(), r#""IN""#);
        let kind: TransactionKind = serde_json::from_str(r#""OUT""#).unwrap();
        assert_eq!(kind, TransactionKind::Out);
    }

    #[test]
    fn transaction_payload_deserializes_from_camel_case() {
        let payload: TransactionPayload = serde_json::from_str(
            r#"{
                "itemId": 7,
                "transactionType": "OUT",
                "quantity": 2,
                "reason": "Damaged/Discarded",
                "userId": 1,
                "stockBefore": 10,
                "stockAfter": 8
            }"#,
        )
        .unwrap();
        assert_eq!(payload.item_id, 7);
        assert_eq!(payload.transaction_type, TransactionKind::Out);
        assert_eq!(payload.reason, DAMAGED_WRITE_OFF_REASON);
        assert_eq!(payload.stock_after, 8);
    }
}
