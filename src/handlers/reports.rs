use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;

use crate::{
    database::Database,
    error::ApiError,
    models::{ActivityAction, ActivityLogEntry, TransactionKind, TransactionRecord},
};

#[derive(Debug, Deserialize)]
pub struct ActivityReportParams {
    pub action: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

fn parse_action(value: &str) -> Result<ActivityAction, ApiError> {
    match value {
        "Added" => Ok(ActivityAction::Added),
        "Edited" => Ok(ActivityAction::Edited),
        "Deleted" => Ok(ActivityAction::Deleted),
        "Transaction" => Ok(ActivityAction::Transaction),
        "Alert" => Ok(ActivityAction::Alert),
        _ => Err(ApiError::Validation(
            "action must be one of: Added, Edited, Deleted, Transaction, Alert".to_string(),
        )),
    }
}

fn parse_filter_number(value: &str, field: &str) -> Result<i32, ApiError> {
    value
        .parse::<i32>()
        .map_err(|_| ApiError::Validation(format!("{} must be a number", field)))
}

/// Activity history filtered by action, month and year. Every filter is
/// optional; "all" means no filter, matching the dashboard's dropdowns.
pub async fn activity_report(
    State(db): State<Database>,
    Query(params): Query<ActivityReportParams>,
) -> Result<Json<Vec<ActivityLogEntry>>, ApiError> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT
            a.id, a.item_name, a.action, a.user_id, a.timestamp, a.details,
            u.name AS user_name, u.role AS user_role
        FROM activity_logs a
        LEFT JOIN users u ON a.user_id = u.id
        WHERE 1=1
        "#,
    );

    if let Some(action) = params.action.as_deref().filter(|value| *value != "all") {
        builder.push(" AND a.action = ");
        builder.push_bind(parse_action(action)?);
    }

    if let Some(month) = params.month.as_deref().filter(|value| *value != "all") {
        builder.push(" AND EXTRACT(MONTH FROM a.timestamp)::int = ");
        builder.push_bind(parse_filter_number(month, "month")?);
    }

    if let Some(year) = params.year.as_deref().filter(|value| *value != "all") {
        builder.push(" AND EXTRACT(YEAR FROM a.timestamp)::int = ");
        builder.push_bind(parse_filter_number(year, "year")?);
    }

    builder.push(" ORDER BY a.timestamp DESC");

    let logs = builder
        .build_query_as::<ActivityLogEntry>()
        .fetch_all(&db)
        .await?;

    Ok(Json(logs))
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuationRow {
    pub id: i32,
    pub item_name: String,
    pub quantity: i32,
    pub reorder_level: i32,
    pub price: Decimal,
    pub category: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub total_value: Decimal,
}

pub async fn inventory_report(
    State(db): State<Database>,
) -> Result<Json<Vec<InventoryValuationRow>>, ApiError> {
    let items = sqlx::query_as::<_, InventoryValuationRow>(
        r#"
        SELECT
            i.id, i.item_name, i.quantity, i.reorder_level, i.price,
            c.category_name AS category,
            l.location_name AS location,
            s.supplier_name AS supplier,
            (i.quantity * i.price) AS total_value
        FROM inventory_items i
        LEFT JOIN categories c ON i.category_id = c.id
        LEFT JOIN locations l ON i.location_id = l.id
        LEFT JOIN suppliers s ON i.supplier_id = s.id
        ORDER BY i.item_name
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReportParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn transactions_report(
    State(db): State<Database>,
    Query(params): Query<TransactionReportParams>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT
            t.id, t.item_id, t.transaction_type, t.quantity, t.reason, t.user_id,
            t.stock_before, t.stock_after, t.timestamp,
            i.item_name, u.name AS user_name, u.role AS user_role
        FROM stock_transactions t
        JOIN inventory_items i ON t.item_id = i.id
        LEFT JOIN users u ON t.user_id = u.id
        WHERE 1=1
        "#,
    );

    if let Some(start) = params.start_date {
        builder.push(" AND t.timestamp::date >= ");
        builder.push_bind(start);
    }

    if let Some(end) = params.end_date {
        builder.push(" AND t.timestamp::date <= ");
        builder.push_bind(end);
    }

    if let Some(kind) = params.kind.as_deref().filter(|value| *value != "all") {
        let kind = match kind {
            "IN" => TransactionKind::In,
            "OUT" => TransactionKind::Out,
            _ => {
                return Err(ApiError::Validation(
                    "type must be IN, OUT or all".to_string(),
                ))
            }
        };
        builder.push(" AND t.transaction_type = ");
        builder.push_bind(kind);
    }

    builder.push(" ORDER BY t.timestamp DESC");

    let transactions = builder
        .build_query_as::<TransactionRecord>()
        .fetch_all(&db)
        .await?;

    Ok(Json(transactions))
}
