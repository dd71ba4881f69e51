use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{Category, CategoryPayload, Location, LocationPayload, Supplier, SupplierPayload},
};

// Categories

pub async fn categories_list(State(db): State<Database>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, category_name, description, date_added, created_at FROM categories ORDER BY category_name",
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(categories))
}

pub async fn create_category(
    State(db): State<Database>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.category_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Category name is required".to_string()));
    }

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM categories WHERE category_name = $1")
            .bind(name)
            .fetch_optional(&db)
            .await?;

    if existing.is_some() {
        return Err(ApiError::Validation("Category already exists".to_string()));
    }

    let category_id: i32 = sqlx::query_scalar(
        "INSERT INTO categories (category_name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(payload.description.as_deref().unwrap_or(""))
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({
        "id": category_id,
        "message": "Category added successfully"
    })))
}

pub async fn update_category(
    State(db): State<Database>,
    Path(category_id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.category_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Category name is required".to_string()));
    }

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM categories WHERE category_name = $1 AND id != $2")
            .bind(name)
            .bind(category_id)
            .fetch_optional(&db)
            .await?;

    if existing.is_some() {
        return Err(ApiError::Validation(
            "Category name already exists".to_string(),
        ));
    }

    let result =
        sqlx::query("UPDATE categories SET category_name = $1, description = $2 WHERE id = $3")
            .bind(name)
            .bind(payload.description.as_deref().unwrap_or(""))
            .bind(category_id)
            .execute(&db)
            .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Category"));
    }

    Ok(Json(json!({ "message": "Category updated successfully" })))
}

pub async fn delete_category(
    State(db): State<Database>,
    Path(category_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let in_use: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&db)
            .await?;

    if in_use > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete category. {} item(s) are using this category.",
            in_use
        )));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Category"));
    }

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

// Locations

pub async fn locations_list(State(db): State<Database>) -> Result<Json<Vec<Location>>, ApiError> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT id, location_name, description, date_added, created_at FROM locations ORDER BY location_name",
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(locations))
}

pub async fn create_location(
    State(db): State<Database>,
    Json(payload): Json<LocationPayload>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.location_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Location name is required".to_string()));
    }

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM locations WHERE location_name = $1")
            .bind(name)
            .fetch_optional(&db)
            .await?;

    if existing.is_some() {
        return Err(ApiError::Validation("Location already exists".to_string()));
    }

    let location_id: i32 = sqlx::query_scalar(
        "INSERT INTO locations (location_name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(payload.description.as_deref().unwrap_or(""))
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({
        "id": location_id,
        "message": "Location added successfully"
    })))
}

pub async fn update_location(
    State(db): State<Database>,
    Path(location_id): Path<i32>,
    Json(payload): Json<LocationPayload>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.location_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Location name is required".to_string()));
    }

    let existing: Option<i32> =
        sqlx::query_scalar("SELECT id FROM locations WHERE location_name = $1 AND id != $2")
            .bind(name)
            .bind(location_id)
            .fetch_optional(&db)
            .await?;

    if existing.is_some() {
        return Err(ApiError::Validation(
            "Location name already exists".to_string(),
        ));
    }

    let result =
        sqlx::query("UPDATE locations SET location_name = $1, description = $2 WHERE id = $3")
            .bind(name)
            .bind(payload.description.as_deref().unwrap_or(""))
            .bind(location_id)
            .execute(&db)
            .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Location"));
    }

    Ok(Json(json!({ "message": "Location updated successfully" })))
}

pub async fn delete_location(
    State(db): State<Database>,
    Path(location_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let in_use: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(&db)
            .await?;

    if in_use > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete location. {} item(s) are using this location.",
            in_use
        )));
    }

    let result = sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(location_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Location"));
    }

    Ok(Json(json!({ "message": "Location deleted successfully" })))
}

// Suppliers

pub async fn suppliers_list(State(db): State<Database>) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = sqlx::query_as::<_, Supplier>(
        r#"
        SELECT id, supplier_name, contact_person, contact_email, contact_phone,
               address, is_active, date_added, created_at
        FROM suppliers
        ORDER BY supplier_name
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(suppliers))
}

pub async fn create_supplier(
    State(db): State<Database>,
    Json(payload): Json<SupplierPayload>,
) -> Result<Json<Value>, ApiError> {
    let supplier_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO suppliers
            (supplier_name, contact_person, contact_email, contact_phone, address, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&payload.supplier_name)
    .bind(&payload.contact_person)
    .bind(&payload.contact_email)
    .bind(&payload.contact_phone)
    .bind(&payload.address)
    .bind(payload.is_active)
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({
        "id": supplier_id,
        "message": "Supplier added successfully"
    })))
}

pub async fn update_supplier(
    State(db): State<Database>,
    Path(supplier_id): Path<i32>,
    Json(payload): Json<SupplierPayload>,
) -> Result<Json<Value>, ApiError> {
    let result = sqlx::query(
        r#"
        UPDATE suppliers
        SET supplier_name = $1, contact_person = $2, contact_email = $3,
            contact_phone = $4, address = $5, is_active = $6
        WHERE id = $7
        "#,
    )
    .bind(&payload.supplier_name)
    .bind(&payload.contact_person)
    .bind(&payload.contact_email)
    .bind(&payload.contact_phone)
    .bind(&payload.address)
    .bind(payload.is_active)
    .bind(supplier_id)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Supplier"));
    }

    Ok(Json(json!({ "message": "Supplier updated successfully" })))
}

/// Items referencing the supplier keep their rows; the FK nulls their
/// supplier out. The response reports how many were affected.
pub async fn delete_supplier(
    State(db): State<Database>,
    Path(supplier_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let items_affected: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE supplier_id = $1")
            .bind(supplier_id)
            .fetch_one(&db)
            .await?;

    let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
        .bind(supplier_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Supplier"));
    }

    Ok(Json(json!({
        "message": "Supplier deleted successfully",
        "itemsAffected": items_affected
    })))
}
