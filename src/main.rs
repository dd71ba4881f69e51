mod database;
mod error;
mod handlers;
mod models;

use axum::{
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::{create_database_pool, Database};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let db = create_database_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    handlers::auth::ensure_admin_account(&db)
        .await
        .expect("Failed to bootstrap admin account");

    log::info!("Database connection successful");

    let app = create_router(db);

    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    log::info!("stockroom API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    Router::new()
        // Auth
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/signup", post(handlers::auth::signup))
        // User administration
        .route("/api/users/pending", get(handlers::users::pending_users))
        .route("/api/users/approved", get(handlers::users::approved_users))
        .route("/api/users/:id/approve", post(handlers::users::approve_user))
        .route("/api/users/:id/reject", delete(handlers::users::reject_user))
        .route("/api/users/:id", delete(handlers::users::delete_user))
        // Inventory
        .route(
            "/api/inventory",
            get(handlers::inventory::items_list).post(handlers::inventory::create_item),
        )
        .route(
            "/api/inventory/:id",
            get(handlers::inventory::item_detail)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        // Categories
        .route(
            "/api/categories",
            get(handlers::catalog::categories_list).post(handlers::catalog::create_category),
        )
        .route(
            "/api/categories/:id",
            put(handlers::catalog::update_category).delete(handlers::catalog::delete_category),
        )
        // Locations
        .route(
            "/api/locations",
            get(handlers::catalog::locations_list).post(handlers::catalog::create_location),
        )
        .route(
            "/api/locations/:id",
            put(handlers::catalog::update_location).delete(handlers::catalog::delete_location),
        )
        // Suppliers
        .route(
            "/api/suppliers",
            get(handlers::catalog::suppliers_list).post(handlers::catalog::create_supplier),
        )
        .route(
            "/api/suppliers/:id",
            put(handlers::catalog::update_supplier).delete(handlers::catalog::delete_supplier),
        )
        // Stock movement ledger
        .route(
            "/api/transactions",
            get(handlers::transactions::transactions_list)
                .post(handlers::transactions::record_transaction),
        )
        // Appointments
        .route(
            "/api/appointments",
            get(handlers::appointments::appointments_list)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            put(handlers::appointments::update_appointment),
        )
        .route(
            "/api/appointments/:id/complete",
            post(handlers::appointments::complete_appointment),
        )
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::appointments::cancel_appointment),
        )
        // Damaged items
        .route("/api/damaged-items", get(handlers::damaged::damaged_items_list))
        .route(
            "/api/damaged-items/:id",
            put(handlers::damaged::update_damaged_item).delete(handlers::damaged::delete_damaged_item),
        )
        // Activity log
        .route(
            "/api/activity-logs",
            get(handlers::activity::activity_logs_list).post(handlers::activity::create_activity_log),
        )
        // Low-stock boundary for the notifier
        .route("/api/low-stock-items", get(handlers::alerts::low_stock_items))
        .route(
            "/api/low-stock-alerts/pending",
            get(handlers::alerts::pending_alerts),
        )
        .route(
            "/api/low-stock-alerts/:item_id",
            post(handlers::alerts::mark_alert_sent).delete(handlers::alerts::clear_alert),
        )
        // Dashboard and reports
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .route(
            "/api/reports/activity-logs",
            get(handlers::reports::activity_report),
        )
        .route("/api/reports/inventory", get(handlers::reports::inventory_report))
        .route(
            "/api/reports/transactions",
            get(handlers::reports::transactions_report),
        )
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found" })),
            )
        })
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // Lazy pool: nothing connects until a handler actually runs a query.
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/stockroom_test")
            .unwrap();
        create_router(db)
    }

    #[tokio::test]
    async fn unknown_routes_return_not_found() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ledger_rows_cannot_be_deleted_over_the_api() {
        // The ledger is append-only: /api/transactions has no DELETE route.
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/transactions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn transaction_payloads_must_be_json() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/transactions")
                    .body(Body::from("itemId=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
