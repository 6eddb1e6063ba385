//! Product catalog: SQLite storage and the list/create handlers.
//!
//! Both endpoints require a valid token; the catalog is not public.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Json as JsonExtractor,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{error, info};
use uuid::Uuid;
use wares_core::{CreateProductRequest, ErrorBody, Product};

use crate::auth::AuthUser;
use crate::state::AppState;

/// Product catalog errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product name is empty")]
    EmptyName,
    #[error("Price is negative")]
    NegativePrice,
    #[error("Database error")]
    Database,
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ProductError::EmptyName => (
                StatusCode::BAD_REQUEST,
                "empty_name",
                "Product name must not be empty",
            ),
            ProductError::NegativePrice => (
                StatusCode::BAD_REQUEST,
                "negative_price",
                "Product price must not be negative",
            ),
            ProductError::Database => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// SQLite-backed product storage
#[derive(Debug, Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products, newest first
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query(
            "SELECT id, name, price_cents, created_at FROM products ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list products: {}", e);
            ProductError::Database
        })?;

        rows.into_iter().map(row_to_product).collect()
    }

    pub async fn insert_product(
        &self,
        name: String,
        price_cents: i64,
    ) -> Result<Product, ProductError> {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name,
            price_cents,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO products (id, name, price_cents, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert product: {}", e);
            ProductError::Database
        })?;

        Ok(product)
    }
}

fn row_to_product(row: SqliteRow) -> Result<Product, ProductError> {
    let created_at: String = row.get("created_at");
    let created_at = created_at.parse::<DateTime<Utc>>().map_err(|e| {
        error!("Corrupt created_at in products table: {}", e);
        ProductError::Database
    })?;

    Ok(Product {
        id: row.get("id"),
        name: row.get("name"),
        price_cents: row.get("price_cents"),
        created_at,
    })
}

/// List the product catalog
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products, newest first", body = [Product]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Product>>, ProductError> {
    let products = state.product_store.list_products().await?;
    Ok(Json(products))
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Empty name or negative price", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    JsonExtractor(request): JsonExtractor<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ProductError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ProductError::EmptyName);
    }
    if request.price_cents < 0 {
        return Err(ProductError::NegativePrice);
    }

    let product = state
        .product_store
        .insert_product(name, request.price_cents)
        .await?;

    info!("Product {} created by {}", product.name, user.email);
    Ok((StatusCode::CREATED, Json(product)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn create_test_store() -> ProductStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ProductStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_nothing() {
        let store = create_test_store().await;
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_then_list_newest_first() {
        let store = create_test_store().await;

        store
            .insert_product("Widget".to_string(), 1299)
            .await
            .unwrap();
        // Timestamps order the listing, so the second insert must be later.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .insert_product("Gadget".to_string(), 700)
            .await
            .unwrap();

        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Gadget");
        assert_eq!(products[1].name, "Widget");
    }
}
