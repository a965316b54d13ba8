//! Storefront - session-cart shop with soft-delete product administration

use anyhow::Result;
use axum::{extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{delete, get, post, put}, Json, Router};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use storefront::service::{self, CartResponse, ProductRequest, ProductResponse};
use storefront::{CartState, CatalogStore, Product, StorefrontError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Carts live only for the lifetime of the process; the map lock is held
/// across each whole read-modify-write so requests for one session never
/// interleave.
#[derive(Clone)]
struct AppState {
    catalog: Arc<CatalogStore>,
    sessions: Arc<Mutex<HashMap<String, CartState>>>,
}

struct ApiError(StorefrontError);

impl From<StorefrontError> for ApiError {
    fn from(err: StorefrontError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match &self.0 {
            StorefrontError::Validation(errors) => {
                serde_json::json!({"status": "error", "message": self.0.to_string(), "errors": errors})
            }
            _ => serde_json::json!({"status": "error", "message": self.0.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let state = AppState { catalog: Arc::new(CatalogStore::new()), sessions: Arc::new(Mutex::new(HashMap::new())) };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/cart/:session", get(view_cart))
        .route("/api/v1/cart/:session/items", post(add_item).put(update_item).delete(remove_item))
        .route("/api/v1/admin/products", get(admin_list_products).post(admin_create_product))
        .route("/api/v1/admin/products/:id", put(admin_update_product).delete(admin_delete_product))
        .route("/api/v1/admin/products/:id/restore", post(admin_restore_product))
        .route("/api/v1/admin/products/:id/force", delete(admin_force_delete_product))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("Storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

async fn create_session() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::CREATED, Json(serde_json::json!({"session_id": Uuid::new_v4()})))
}

async fn list_products(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(service::list_active_products(&s.catalog))
}

async fn view_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartState> {
    let sessions = s.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    Json(sessions.get(&session).cloned().unwrap_or_default())
}

#[derive(Debug, Deserialize)] struct CartItemRequest { product_id: u64, quantity: Option<i64> }

async fn add_item(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<CartItemRequest>) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let mut sessions = s.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let cart = sessions.entry(session).or_default();
    let resp = service::add_to_cart(&s.catalog, cart, r.product_id)?;
    Ok((StatusCode::CREATED, Json(resp)))
}

async fn update_item(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<CartItemRequest>) -> Result<Json<CartResponse>, ApiError> {
    let mut sessions = s.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let cart = sessions.entry(session).or_default();
    let resp = service::update_cart_quantity(cart, r.product_id, r.quantity.unwrap_or(0))?;
    Ok(Json(resp))
}

async fn remove_item(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<CartItemRequest>) -> Result<Json<CartResponse>, ApiError> {
    let mut sessions = s.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let cart = sessions.entry(session).or_default();
    let resp = service::remove_from_cart(cart, r.product_id)?;
    Ok(Json(resp))
}

async fn admin_list_products(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(service::list_all_products(&s.catalog))
}

async fn admin_create_product(State(s): State<AppState>, Json(r): Json<ProductRequest>) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let resp = service::create_product(&s.catalog, r)?;
    Ok((StatusCode::CREATED, Json(resp)))
}

async fn admin_update_product(State(s): State<AppState>, Path(id): Path<u64>, Json(r): Json<ProductRequest>) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(service::update_product(&s.catalog, id, r)?))
}

async fn admin_delete_product(State(s): State<AppState>, Path(id): Path<u64>) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(service::delete_product(&s.catalog, id)?))
}

async fn admin_restore_product(State(s): State<AppState>, Path(id): Path<u64>) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(service::restore_product(&s.catalog, id)?))
}

async fn admin_force_delete_product(State(s): State<AppState>, Path(id): Path<u64>) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(service::force_delete_product(&s.catalog, id)?))
}
