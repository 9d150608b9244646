//! Versioned API routes under `/api/v1`.

pub mod auth;
pub mod products;
pub mod response;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub use response::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse, PagedResponse};

pub const API_PREFIX: &str = "/api/v1";

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/mine", get(products::my_products))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}
