use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use catalog_auth::{Authenticated, MaybePrincipal};
use catalog_core::ProductView;
use catalog_storage::ProductFilter;
use serde::Deserialize;

use super::{API_PREFIX, ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse, PagedResponse};
use crate::server::AppState;
use crate::validation::{CreateProductRequest, UpdateProductRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    #[serde(alias = "searchTerm")]
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<ListQuery> for ProductFilter {
    fn from(q: ListQuery) -> Self {
        ProductFilter::new(q.category, q.search, q.page, q.page_size)
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    MaybePrincipal(caller): MaybePrincipal,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<PagedResponse<ProductView>>, ApiError> {
    let filter = ProductFilter::from(query);
    tracing::debug!(
        caller = ?caller.as_ref().map(|p| p.user_id),
        page = filter.page,
        page_size = filter.page_size,
        "listing products"
    );
    let data = state.products.list(&filter).await?;
    Ok(Json(PagedResponse {
        data,
        page: filter.page,
        page_size: filter.page_size,
    }))
}

pub async fn my_products(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<ApiResponse<Vec<ProductView>>, ApiError> {
    let data = state.products.list_mine(&principal).await?;
    Ok(ApiResponse::data(data))
}

pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<ProductView>, ApiError> {
    let view = state.products.get(id).await?;
    Ok(ApiResponse::data(view))
}

pub async fn create_product(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<Response, ApiError> {
    let view = state.products.create(&principal, req).await?;
    let location = format!("{API_PREFIX}/products/{}", view.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::with_message("Product created successfully", view)),
    )
        .into_response())
}

pub async fn update_product(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateProductRequest>,
) -> Result<ApiResponse<ProductView>, ApiError> {
    let view = state.products.update(&principal, id, req).await?;
    Ok(ApiResponse::with_message("Product updated successfully", view))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    state.products.delete(&principal, id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}
