use axum::extract::State;

use super::{ApiError, ApiJson, ApiResponse};
use crate::server::AppState;
use crate::services::AuthResponse;
use crate::validation::{LoginRequest, RegisterRequest};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let response = state.accounts.register(req).await?;
    Ok(ApiResponse::with_message("User registered successfully", response))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let response = state.accounts.login(req).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}
