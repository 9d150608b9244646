//! Error response handling for authentication failures.
//!
//! Bodies use the API's failure envelope: `{"message": ..., "errors": [...]}`.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
            AuthError::Configuration { .. }
            | AuthError::Hashing { .. }
            | AuthError::Internal { .. } => {
                tracing::error!(error = %self, "authentication failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "message": message, "errors": [] });
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
