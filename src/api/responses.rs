// Response types for API endpoints

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::models::CalculationRecord;

/// Success response for the login endpoint
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Success response for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<CalculationRecord>,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            request_id: None,
        }
    }

    /// Create from AbacusError
    pub fn from_abacus_error(err: crate::core::errors::AbacusError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = err.user_message();
        Self {
            status,
            message,
            request_id: None,
        }
    }

    /// Create from AbacusError with request ID
    pub fn from_abacus_error_with_id(
        err: crate::core::errors::AbacusError,
        request_id: String,
    ) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = err.user_message();
        Self {
            status,
            message,
            request_id: Some(request_id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            request_id: self.request_id,
        });

        // Every 401 carries the bearer challenge
        if self.status == StatusCode::UNAUTHORIZED {
            (self.status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

impl From<crate::core::errors::AbacusError> for ApiError {
    fn from(err: crate::core::errors::AbacusError) -> Self {
        ApiError::from_abacus_error(err)
    }
}
