// Request handlers for API endpoints

use axum::{extract::State, http::HeaderMap, response::Json, Extension, Form};
use tracing::{error, info, warn};

use crate::api::responses::{ApiError, HealthResponse, HistoryResponse, TokenResponse};
use crate::api::AppState;
use crate::auth::audit_logger::AuthEvent;
use crate::auth::auth_middleware::{extract_ip_address, extract_user_agent};
use crate::core::constants::token::TOKEN_TYPE;
use crate::core::errors::AbacusError;
use crate::core::models::{
    Calculation, CalculationRecord, CalculationRequest, LoginRequest, SquareRootRequest, Subject,
};

/// Handler for the login endpoint
///
/// POST /login (form-encoded `username` and `password`)
///
/// Request flow:
/// 1. Verify the credential pair through the injected verifier
/// 2. Issue an HMAC-signed bearer token with the configured TTL
/// 3. Return `{access_token, token_type}`
///
/// Failed verification is a uniform 401; the response does not say which
/// half of the pair was wrong.
pub async fn login_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request_id = extract_request_id(&headers);

    let subject = match app_state
        .credentials
        .verify(&request.username, &request.password)
        .await
    {
        Ok(subject) => subject,
        Err(e) => {
            app_state.audit_logger.log_auth_event(
                AuthEvent::LoginFailure {
                    username: request.username.clone(),
                },
                extract_ip_address(&headers).as_deref(),
                extract_user_agent(&headers).as_deref(),
            );
            return Err(ApiError::from_abacus_error_with_id(e, request_id));
        }
    };

    let access_token = app_state.token_authority.issue(&subject).map_err(|e| {
        error!(error = %e, request_id = %request_id, "Token issuance failed");
        ApiError::from_abacus_error_with_id(e, request_id.clone())
    })?;

    app_state.audit_logger.log_auth_event(
        AuthEvent::LoginSuccess {
            username: subject.to_string(),
        },
        extract_ip_address(&headers).as_deref(),
        extract_user_agent(&headers).as_deref(),
    );

    info!(username = %subject, request_id = %request_id, "Token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// POST /add
pub async fn add_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Add {
            a: request.number1,
            b: request.number2,
        },
    )
    .await
}

/// POST /subtract
pub async fn subtract_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Subtract {
            a: request.number1,
            b: request.number2,
        },
    )
    .await
}

/// POST /multiply
pub async fn multiply_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Multiply {
            a: request.number1,
            b: request.number2,
        },
    )
    .await
}

/// POST /divide
pub async fn divide_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Divide {
            a: request.number1,
            b: request.number2,
        },
    )
    .await
}

/// POST /power
pub async fn power_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CalculationRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Power {
            a: request.number1,
            b: request.number2,
        },
    )
    .await
}

/// POST /sqrt
pub async fn sqrt_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
    Json(request): Json<SquareRootRequest>,
) -> Result<Json<CalculationRecord>, ApiError> {
    run_calculation(
        &app_state,
        &headers,
        &subject,
        request.validate(),
        Calculation::Sqrt { a: request.number1 },
    )
    .await
}

/// Handler for the history endpoint
///
/// GET /history
pub async fn history_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Extension(subject): Extension<Subject>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let request_id = extract_request_id(&headers);

    let history = app_state.history.list().await.map_err(|e| {
        error!(error = %e, request_id = %request_id, "History listing failed");
        ApiError::from_abacus_error_with_id(e, request_id.clone())
    })?;

    info!(
        subject = %subject,
        count = history.len(),
        request_id = %request_id,
        "History returned"
    );

    Ok(Json(HistoryResponse { history }))
}

/// Handler for the health endpoint
///
/// GET /health (no auth)
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Validate, execute, and respond for one calculation request
async fn run_calculation(
    app_state: &AppState,
    headers: &HeaderMap,
    subject: &Subject,
    validation: Result<(), AbacusError>,
    calculation: Calculation,
) -> Result<Json<CalculationRecord>, ApiError> {
    let request_id = extract_request_id(headers);
    let operation = calculation.operation();

    if let Err(e) = validation {
        warn!(
            operation = %operation,
            subject = %subject,
            request_id = %request_id,
            error = %e,
            "Calculation request failed validation"
        );
        return Err(ApiError::from_abacus_error_with_id(e, request_id));
    }

    info!(
        operation = %operation,
        subject = %subject,
        request_id = %request_id,
        "Received calculation request"
    );

    app_state
        .pipeline
        .execute(calculation)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_abacus_error_with_id(e, request_id))
}

/// Extract request ID from headers or generate a fresh one
fn extract_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
