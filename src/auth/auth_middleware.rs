// Axum authentication middleware

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::api::responses::ErrorResponse;
use crate::auth::audit_logger::{AuditLogger, AuthEvent};
use crate::auth::token::TokenAuthority;

/// Authentication state containing all dependencies
#[derive(Clone)]
pub struct AuthState {
    pub token_authority: Arc<TokenAuthority>,
    pub audit_logger: Arc<AuditLogger>,
}

/// Authentication middleware function
///
/// Extracts the bearer token from the `Authorization` header, verifies
/// signature and expiry, and sets the verified subject in request
/// extensions for handlers to use. Missing, malformed, and expired
/// tokens all produce the same 401 response.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip_address = extract_ip_address(request.headers());
    let user_agent = extract_user_agent(request.headers());

    // 1. Extract bearer token from header
    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            auth_state.audit_logger.log_auth_event(
                AuthEvent::TokenRejected {
                    reason: "missing bearer token".to_string(),
                },
                ip_address.as_deref(),
                user_agent.as_deref(),
            );
            return Err(unauthorized_response());
        }
    };

    // 2. Verify signature and expiry
    let subject = match auth_state.token_authority.verify(&token) {
        Ok(subject) => subject,
        Err(e) => {
            auth_state.audit_logger.log_auth_event(
                AuthEvent::TokenRejected {
                    reason: e.user_message(),
                },
                ip_address.as_deref(),
                user_agent.as_deref(),
            );
            return Err(unauthorized_response());
        }
    };

    // 3. Log success
    auth_state.audit_logger.log_auth_event(
        AuthEvent::TokenAccepted {
            subject: subject.to_string(),
        },
        ip_address.as_deref(),
        user_agent.as_deref(),
    );

    // 4. Set extension for handlers
    request.extensions_mut().insert(subject);

    // 5. Continue to next middleware/handler
    Ok(next.run(request).await)
}

/// Build the uniform 401 response for every rejection path
fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ErrorResponse {
            error: "Invalid or expired token".to_string(),
            request_id: None,
        }),
    )
        .into_response()
}

/// Extract bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Extract IP address from request headers
///
/// Checks `X-Forwarded-For` first (for proxied requests), then `X-Real-IP`.
pub(crate) fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .or_else(|| headers.get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract user agent from request headers
pub(crate) fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
