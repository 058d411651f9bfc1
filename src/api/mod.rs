// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::StatusCode,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod handlers;
pub mod responses;

use crate::auth::audit_logger::AuditLogger;
use crate::auth::auth_middleware::AuthState;
use crate::auth::credentials::CredentialVerifier;
use crate::auth::token::TokenAuthority;
use crate::engine::pipeline::CalculationPipeline;
use crate::state::history::HistoryStore;

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async
/// tasks. Note: AppState itself is cloned per request by Axum, so it must
/// stay cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub token_authority: Arc<TokenAuthority>,
    pub credentials: Arc<dyn CredentialVerifier + Send + Sync>,
    pub pipeline: Arc<CalculationPipeline>,
    pub history: Arc<dyn HistoryStore + Send + Sync>,
    pub audit_logger: Arc<AuditLogger>,
    pub config: Arc<Config>,
}

// Re-export Config from config module
pub use crate::config::Config;

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Tracing middleware (tower-http::trace) - request spans, status logging
/// - Request timeout (tower::timeout) - configurable global timeout
/// - Body size limit (tower-http::limit) - configurable max body size
/// - Auth middleware - bearer token verification (protected routes only)
///
/// `/login` and `/health` bypass the auth middleware; every other route
/// requires a valid bearer token.
pub fn create_router(app_state: &AppState, auth_state: Arc<AuthState>) -> Router<AppState> {
    use axum::{extract::State, middleware::Next};

    let mut router = Router::new()
        .route("/login", post(handlers::login_handler))
        .route("/add", post(handlers::add_handler))
        .route("/subtract", post(handlers::subtract_handler))
        .route("/multiply", post(handlers::multiply_handler))
        .route("/divide", post(handlers::divide_handler))
        .route("/power", post(handlers::power_handler))
        .route("/sqrt", post(handlers::sqrt_handler))
        .route("/history", get(handlers::history_handler))
        .route("/health", get(handlers::health_handler));

    // Apply auth middleware to protected routes only
    router = router.route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        |state: State<Arc<AuthState>>, request: Request, next: Next| async move {
            // Skip auth for the public endpoints
            let path = request.uri().path();
            if path == "/login" || path == "/health" {
                return Ok(next.run(request).await);
            }

            crate::auth::auth_middleware::auth_middleware(state, request, next).await
        },
    ));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    // Apply body size limit layer
    router = router.layer(RequestBodyLimitLayer::new(body_limit));

    // Apply timeout layer with HandleErrorLayer to convert timeout errors
    // to HTTP responses. HandleErrorLayer must come BEFORE timeout to catch
    // the timeout error.
    let middleware_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let status = if e.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .into_inner();

    router = router.layer(middleware_stack);

    // Tracing wraps the whole stack so timed-out requests are logged too
    router.layer(TraceLayer::new_for_http())
}
