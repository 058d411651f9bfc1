// Common test utilities and helpers for all test modules

use abacus::api::{create_router, AppState};
use abacus::auth::audit_logger::AuditLogger;
use abacus::auth::auth_middleware::AuthState;
use abacus::auth::credentials::{CredentialVerifier, StaticCredentials};
use abacus::auth::token::{Claims, TokenAuthority};
use abacus::config::Config;
use abacus::core::models::Subject;
use abacus::engine::pipeline::CalculationPipeline;
use abacus::state::history::{HistoryStore, InMemoryHistoryStore};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tower::ServiceExt;

/// Build a complete test application with the default credential pair
pub fn create_test_app() -> Router {
    let (app, _store) = create_test_app_with_store();
    app
}

/// Build the test application, keeping a handle on its history store
pub fn create_test_app_with_store() -> (Router, Arc<InMemoryHistoryStore>) {
    let config = Arc::new(Config::test_config());

    let token_authority = Arc::new(TokenAuthority::new(
        &config.token_secret,
        config.token_ttl_secs,
    ));
    let credentials: Arc<dyn CredentialVerifier + Send + Sync> = Arc::new(
        StaticCredentials::new(config.auth_username.clone(), config.auth_password.clone()),
    );
    let store = Arc::new(InMemoryHistoryStore::new());
    let history: Arc<dyn HistoryStore + Send + Sync> = store.clone();
    let pipeline = Arc::new(CalculationPipeline::new(history.clone()));
    let audit_logger = Arc::new(AuditLogger::new());

    let auth_state = Arc::new(AuthState {
        token_authority: token_authority.clone(),
        audit_logger: audit_logger.clone(),
    });

    let app_state = AppState {
        token_authority,
        credentials,
        pipeline,
        history,
        audit_logger,
        config,
    };

    let app = create_router(&app_state, auth_state).with_state(app_state);
    (app, store)
}

/// Log in with the default credentials and return the bearer token
pub async fn login_token(app: Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=user&password=pass"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Build an authenticated JSON POST request
pub fn authed_json_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build an authenticated GET request
pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Sign a token with a key the application does not trust
pub fn foreign_token() -> String {
    let authority = TokenAuthority::new(
        &Secret::new("a-key-the-service-never-saw-123".to_string()),
        1800,
    );
    authority.issue(&Subject::new("user")).unwrap()
}

/// Sign an already-expired token with the application's own key
pub fn expired_token() -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let config = Config::test_config();
    let claims = Claims {
        sub: "user".to_string(),
        exp: (Utc::now() - Duration::seconds(60)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.token_secret.expose_secret().as_bytes()),
    )
    .unwrap()
}
