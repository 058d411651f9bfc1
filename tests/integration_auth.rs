// Real integration tests for authentication

#[path = "common/mod.rs"]
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_login_with_valid_credentials_returns_token() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=user&password=pass"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["token_type"], "bearer");
    assert!(!json["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_wrong_password_returns_401() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=user&password=wrong"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let json = body_json(response).await;
    assert_eq!(json["error"], "Incorrect username or password");
}

#[tokio::test]
async fn test_login_with_unknown_username_returns_401() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=admin&password=pass"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_without_token_returns_401() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/add")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"number1":2,"number2":3}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_returns_401() {
    let app = create_test_app();

    let request = authed_json_post("/add", "not.a.token", json!({"number1": 2, "number2": 3}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_wrong_scheme_returns_401() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/add")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::from(r#"{"number1":2,"number2":3}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_foreign_token_returns_401() {
    let app = create_test_app();

    let request = authed_json_post("/add", &foreign_token(), json!({"number1": 2, "number2": 3}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected_by_every_protected_endpoint() {
    let app = create_test_app();
    let token = expired_token();

    let post_endpoints = ["/add", "/subtract", "/multiply", "/divide", "/power"];
    for uri in post_endpoints {
        let request = authed_json_post(uri, &token, json!({"number1": 2, "number2": 3}));
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid or expired token", "uri: {}", uri);
    }

    let request = authed_json_post("/sqrt", &token, json!({"number1": 4}));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = authed_get("/history", &token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_issued_token_accepted_by_every_protected_endpoint() {
    let app = create_test_app();
    let token = login_token(app.clone()).await;

    let post_endpoints = ["/add", "/subtract", "/multiply", "/divide", "/power"];
    for uri in post_endpoints {
        let request = authed_json_post(uri, &token, json!({"number1": 8, "number2": 2}));
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
    }

    let request = authed_json_post("/sqrt", &token, json!({"number1": 4}));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = authed_get("/history", &token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint_bypasses_auth() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
