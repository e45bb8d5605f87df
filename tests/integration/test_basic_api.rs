//! Basic API integration tests

use axum::http::StatusCode;
use axum_test::TestServer;
use diagram_api::config::ApiConfig;
use diagram_api::routes;
use serde_json::Value;

fn server_with(config: &ApiConfig) -> TestServer {
    let app_state = routes::create_app_state(config);
    TestServer::new(routes::build_app(app_state, &config.cors_allowed_origins)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = server_with(&ApiConfig::development());

    for path in ["/health", "/api/v1/health"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "ok");
    }
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let server = server_with(&ApiConfig::development());

    let response = server.get("/api/v1/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc = response.json::<Value>();
    assert!(doc["paths"]["/diagrams"]["post"].is_object());
    assert!(doc["paths"]["/diagrams/{diagram_id}"]["get"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_rate_limit_returns_too_many_requests() {
    let config = ApiConfig {
        rate_limit_per_minute: 2,
        ..ApiConfig::development()
    };
    let server = server_with(&config);

    assert_eq!(server.get("/api/v1/openapi.json").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/api/v1/openapi.json").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/api/v1/openapi.json").await.status_code(),
        StatusCode::TOO_MANY_REQUESTS
    );

    // Health checks sit outside the limited API router
    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);
}
