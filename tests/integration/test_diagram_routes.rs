//! Diagram save/read endpoint integration tests

use axum::http::StatusCode;
use axum_test::TestServer;
use diagram_api::config::ApiConfig;
use diagram_api::models::{Diagram, DiagramSummary, SaveDiagramResponse};
use diagram_api::routes::{self, AppState};
use serde_json::Value;

const GRAPH: &str = r#"{"vertices":[{"id":1,"name":"a"}],"edges":[]}"#;

struct Harness {
    server: TestServer,
    owner_token: String,
    other_token: String,
}

async fn setup() -> Harness {
    let config = ApiConfig::development();
    let state: AppState = routes::create_app_state(&config);

    let owner_token = routes::open_session(&state, 7, "owner")
        .await
        .unwrap()
        .access_token;
    let other_token = routes::open_session(&state, 9, "other")
        .await
        .unwrap()
        .access_token;

    let app = routes::build_app(state, &config.cors_allowed_origins);
    Harness {
        server: TestServer::new(app).unwrap(),
        owner_token,
        other_token,
    }
}

async fn create_diagram(h: &Harness, name: &str, public: Option<&str>) -> SaveDiagramResponse {
    let mut form = vec![("name", name), ("graph_json", GRAPH)];
    if let Some(public) = public {
        form.push(("public", public));
    }

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&form)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<SaveDiagramResponse>()
}

async fn fetch(h: &Harness, token: &str, id: i64) -> axum_test::TestResponse {
    h.server
        .get(&format!("/api/v1/diagrams/{}", id))
        .authorization_bearer(token)
        .await
}

#[tokio::test]
async fn test_create_without_id_creates_private_diagram_owned_by_caller() {
    let h = setup().await;

    let saved = create_diagram(&h, "Flow A", None).await;
    assert!(saved.created);

    let diagram = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert_eq!(diagram.owner_id, 7);
    assert_eq!(diagram.name, "Flow A");
    assert!(!diagram.is_public);
    assert_eq!(diagram.graph_json.as_str(), GRAPH);
}

#[tokio::test]
async fn test_blank_diagram_id_creates_new_diagram() {
    let h = setup().await;
    let first = create_diagram(&h, "Flow A", None).await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("diagram_id", "  "), ("name", "Flow B"), ("graph_json", GRAPH)])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let saved = response.json::<SaveDiagramResponse>();
    assert!(saved.created);
    assert_ne!(saved.id, first.id);
}

#[tokio::test]
async fn test_missing_name_is_bad_request_and_writes_nothing() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("name", ""), ("graph_json", GRAPH)])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["status"], 400);

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("name", "Flow A")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let listed = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .await
        .json::<Vec<DiagramSummary>>();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_owner_update_changes_name_and_keeps_owner() {
    let h = setup().await;
    let saved = create_diagram(&h, "Flow A", None).await;
    let id = saved.id.to_string();

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[
            ("diagram_id", id.as_str()),
            ("name", "Flow A v2"),
            ("graph_json", GRAPH),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<SaveDiagramResponse>();
    assert_eq!(updated.id, saved.id);
    assert!(!updated.created);

    let diagram = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert_eq!(diagram.name, "Flow A v2");
    assert_eq!(diagram.owner_id, 7);
}

#[tokio::test]
async fn test_non_owner_update_is_unauthorized_and_diagram_unchanged() {
    let h = setup().await;
    let saved = create_diagram(&h, "Flow A", Some("1")).await;
    let before = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    let id = saved.id.to_string();

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.other_token)
        .form(&[
            ("diagram_id", id.as_str()),
            ("name", "hijacked"),
            ("graph_json", "{}"),
            ("public", "0"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let after = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_update_of_nonexistent_diagram_is_unauthorized() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("diagram_id", "4242"), ("name", "Flow A"), ("graph_json", GRAPH)])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let listed = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .await
        .json::<Vec<DiagramSummary>>();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_public_flag_is_stored_and_reset_when_omitted_on_update() {
    let h = setup().await;
    let saved = create_diagram(&h, "Flow A", Some("true")).await;

    let diagram = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert!(diagram.is_public);

    let id = saved.id.to_string();
    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("diagram_id", id.as_str()), ("name", "Flow A"), ("graph_json", GRAPH)])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let diagram = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert!(!diagram.is_public);
}

#[tokio::test]
async fn test_malformed_fields_are_bad_request() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("diagram_id", "abc"), ("name", "Flow A"), ("graph_json", GRAPH)])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("name", "Flow A"), ("graph_json", GRAPH), ("public", "maybe")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_undecodable_form_is_json_bad_request() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("name", "a"), ("name", "b"), ("graph_json", "x")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], 400);

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .text("name=a&graph_json=x")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], 400);

    let listed = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .await
        .json::<Vec<DiagramSummary>>();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_owner_fields_in_form_are_ignored() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[
            ("name", "Flow A"),
            ("graph_json", GRAPH),
            ("owner_id", "9"),
            ("user_id", "9"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let saved = response.json::<SaveDiagramResponse>();

    let diagram = fetch(&h, &h.owner_token, saved.id).await.json::<Diagram>();
    assert_eq!(diagram.owner_id, 7);

    let theirs = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.other_token)
        .await
        .json::<Vec<DiagramSummary>>();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn test_nul_in_graph_is_bad_request() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .form(&[("name", "Flow A"), ("graph_json", "{\"a\":\"\0\"}")])
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], 400);
}

#[tokio::test]
async fn test_unauthenticated_save_is_rejected() {
    let h = setup().await;

    let response = h
        .server
        .post("/api/v1/diagrams")
        .form(&[("name", "Flow A"), ("graph_json", GRAPH)])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_read_visibility() {
    let h = setup().await;
    let private = create_diagram(&h, "Private", None).await;
    let public = create_diagram(&h, "Public", Some("on")).await;

    assert_eq!(
        fetch(&h, &h.other_token, private.id).await.status_code(),
        StatusCode::UNAUTHORIZED
    );
    let diagram = fetch(&h, &h.other_token, public.id).await.json::<Diagram>();
    assert_eq!(diagram.name, "Public");
    assert_eq!(
        fetch(&h, &h.owner_token, 9999).await.status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_list_returns_only_callers_diagrams() {
    let h = setup().await;
    create_diagram(&h, "Mine 1", None).await;
    create_diagram(&h, "Mine 2", Some("1")).await;

    let mine = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.owner_token)
        .await
        .json::<Vec<DiagramSummary>>();
    let names: Vec<&str> = mine.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Mine 1", "Mine 2"]);

    let theirs = h
        .server
        .get("/api/v1/diagrams")
        .authorization_bearer(&h.other_token)
        .await
        .json::<Vec<DiagramSummary>>();
    assert!(theirs.is_empty());
}
