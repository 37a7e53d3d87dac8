//! End-to-end tests for the HTTP surface, with mock authorization server
//! and CRM endpoints behind a real SQLite database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use leadforge_api::{router, AppContext};
use leadforge_domain::{
    AuthConfig, Config, CrmConfig, DatabaseConfig, ServerConfig, SyncConfig,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    _dir: TempDir,
    app: Router,
    auth_server: MockServer,
    crm_server: MockServer,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir created");
    let auth_server = MockServer::start().await;
    let crm_server = MockServer::start().await;

    let config = Config {
        database: DatabaseConfig {
            path: dir.path().join("test.db").to_string_lossy().into_owned(),
            pool_size: 2,
            credential_fallback_path: None,
        },
        auth: AuthConfig {
            token_url: format!("{}/oauth/token", auth_server.uri()),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
        },
        crm: CrmConfig { base_url: format!("{}/crm/v2", crm_server.uri()), timeout_seconds: 5 },
        sync: SyncConfig { interval_seconds: 600, enabled: false, batch_size: 50 },
        server: ServerConfig::default(),
    };

    let ctx = AppContext::from_config(&config).expect("context wired");
    TestApp { _dir: dir, app: router(ctx), auth_server, crm_server }
}

impl TestApp {
    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Stand up the mock token endpoint and run the operator callback.
    async fn authorize(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3600
            })))
            .mount(&self.auth_server)
            .await;

        let (status, body) =
            self.request("POST", "/api/auth/callback", Some(json!({ "code": "auth-code" }))).await;
        assert_eq!(status, StatusCode::OK, "callback failed: {body}");
    }

    /// Make the mock CRM confirm lead creations with the given id.
    async fn crm_accepts_with_id(&self, id: &str) {
        Mock::given(method("POST"))
            .and(path("/crm/v2/Leads"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": [{ "code": "SUCCESS", "details": { "id": id }, "status": "success" }]
            })))
            .mount(&self.crm_server)
            .await;
    }
}

fn lead_body(email: &str) -> Value {
    json!({
        "name": "Jane Doe",
        "email": email,
        "message": "Need a quote for the CNC-200",
        "productName": "CNC-200"
    })
}

#[tokio::test]
async fn capture_without_tokens_returns_401_but_persists_the_lead() {
    let app = spawn_app().await;

    let (status, body) = app.request("POST", "/api/leads", Some(lead_body("jane@example.com"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["type"], "AuthRequired");
    assert!(body["leadId"].is_string());

    let (status, stats) = app.request("GET", "/api/leads/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["sent"], 0);
}

#[tokio::test]
async fn authorized_capture_delivers_to_the_crm() {
    let app = spawn_app().await;
    app.authorize().await;
    app.crm_accepts_with_id("lead_123").await;

    let (status, body) = app.request("POST", "/api/leads", Some(lead_body("jane@example.com"))).await;

    assert_eq!(status, StatusCode::OK, "capture failed: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["delivered"], true);
    assert_eq!(body["externalLeadId"], "lead_123");

    let lead_id = body["leadId"].as_str().unwrap().to_string();
    let (status, lead) = app.request("GET", &format!("/api/leads/{lead_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lead["sent"], true);
    assert_eq!(lead["external_lead_id"], "lead_123");

    let (_, stats) = app.request("GET", "/api/leads/stats", None).await;
    assert_eq!(stats["sent"], 1);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
async fn invalid_lead_is_rejected_and_not_persisted() {
    let app = spawn_app().await;

    let (status, body) =
        app.request("POST", "/api/leads", Some(json!({ "name": "Jane", "email": "", "message": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "Validation");

    let (_, stats) = app.request("GET", "/api/leads/stats", None).await;
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn crm_outage_keeps_the_lead_pending_with_200() {
    let app = spawn_app().await;
    app.authorize().await;
    Mock::given(method("POST"))
        .and(path("/crm/v2/Leads"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"code":"INTERNAL_ERROR"}"#))
        .mount(&app.crm_server)
        .await;

    let (status, body) = app.request("POST", "/api/leads", Some(lead_body("jane@example.com"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["delivered"], false);

    let (_, stats) = app.request("GET", "/api/leads/stats", None).await;
    assert_eq!(stats["pending"], 1);
}

#[tokio::test]
async fn tick_drains_leads_captured_before_authorization() {
    let app = spawn_app().await;

    // Two leads arrive while the CRM connection is not yet authorized.
    app.request("POST", "/api/leads", Some(lead_body("first@example.com"))).await;
    app.request("POST", "/api/leads", Some(lead_body("second@example.com"))).await;

    app.authorize().await;
    app.crm_accepts_with_id("lead_batch").await;

    let (status, report) = app.request("POST", "/api/sync/tick", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["attempted"], 2);
    assert_eq!(report["delivered"], 2);
    assert_eq!(report["failed"], 0);

    let (_, stats) = app.request("GET", "/api/leads/stats", None).await;
    assert_eq!(stats["pending"], 0);
    assert_eq!(stats["sent"], 2);
}

#[tokio::test]
async fn auth_status_reflects_authorization_and_clear() {
    let app = spawn_app().await;

    let (status, body) = app.request("GET", "/api/auth/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["has_refresh_token"], false);

    app.authorize().await;
    let (_, body) = app.request("GET", "/api/auth/status", None).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["has_refresh_token"], true);
    assert!(body["expires_in_seconds"].as_i64().unwrap() > 3000);

    let (status, _) = app.request("DELETE", "/api/auth/tokens", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.request("GET", "/api/auth/status", None).await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn unknown_lead_id_is_404() {
    let app = spawn_app().await;
    let (status, body) = app
        .request("GET", "/api/leads/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "NotFound");
}

#[tokio::test]
async fn health_reports_database_and_auth_state() {
    let app = spawn_app().await;
    let (status, body) = app.request("GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["authenticated"], false);
}
