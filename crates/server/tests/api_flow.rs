use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::ServerState};
use service::auth::{repository::mock::MockUserRepository, CredentialHasher, TokenManager};
use service::company::repository::mock::MockCompanyRepository;
use service::origin::{AllowAll, OriginPolicy};

struct DenyAll;

#[async_trait]
impl OriginPolicy for DenyAll {
    async fn is_allowed(&self, _addr: SocketAddr) -> bool { false }
}

fn app_with(origin: Arc<dyn OriginPolicy>) -> Router { app_with_ttl(origin, Duration::from_secs(3600)) }

fn app_with_ttl(origin: Arc<dyn OriginPolicy>, ttl: Duration) -> Router {
    let tokens = Arc::new(TokenManager::new(Some("api-test-key"), ttl).unwrap());
    let hasher = CredentialHasher::with_params(argon2::Params::new(1024, 1, 1, None).unwrap());
    let state = ServerState::new(
        Arc::new(MockUserRepository::default()),
        Arc::new(MockCompanyRepository::default()),
        tokens,
        hasher,
        origin,
    );
    routes::build_router(state, CorsLayer::very_permissive(), Duration::from_secs(5))
        .layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40000))))
}

fn app() -> Router { app_with(Arc::new(AllowAll)) }

fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, headers, body)
}

async fn register_and_login(app: &Router, name: &str, password: &str) -> String {
    let creds = json!({ "name": name, "password": password });
    let (status, _, _) = send(app, request("POST", "/v1/users", Some(creds.clone()), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(app, request("POST", "/v1/users/login", Some(creds), None)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn acme() -> Value {
    json!({
        "name": "Acme",
        "code": 12345,
        "country": "Cyprus",
        "website": "https://acme.example",
        "phone": "+35799123456"
    })
}

#[tokio::test]
async fn health_is_public() {
    let (status, _, body) = send(&app(), request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn register_then_login_returns_token_and_expiry() {
    let app = app();
    let creds = json!({ "name": "bill", "password": "password" });
    let (status, _, reg) = send(&app, request("POST", "/v1/users", Some(creds.clone()), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reg["name"], "bill");

    let (status, headers, login) = send(&app, request("POST", "/v1/users/login", Some(creds), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user_id"], reg["id"]);
    assert!(login["token"].as_str().is_some_and(|t| t.split('.').count() == 3));
    assert!(login["expires_at"].as_i64().is_some());
    assert!(headers.get("x-expires-after").is_some());
}

#[tokio::test]
async fn login_with_unrepresentable_expiry_is_server_error() {
    // fits the token's epoch-seconds claim but not chrono's date range
    let app = app_with_ttl(Arc::new(AllowAll), Duration::from_secs(i64::MAX as u64 / 100));
    let creds = json!({ "name": "bill", "password": "password" });
    let (status, _, _) = send(&app, request("POST", "/v1/users", Some(creds.clone()), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(&app, request("POST", "/v1/users/login", Some(creds), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    let creds = json!({ "name": "bill", "password": "password" });
    send(&app, request("POST", "/v1/users", Some(creds.clone()), None)).await;
    let (status, _, _) = send(&app, request("POST", "/v1/users", Some(creds), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app();
    register_and_login(&app, "bill", "password").await;

    let wrong_pw = json!({ "name": "bill", "password": "nope" });
    let unknown = json!({ "name": "nobody", "password": "password" });
    let (s1, _, b1) = send(&app, request("POST", "/v1/users/login", Some(wrong_pw), None)).await;
    let (s2, _, b2) = send(&app, request("POST", "/v1/users/login", Some(unknown), None)).await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn company_lifecycle() {
    let app = app();
    let token = register_and_login(&app, "bill", "password").await;

    let (status, _, created) = send(&app, request("POST", "/v1/companies", Some(acme()), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Acme");
    let id = created["id"].as_i64().unwrap();

    let (status, _, got) = send(&app, request("GET", &format!("/v1/companies/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["code"], 12345);
    assert_eq!(got["website"], "https://acme.example");
    assert_eq!(got["phone"], "+35799123456");
    let country_id = got["country_id"].as_i64().unwrap();

    let (status, _, list) = send(&app, request("GET", "/v1/companies", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let update = json!({
        "name": "Acme Group",
        "code": 54321,
        "country_id": country_id,
        "website": "https://group.acme.example",
        "phone": "+35799000000"
    });
    let (status, _, updated) =
        send(&app, request("PUT", &format!("/v1/companies/{id}"), Some(update), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Acme Group");
    assert_eq!(updated["code"], 54321);

    let (status, _, _) = send(&app, request("DELETE", &format!("/v1/companies/{id}"), None, Some(&token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, request("GET", &format!("/v1/companies/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send(&app, request("DELETE", &format!("/v1/companies/{id}"), None, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_require_a_token() {
    let app = app();
    let (status, _, body) = send(&app, request("POST", "/v1/companies", Some(acme()), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _, _) = send(&app, request("PUT", "/v1/companies/1", Some(acme()), Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = send(&app, request("DELETE", "/v1/companies/1", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gate_runs_before_body_is_decoded() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/v1/companies")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_company_is_bad_request() {
    let app = app();
    let token = register_and_login(&app, "bill", "password").await;
    let mut bad = acme();
    bad["phone"] = json!("99123456");
    let (status, _, body) = send(&app, request("POST", "/v1/companies", Some(bad), Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("E.164")));

    let (status, _, _) = send(&app, request("GET", "/v1/companies/abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_fields_are_bad_request() {
    let app = app();
    let token = register_and_login(&app, "bill", "password").await;
    let mut long_name = acme();
    long_name["name"] = json!("A".repeat(256));
    let (status, _, _) = send(&app, request("POST", "/v1/companies", Some(long_name), Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut long_country = acme();
    long_country["country"] = json!("a".repeat(129));
    let (status, _, _) = send(&app, request("POST", "/v1/companies", Some(long_country), Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn denied_origin_is_forbidden() {
    let app = app_with(Arc::new(DenyAll));
    let token = register_and_login(&app, "bill", "password").await;

    let (status, _, _) = send(&app, request("POST", "/v1/companies", Some(acme()), Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, _) = send(&app, request("DELETE", "/v1/companies/1", None, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // reads are not origin-gated
    let (status, _, _) = send(&app, request("GET", "/v1/companies", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn metrics_export_gate_counters() {
    let app = app();
    send(&app, request("POST", "/v1/companies", Some(acme()), None)).await;
    let resp = app.clone().oneshot(request("GET", "/metrics", None, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(text.contains("registry_auth_gate_total"));
}
