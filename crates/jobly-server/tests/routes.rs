//! Router behaviour that needs no database: authorization, payload and
//! path/query validation, error envelopes. The pool points at a closed port
//! and is only dialled by the store-failure test.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use jobly_server::auth::StaticTokens;
use jobly_server::routes::router;
use jobly_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: &str = "admin-token";
const USER: &str = "user-token";

fn app() -> Router {
    let pool = jobly::create_pool_with_config("postgres://jobly@127.0.0.1:1/jobly_test", 1)
        .expect("pool");
    let tokens = StaticTokens::new()
        .with_token(ADMIN, "admin", true)
        .with_token(USER, "u1", false);
    router(AppState::new(pool, tokens))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let res = app().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn new_company() -> String {
    json!({
        "handle": "new",
        "name": "New",
        "description": "New Description",
        "numEmployees": 10,
        "logoUrl": "http://new.img"
    })
    .to_string()
}

#[tokio::test]
async fn healthz_is_ok() {
    let (status, body) = send(request("GET", "/healthz", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn mutations_without_token_are_unauthorized() {
    let cases = [
        ("POST", "/companies", Some(new_company())),
        ("PATCH", "/companies/c1", Some(r#"{"name":"C1-new"}"#.to_string())),
        ("DELETE", "/companies/c1", None),
        ("POST", "/jobs", Some(r#"{"title":"J","company_handle":"c1"}"#.to_string())),
        ("PATCH", "/jobs/1", Some(r#"{"title":"J"}"#.to_string())),
        ("DELETE", "/jobs/1", None),
    ];
    for (method, uri, body) in cases {
        let (status, body) = send(request(method, uri, None, body.as_deref())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"]["status"], 401);
    }
}

#[tokio::test]
async fn non_admin_token_is_unauthorized() {
    let (status, _) = send(request("POST", "/companies", Some(USER), Some(new_company().as_str()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(request("DELETE", "/jobs/1", Some(USER), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(request("DELETE", "/jobs/1", Some("forged"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (status, body) = send(request("POST", "/companies", Some(ADMIN), Some("{not json"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn wrong_field_type_is_bad_request() {
    let payload = r#"{"title":"J","salary":"lots","company_handle":"c1"}"#;
    let (status, _) = send(request("POST", "/jobs", Some(ADMIN), Some(payload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_update_keys_are_bad_request() {
    let (status, _) = send(request(
        "PATCH",
        "/companies/c1",
        Some(ADMIN),
        Some(r#"{"handle":"c1-new"}"#),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(request(
        "PATCH",
        "/jobs/1",
        Some(ADMIN),
        Some(r#"{"company_handle":"c2"}"#),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_values_are_bad_request() {
    let company = json!({
        "handle": "new",
        "name": "New",
        "description": "d",
        "numEmployees": -1,
        "logoUrl": "not-a-url"
    })
    .to_string();
    let (status, body) = send(request("POST", "/companies", Some(ADMIN), Some(company.as_str()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("numEmployees"), "{message}");
    assert!(message.contains("logoUrl"), "{message}");

    let job = r#"{"title":"J","equity":1.5,"company_handle":"c1"}"#;
    let (status, _) = send(request("POST", "/jobs", Some(ADMIN), Some(job))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparsable_job_id_is_bad_request() {
    let (status, body) = send(request("GET", "/jobs/abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);

    let (status, _) = send(request("DELETE", "/jobs/abc", Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_query_is_bad_request() {
    let (status, _) = send(request("GET", "/companies?min_employees=many", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(request("GET", "/jobs?hasEquity=maybe", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_failure_is_masked() {
    let (status, body) = send(request("GET", "/companies", None, None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal Server Error");
    assert_eq!(body["error"]["status"], 500);
}
