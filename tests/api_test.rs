//! HTTP tests for the router: authentication, the host gate and event routes.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::TestContext;
use convenly::infra::{EventRepository, UnitOfWork};

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session-id={}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register and log in through the API, returning the session token.
async fn sign_up(app: &Router, email: &str) -> String {
    let credentials = json!({ "name": "Test User", "email": email, "password": "Secret1!" });
    let response = send(app, Method::POST, "/api/register", None, Some(credentials)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = json!({ "email": email, "password": "Secret1!" });
    let response = send(app, Method::POST, "/api/login", None, Some(login)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie")
        .to_string();
    assert!(cookie.contains("HttpOnly"));

    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("session-id="))
        .expect("session-id pair")
        .to_string()
}

async fn sign_up_host(app: &Router, email: &str) -> String {
    let token = sign_up(app, email).await;
    let response = send(app, Method::POST, "/api/become-host", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["role"], "host");
    token
}

fn new_event(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Bring friends",
        "date": "2025-06-01T18:00:00Z",
        "latitude": 52.23,
        "longitude": 21.01,
        "fee": 0.0,
        "tags": ["Music"]
    })
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let response = send(&ctx.router(), Method::GET, "/api/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["database"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let ctx = TestContext::new().await;
    let app = ctx.router();

    for (method, uri) in [
        (Method::GET, "/api/me"),
        (Method::POST, "/api/become-host"),
        (Method::GET, "/api/my-events"),
        (Method::POST, "/api/events/add"),
    ] {
        let response = send(&app, method, uri, None, Some(new_event("x"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = send(&app, Method::GET, "/api/me", Some("forged-token"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = sign_up(&app, "ada@example.com").await;

    let request = Request::builder()
        .uri("/api/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["email"], "ada@example.com");
}

#[tokio::test]
async fn test_attendee_cannot_create_event() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = sign_up(&app, "ada@example.com").await;

    let response = send(&app, Method::POST, "/api/events/add", Some(&token), Some(new_event("Nope"))).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(ctx.uow.events().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_host_creates_and_attendee_registers() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let host = sign_up_host(&app, "host@example.com").await;
    let guest = sign_up(&app, "guest@example.com").await;

    let response = send(&app, Method::POST, "/api/events/add", Some(&host), Some(new_event("Jam"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = json_body(response).await;
    let id = event["id"].as_str().unwrap().to_string();
    assert_eq!(event["tags"], json!(["Music"]));

    let register = format!("/api/events/{}/register", id);
    let response = send(&app, Method::POST, &register, Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::POST, &register, Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, Method::GET, &format!("/api/events/{}", id), Some(&guest), None).await;
    let detail = json_body(response).await;
    assert_eq!(detail["name"], "Jam");
    assert_eq!(detail["attendees_count"], 1);
    assert_eq!(detail["user_registered"], true);

    let response = send(&app, Method::GET, "/api/my-events", Some(&guest), None).await;
    let mine = json_body(response).await;
    assert_eq!(mine["attending"].as_array().unwrap().len(), 1);
    assert!(mine["hosting"].as_array().unwrap().is_empty());

    let unregister = format!("/api/events/{}/unregister", id);
    for _ in 0..2 {
        let response = send(&app, Method::DELETE, &unregister, Some(&guest), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_tag_rejects_event() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let host = sign_up_host(&app, "host@example.com").await;

    let mut body = new_event("Odd");
    body["tags"] = json!(["Music", "Underwater Basket Weaving"]);
    let response = send(&app, Method::POST, "/api/events/add", Some(&host), Some(body)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ctx.uow.events().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_event_ownership() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let owner = sign_up_host(&app, "owner@example.com").await;
    let rival = sign_up_host(&app, "rival@example.com").await;
    let guest = sign_up(&app, "guest@example.com").await;

    let response = send(&app, Method::POST, "/api/events/add", Some(&owner), Some(new_event("Mine"))).await;
    let id = json_body(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/events/{}", id);

    let missing = format!("/api/events/{}", uuid::Uuid::new_v4());
    let response = send(&app, Method::DELETE, &missing, Some(&owner), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, &uri, Some(&rival), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, Some(&guest), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_listing_filters() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let host = sign_up_host(&app, "host@example.com").await;

    for (name, date, fee) in [
        ("January", "2025-01-15T12:00:00Z", 0.0),
        ("February", "2025-02-01T23:00:00Z", 10.0),
        ("March", "2025-03-15T12:00:00Z", 100.0),
    ] {
        let mut body = new_event(name);
        body["date"] = json!(date);
        body["fee"] = json!(fee);
        let response = send(&app, Method::POST, "/api/events/add", Some(&host), Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let list = |uri: &'static str| {
        let app = app.clone();
        async move {
            let response = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            json_body(response)
                .await
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["name"].as_str().unwrap().to_string())
                .collect::<Vec<_>>()
        }
    };

    assert_eq!(list("/api/events").await, vec!["January", "February", "March"]);
    assert_eq!(list("/api/events?date_from=2025-02-01").await, vec!["February", "March"]);
    // A bare upper date covers the whole day
    assert_eq!(list("/api/events?date_to=2025-02-01").await, vec!["January", "February"]);
    assert_eq!(list("/api/events?max_fee=0").await, vec!["January"]);
    assert_eq!(list("/api/events?tags=Music,Tech&page=2&page_size=2").await, vec!["March"]);

    for bad in [
        "/api/events?date_from=yesterday",
        "/api/events?min_fee=cheap",
        "/api/events?page=0",
        "/api/events?page_size=101",
        "/api/events?page=18446744073709551615&page_size=100",
        "/api/events?page=100000000000000000&page_size=100",
    ] {
        let response = send(&app, Method::GET, bad, None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", bad);
    }
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = sign_up(&app, "ada@example.com").await;

    let response = send(&app, Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = json_body(response).await;
    assert_eq!(me["role"], "attendee");
    assert!(me.get("password_hash").is_none());

    let response = send(&app, Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let wrong = json!({ "email": "ada@example.com", "password": "Wrong1!!" });
    let response = send(&app, Method::POST, "/api/login", None, Some(wrong)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_register_duplicate_and_list_tags() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    sign_up(&app, "ada@example.com").await;

    let again = json!({ "name": "Ada", "email": " ADA@example.com ", "password": "Secret1!" });
    let response = send(&app, Method::POST, "/api/register", None, Some(again)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, Method::GET, "/api/tags", None, None).await;
    let tags = json_body(response).await;
    assert_eq!(tags.as_array().unwrap().len(), convenly::config::DEFAULT_TAGS.len());
}
