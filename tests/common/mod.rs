#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use monji_web::config::AppConfig;
use monji_web::router::{app, AppState};

pub const GOOD_TOKEN: &str = "good-token";

/// One request the web tier made to the fake Monji API
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: String,
    pub authorization: Option<String>,
}

/// In-process stand-in for the Monji API on an ephemeral port
#[derive(Clone)]
pub struct StubBackend {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubBackend {
    pub async fn spawn() -> Result<Self> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().fallback(stub_handler).with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind stub backend")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            calls,
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Everything except reads
    pub fn writes(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method != Method::GET).collect()
    }
}

pub struct TestContext {
    pub app: Router,
    pub backend: StubBackend,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("monji_web=debug"))
        .with_test_writer()
        .try_init();
}

pub async fn setup() -> Result<TestContext> {
    setup_profile(AppConfig::development()).await
}

/// Run the relay with a given profile, pointed at a fresh stub backend
pub async fn setup_profile(mut config: AppConfig) -> Result<TestContext> {
    init_tracing();

    let backend = StubBackend::spawn().await?;
    config.backend.base_url = backend.base_url.clone();
    config.server.enable_request_logging = false;

    let state = AppState::new(config)?;
    Ok(TestContext {
        app: app(state),
        backend,
    })
}

/// Relay whose backend base URL points at a port nothing listens on
pub async fn setup_unreachable() -> Result<Router> {
    init_tracing();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let mut config = AppConfig::development();
    config.backend.base_url = format!("http://{}", addr);
    config.server.enable_request_logging = false;
    Ok(app(AppState::new(config)?))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(header::SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }
}

async fn send(app: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(TestResponse {
        status,
        headers,
        body: body.to_vec(),
    })
}

fn with_session(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::COOKIE, format!("theme=dark; token={}", token)),
        None => builder,
    }
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> Result<TestResponse> {
    let request = with_session(Request::builder().method(Method::GET).uri(path), token).body(Body::empty())?;
    send(app, request).await
}

pub async fn post_form(app: &Router, path: &str, token: Option<&str>, form: &str) -> Result<TestResponse> {
    let request = with_session(Request::builder().method(Method::POST).uri(path), token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))?;
    send(app, request).await
}

/// Canned Monji API. Any path segment named `broken` fails with a 500.
async fn stub_handler(
    State(calls): State<Arc<Mutex<Vec<RecordedCall>>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
        authorization: authorization.clone(),
    });

    if method == Method::POST && path == "/login" {
        return stub_login(&body);
    }

    let expected = format!("Bearer {}", GOOD_TOKEN);
    if authorization.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid token" }))).into_response();
    }

    if path.split('/').any(|segment| segment == "broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))).into_response();
    }

    if method != Method::GET {
        return (StatusCode::OK, Json(json!({ "message": "ok" }))).into_response();
    }

    match fixture(&path) {
        Some(value) => (StatusCode::OK, Json(value)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

fn stub_login(body: &str) -> Response {
    let credentials: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    if credentials["email"] == "ada@example.com" && credentials["password"] == "secret" {
        (StatusCode::OK, Json(json!({ "token": GOOD_TOKEN }))).into_response()
    } else if credentials["email"] == "mallory@example.com" {
        // A token that would smuggle its own cookie attributes
        (StatusCode::OK, Json(json!({ "token": "abc; Domain=evil.example" }))).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))).into_response()
    }
}

fn fixture(path: &str) -> Option<Value> {
    let value = match path {
        "/whoami" => json!({
            "user": {
                "id": 7,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "role": "admin"
            },
            "permissions": {
                "environments": [
                    { "environment_id": 1, "environment_name": "Local", "permission": "admin" }
                ],
                "databases": null
            }
        }),
        "/environments" => json!({
            "environments": [
                { "id": 1, "name": "Local", "connection_string": "mongodb://localhost:27017", "myPermission": "admin" }
            ]
        }),
        "/environments/1" => json!({
            "environment": { "id": 1, "name": "Local", "connection_string": "mongodb://localhost:27017" },
            "myPermission": "admin"
        }),
        "/environments/1/databases" => json!({
            "Databases": [
                { "Name": "admin", "SizeOnDisk": 40960, "Empty": false, "myPermission": "readAndWrite" },
                { "Name": "shop", "SizeOnDisk": 81920, "Empty": false, "myPermission": "readOnly" }
            ],
            "TotalSize": 122880
        }),
        "/environments/1/databases/shop" => json!({
            "database": "shop",
            "stats": { "collections": 2, "dataSize": 1024 },
            "collections": ["orders", "customers"],
            "myPermission": "readWrite"
        }),
        "/environments/1/databases/shop/collections" => json!({
            "database": "shop",
            "collections": [
                { "name": "orders", "count": 2, "size": 512, "storageSize": 4096, "totalIndexSize": 4096 }
            ],
            "myPermission": "readWrite"
        }),
        "/environments/1/databases/shop/collections/orders/documents" => json!({
            "database": "shop",
            "collection": "orders",
            "documents": [
                { "_id": "a1", "total": 12.5 },
                { "_id": "a2", "total": 3 }
            ]
        }),
        "/environments/1/databases/shop/collections/orders/documents/a1" => json!({
            "database": "shop",
            "collection": "orders",
            "document": { "_id": "a1", "total": 12.5 }
        }),
        _ => return None,
    };
    Some(value)
}
