//! In-process stub backend for exercising the real HTTP client

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
enum Canned {
    Json(StatusCode, Value),
    Raw(StatusCode, String),
}

/// What the backend received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// `Value::Null` when the body was empty or not JSON
    pub body: Value,
}

struct Shared {
    routes: HashMap<(String, String), Canned>,
    hits: Mutex<Vec<RecordedRequest>>,
}

#[derive(Default)]
pub struct StubBackend {
    routes: HashMap<(String, String), Canned>,
}

pub struct RunningBackend {
    pub base_url: String,
    shared: Arc<Shared>,
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` (query ignored) with a JSON body
    pub fn respond(mut self, method: Method, path: &str, code: u16, body: Value) -> Self {
        self.routes.insert(
            (method.as_str().to_string(), path.to_string()),
            Canned::Json(status(code), body),
        );
        self
    }

    /// Answer with a plain-text body
    pub fn respond_raw(mut self, method: Method, path: &str, code: u16, body: &str) -> Self {
        self.routes.insert(
            (method.as_str().to_string(), path.to_string()),
            Canned::Raw(status(code), body.to_string()),
        );
        self
    }

    pub async fn start(self) -> RunningBackend {
        let shared = Arc::new(Shared {
            routes: self.routes,
            hits: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningBackend {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    /// Base URL of a port nothing listens on
    pub async fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}

impl RunningBackend {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.hits.lock().unwrap().clone()
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    shared.hits.lock().unwrap().push(RecordedRequest {
        method: method.as_str().to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match shared.routes.get(&(method.as_str().to_string(), path)) {
        Some(Canned::Json(code, value)) => (*code, Json(value.clone())).into_response(),
        Some(Canned::Raw(code, text)) => (*code, text.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response(),
    }
}
