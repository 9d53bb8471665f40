//! In-process mock backend for tests.
//!
//! Serves an axum router on an ephemeral port. Every request is recorded and
//! answered with a canned status and body chosen by path.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;

use crate::api::ApiClient;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct MockState {
    routes: HashMap<String, (u16, String)>,
    fallback: (u16, String),
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockBackend {
    routes: HashMap<String, (u16, String)>,
    fallback: (u16, String),
}

impl MockBackend {
    /// Answer every path with `status` and `body`.
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self {
            routes: HashMap::new(),
            fallback: (status, body.into()),
        }
    }

    /// Answer unrouted paths with 404 and an empty body.
    pub fn new() -> Self {
        Self::respond(404, "")
    }

    pub fn route(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(path.to_string(), (status, body.into()));
        self
    }

    pub async fn start(self) -> RunningMock {
        let state = Arc::new(MockState {
            routes: self.routes,
            fallback: self.fallback,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        RunningMock { addr, state }
    }
}

pub struct RunningMock {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl RunningMock {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request reached the mock backend")
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(|q| q.to_string()),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let (status, body) = state
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or_else(|| state.fallback.clone());
    let status = StatusCode::from_u16(status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Address that refuses connections: bound once, then released.
pub fn closed_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// `{"code":0,"msg":"ok","data":<data>}`
pub fn ok_envelope(data: serde_json::Value) -> String {
    serde_json::json!({"code": 0, "msg": "ok", "data": data}).to_string()
}

/// Envelope reporting failure with `code` and `msg`.
pub fn err_envelope(code: i64, msg: &str) -> String {
    serde_json::json!({"code": code, "msg": msg, "data": null}).to_string()
}
