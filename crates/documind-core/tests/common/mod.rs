#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use documind_core::client::ApiClient;

/// One request as seen by the mock service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
}

/// In-process stand-in for the DocuMind service on an ephemeral port.
///
/// Every request is recorded. Routes answer with whatever was registered via
/// `respond`; anything else gets a 404 with an empty JSON object.
pub struct MockService {
    pub base_url: String,
    state: MockState,
}

impl MockService {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock service");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: serde_json::Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock service received no requests")
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let canned = state
        .responses
        .lock()
        .unwrap()
        .get(&(method, path))
        .cloned();
    let (status, body) = canned.unwrap_or((StatusCode::NOT_FOUND, "{}".to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A base URL nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
