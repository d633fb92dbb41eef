//! In-process stand-in for the grading service.
//!
//! Serves canned responses keyed by method and path and records every
//! request it receives, so tests can assert on headers and bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;

use gradebook_client::{Frontend, Notice, ViewState};

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Clone, Default)]
struct ServerState {
    routes: Arc<HashMap<(Method, String), Reply>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

pub struct MockServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockServer {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, path: &str) -> Vec<Hit> {
        self.hits().into_iter().filter(|h| h.path == path).collect()
    }
}

/// Builder for the canned route table.
#[derive(Default)]
pub struct Routes {
    table: HashMap<(Method, String), Reply>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.table.insert(
            (method, path.to_string()),
            Reply { status: StatusCode::from_u16(status).unwrap(), body: body.to_string() },
        );
        self
    }

    pub fn raw(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.table.insert(
            (method, path.to_string()),
            Reply { status: StatusCode::from_u16(status).unwrap(), body: body.to_string() },
        );
        self
    }

    pub async fn start(self) -> MockServer {
        let state = ServerState { routes: Arc::new(self.table), hits: Arc::default() };
        let hits = Arc::clone(&state.hits);
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer { base_url: format!("http://{}", addr), hits }
    }
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let header_str = |name: header::HeaderName| {
        headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
    };
    let path = uri.path().to_string();
    state.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body,
    });

    match state.routes.get(&(method, path)) {
        Some(reply) => (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body.clone(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"detail":"Not Found"}"#.to_string(),
        ),
    }
}

/// Address with nothing listening on it.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Front end that keeps every render and notice.
#[derive(Default)]
pub struct Recorder {
    pub renders: Vec<ViewState>,
    pub notices: Vec<Notice>,
}

impl Recorder {
    pub fn errors(&self) -> Vec<String> {
        self.notices
            .iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m.clone()),
                Notice::Info(_) => None,
            })
            .collect()
    }

    pub fn last(&self) -> &ViewState {
        self.renders.last().expect("nothing rendered")
    }
}

impl Frontend for Recorder {
    fn render(&mut self, view: &ViewState) {
        self.renders.push(view.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
