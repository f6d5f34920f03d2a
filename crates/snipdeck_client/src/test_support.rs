//! Real-socket mock of the remote snippet store.
//!
//! Serves `GET/POST {base}/snippets` and `DELETE {base}/snippets/:id` on an
//! ephemeral loopback port so the reqwest client is exercised end to end.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use snipdeck_core::Snippet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct MockInner {
    snippets: Vec<Snippet>,
    next_id: u64,
    fail_next_list: Option<u16>,
    document_ids: bool,
    requests: Vec<String>,
}

/// Shared, inspectable state behind the mock routes.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<MockInner>>,
}

impl MockStore {
    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current server-side contents.
    pub fn snippets(&self) -> Vec<Snippet> {
        self.lock().snippets.clone()
    }

    /// Insert an entry directly, bypassing the API.
    pub fn insert(&self, title: &str, language: &str, code: &str) -> Snippet {
        let mut inner = self.lock();
        inner.next_id += 1;
        let snippet = Snippet {
            id: format!("srv-{}", inner.next_id),
            title: title.to_string(),
            language: language.to_string(),
            code: code.to_string(),
        };
        inner.snippets.push(snippet.clone());
        snippet
    }

    /// Answer the next list request with `status` and an error body.
    pub fn fail_next_list(&self, status: u16) {
        self.lock().fail_next_list = Some(status);
    }

    /// Emit ids under `_id` instead of `id`, like document stores do.
    pub fn use_document_ids(&self) {
        self.lock().document_ids = true;
    }

    /// `METHOD path` lines for every request received, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn render(&self, snippet: &Snippet, document_ids: bool) -> Value {
        let mut value = json!({
            "title": snippet.title,
            "language": snippet.language,
            "code": snippet.code,
        });
        let key = if document_ids { "_id" } else { "id" };
        value[key] = Value::String(snippet.id.clone());
        value
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn list_snippets(State(store): State<MockStore>) -> Response {
    let (failure, items, document_ids) = {
        let mut inner = store.lock();
        inner.requests.push("GET /snippets".to_string());
        (
            inner.fail_next_list.take(),
            inner.snippets.clone(),
            inner.document_ids,
        )
    };
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_body(status, "injected list failure");
    }
    let body: Vec<Value> = items
        .iter()
        .map(|snippet| store.render(snippet, document_ids))
        .collect();
    Json(body).into_response()
}

async fn create_snippet(State(store): State<MockStore>, Json(body): Json<Value>) -> Response {
    store.lock().requests.push("POST /snippets".to_string());
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|value| !value.trim().is_empty())
    };
    let (Some(title), Some(language), Some(code)) =
        (field("title"), field("language"), field("code"))
    else {
        return error_body(
            StatusCode::BAD_REQUEST,
            "title, language and code are required",
        );
    };
    let created = store.insert(&title, &language, &code);
    let document_ids = store.lock().document_ids;
    (StatusCode::CREATED, Json(store.render(&created, document_ids))).into_response()
}

async fn delete_snippet(State(store): State<MockStore>, Path(id): Path<String>) -> Response {
    let mut inner = store.lock();
    inner.requests.push(format!("DELETE /snippets/{}", id));
    match inner.snippets.iter().position(|snippet| snippet.id == id) {
        Some(index) => {
            inner.snippets.remove(index);
            StatusCode::NO_CONTENT.into_response()
        }
        None => error_body(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// Mock store server bound to `127.0.0.1:0`; shuts down on drop.
pub struct MockStoreServer {
    addr: SocketAddr,
    store: MockStore,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MockStoreServer {
    /// Bind and start serving. Must be called inside a tokio runtime.
    ///
    /// # Panics
    /// Panics if the loopback listener cannot be bound.
    pub async fn start() -> Self {
        let store = MockStore::default();
        let app = Router::new()
            .route("/api/snippets", get(list_snippets).post(create_snippet))
            .route("/api/snippets/:id", delete(delete_snippet))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock store");
        let addr = listener.local_addr().expect("mock store addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            store,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Base URL to configure clients with (`http://127.0.0.1:PORT/api`).
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Shared state behind the routes, for seeding and inspecting requests.
    pub fn store(&self) -> &MockStore {
        &self.store
    }
}

impl Drop for MockStoreServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
