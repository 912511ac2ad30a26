//! Local stub of the content-safety `text:analyze` endpoint.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub subscription_key: Option<String>,
    pub body: Value,
}

struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: RwLock<Vec<RecordedRequest>>,
}

/// Response body in the service's `categoriesAnalysis` shape.
pub fn categories_body(categories: &[(&str, u8)]) -> Value {
    json!({
        "blocklistsMatch": [],
        "categoriesAnalysis": categories
            .iter()
            .map(|(category, severity)| json!({ "category": category, "severity": severity }))
            .collect::<Vec<_>>(),
    })
}

/// Canned-response stub; every request gets the same status and body.
pub struct ContentSafetyStub {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl ContentSafetyStub {
    /// `200 OK` with the given categories.
    pub fn with_categories(categories: &[(&str, u8)]) -> Self {
        Self::respond_with(StatusCode::OK, categories_body(categories).to_string())
    }

    pub fn respond_with(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold every response for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Bind to an ephemeral loopback port and serve in the background.
    pub async fn start(self) -> std::io::Result<RunningStub> {
        let state = Arc::new(StubState {
            status: self.status,
            body: self.body,
            delay: self.delay,
            requests: RwLock::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(analyze)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "content safety stub stopped");
            }
        });

        Ok(RunningStub {
            addr,
            state,
            handle,
        })
    }
}

async fn analyze(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.requests.write().await.push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        subscription_key: headers
            .get("ocp-apim-subscription-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
}

/// A stub serving on loopback; stops when dropped.
pub struct RunningStub {
    addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl RunningStub {
    /// Base URL to use as the content-safety endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.read().await.clone()
    }
}

impl Drop for RunningStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
