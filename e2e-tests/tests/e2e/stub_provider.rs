//! In-process classifier provider
//!
//! Serves both the OpenAI-style `/v1/chat/completions` and Ollama's
//! `/api/chat` on an ephemeral port, answering from a script. The last
//! scripted reply repeats once the script runs out.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Chat-completions envelope around the text
    Completion(String),
    /// Ollama envelope around the text
    Ollama(String),
    /// Bare HTTP status with a body
    Status(u16, String),
    /// Chat-completions envelope, after a delay
    Slow(Duration, String),
    /// Arbitrary JSON body
    Raw(Value),
}

/// A request as the stub received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    script: Arc<Vec<StubReply>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubProvider {
    pub base_url: String,
    state: StubState,
    handle: JoinHandle<()>,
}

impl StubProvider {
    pub async fn start(script: Vec<StubReply>) -> Self {
        assert!(!script.is_empty(), "stub needs at least one reply");

        let state = StubState {
            script: Arc::new(script),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(chat))
            .route("/api/chat", post(chat))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub provider");
        let addr = listener.local_addr().expect("stub address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Shorthand for a stub that always answers with `reply`.
    pub async fn answering(reply: StubReply) -> Self {
        Self::start(vec![reply]).await
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().expect("stub lock").len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("stub lock").clone()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn chat(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let reply = {
        let mut requests = state.requests.lock().expect("stub lock");
        requests.push(RecordedRequest {
            path: uri.path().to_string(),
            authorization: headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body,
        });
        let index = (requests.len() - 1).min(state.script.len() - 1);
        state.script[index].clone()
    };

    match reply {
        StubReply::Completion(text) => completion(text),
        StubReply::Ollama(text) => Json(json!({
            "model": "mistral",
            "created_at": "2024-05-01T10:00:00Z",
            "message": {"role": "assistant", "content": text},
            "done": true
        }))
        .into_response(),
        StubReply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        StubReply::Slow(delay, text) => {
            tokio::time::sleep(delay).await;
            completion(text)
        }
        StubReply::Raw(value) => Json(value).into_response(),
    }
}

fn completion(text: String) -> Response {
    Json(json!({
        "id": "chatcmpl-stub",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
