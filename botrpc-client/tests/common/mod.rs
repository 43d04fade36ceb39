//! Mock bot API server for integration tests.
//!
//! Every request is recorded and answered by a responder closure that sees
//! the zero-based request index.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use botrpc_client::{BotClient, ClientBuilder};
use bytes::Bytes;
use serde_json::{Value, json};

pub const TOKEN: &str = "123456:TEST-token";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: String,
    pub body: Bytes,
    pub received_at: Instant,
}

impl RecordedRequest {
    pub fn json(&self) -> anyhow::Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A canned response.
#[derive(Clone, Debug)]
pub struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Reply {
    pub fn ok(result: Value) -> Self {
        Self::raw(StatusCode::OK, json!({"ok": true, "result": result}).to_string())
    }

    pub fn error(code: u16, description: &str) -> Self {
        Self::raw(
            StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST),
            json!({"ok": false, "error_code": code, "description": description}).to_string(),
        )
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self::raw(
            StatusCode::TOO_MANY_REQUESTS,
            json!({
                "ok": false,
                "error_code": 429,
                "description": format!("Too Many Requests: retry after {retry_after}"),
                "parameters": {"retry_after": retry_after}
            })
            .to_string(),
        )
    }

    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the response back for `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(usize, &RecordedRequest) -> Reply + Send + Sync;

struct ServerState {
    requests: Mutex<Vec<RecordedRequest>>,
    respond: Box<Responder>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl MockServer {
    pub async fn start<F>(respond: F) -> anyhow::Result<Self>
    where
        F: Fn(usize, &RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let state = Arc::new(ServerState {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock server error: {e}");
            }
        });

        Ok(Self { addr, state })
    }

    /// A server answering every request with the same reply.
    pub async fn always(reply: Reply) -> anyhow::Result<Self> {
        Self::start(move |_, _| reply.clone()).await
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/bot{{token}}/{{method}}", self.addr)
    }

    pub fn client_builder(&self) -> ClientBuilder {
        BotClient::builder(TOKEN).endpoint(self.endpoint())
    }

    pub fn client(&self) -> anyhow::Result<BotClient> {
        Ok(self.client_builder().build()?)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

async fn handle(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let recorded = RecordedRequest {
        path,
        content_type,
        body,
        received_at: Instant::now(),
    };

    let reply = {
        let mut requests = state.requests.lock().unwrap();
        let reply = (state.respond)(requests.len(), &recorded);
        requests.push(recorded);
        reply
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// One part of a decoded multipart body.
#[derive(Debug)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormField {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.data).unwrap_or_default()
    }
}

/// Decode a recorded multipart body with axum's multipart extractor.
pub async fn parse_multipart(request: &RecordedRequest) -> anyhow::Result<Vec<FormField>> {
    let request = axum::http::Request::builder()
        .header(header::CONTENT_TYPE, &request.content_type)
        .body(Body::from(request.body.clone()))?;

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| anyhow::anyhow!("not a multipart body: {e}"))?;

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await?;
        fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(fields)
}

pub fn field<'a>(fields: &'a [FormField], name: &str) -> anyhow::Result<&'a FormField> {
    fields
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| anyhow::anyhow!("missing form field {name}"))
}
