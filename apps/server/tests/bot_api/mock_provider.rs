//! Mock reply provider for E2E tests.
//!
//! Serves both a `/chat/completions` endpoint and a `/models/{model}`
//! inference endpoint, answering every call with one canned response and
//! recording what it received.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::StatusCode, web};
use serde_json::Value;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// A request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub authorization: Option<String>,
    pub title: Option<String>,
    pub body: Value,
}

/// Shared state for the mock provider.
pub struct MockProviderState {
    pub status: u16,
    pub body: String,
    pub calls: Vec<RecordedCall>,
}

async fn respond(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<Arc<Mutex<MockProviderState>>>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut state = state.lock().unwrap();
    state.calls.push(RecordedCall {
        path: req.path().to_string(),
        authorization: header("authorization"),
        title: header("x-title"),
        body: body.into_inner(),
    });

    HttpResponse::build(StatusCode::from_u16(state.status).unwrap())
        .content_type("application/json")
        .body(state.body.clone())
}

/// Mock provider answering with a fixed status and body.
pub struct MockProvider {
    pub base_url: String,
    pub state: Arc<Mutex<MockProviderState>>,
}

impl MockProvider {
    /// Start the mock on an ephemeral port.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(MockProviderState {
            status,
            body: body.into(),
            calls: Vec::new(),
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .route("/chat/completions", web::post().to(respond))
                .route("/models/{model}", web::post().to(respond))
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget, the server lives for the process lifetime
        tokio::spawn(server);

        MockProvider { base_url, state }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }
}
