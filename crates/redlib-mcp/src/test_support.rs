//! Stub HTTP servers for tests. Each binds `127.0.0.1:0` and runs until the
//! test runtime shuts down.

use crate::client::RedlibClient;
use crate::Context;
use axum::extract::Query;
use axum::http::{header, StatusCode, Uri};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request seen by a stub backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
}

pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("stub backend received no requests")
    }
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local_addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });

    format!("http://{addr}")
}

/// A backend answering every GET with `status` and `body`, recording requests.
pub async fn stub_backend(status: StatusCode, body: &str) -> StubBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorder = requests.clone();
    let body = body.to_string();

    let router = Router::new().fallback(
        move |uri: Uri, Query(query): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(Recorded {
                    path: uri.path().to_string(),
                    query,
                });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        },
    );

    StubBackend {
        base_url: serve(router).await,
        requests,
    }
}

/// A backend answering `200 OK` with a JSON envelope.
pub async fn stub_envelope(envelope: serde_json::Value) -> StubBackend {
    stub_backend(StatusCode::OK, &envelope.to_string()).await
}

pub fn test_context(base_url: &str) -> Context {
    Context::new(RedlibClient::new(base_url), false)
}
