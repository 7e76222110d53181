//! Local HTTP stand-ins for the remote services.

#![allow(dead_code)]

use axum::{
    Json, Router,
    http::{HeaderMap, Uri},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A request seen by the stub.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Serve `reply` for every request and record what came in.
pub async fn stub(reply: Value) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let router = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: String| {
        let log = Arc::clone(&log);
        let reply = reply.clone();
        async move {
            log.lock().unwrap().push(Seen {
                path: uri.path().to_owned(),
                query: uri.query().map(str::to_owned),
                headers,
                body: serde_json::from_str(&body).unwrap_or(Value::Null),
            });
            Json(reply)
        }
    });
    (serve(router).await, seen)
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}
