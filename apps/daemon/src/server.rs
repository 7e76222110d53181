//! HTTP surface: message dispatch, health and the agent card.

use crate::config::AgentConfig;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rcore::{Agent, Conversation, Dispatcher, Error, InitError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

/// Shared state of the HTTP handlers.
pub struct AppState<A: Agent> {
    /// The dispatcher every request goes through.
    pub dispatcher: Arc<Dispatcher<A>>,
    /// Advertised agent card; `None` when the deployment is not exposed.
    pub card: Option<Arc<AgentCard>>,
}

impl<A: Agent> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            card: self.card.clone(),
        }
    }
}

/// Public description of the agent, served at `/.well-known/agent.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    pub protocol_version: String,
}

impl From<&AgentConfig> for AgentCard {
    fn from(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            version: config.version.clone(),
            url: config.deployment.url.clone(),
            protocol_version: config.deployment.protocol_version.clone(),
        }
    }
}

/// Body of `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct MessagesRequest {
    /// The conversation so far.
    #[serde(default)]
    pub messages: Conversation,
}

/// Health report.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    /// Whether the agent has been constructed.
    pub ready: bool,
}

/// A dispatch error rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Init(InitError::Credential(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Init(_) | Error::NotInitialized => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Agent(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = format!("{:#}", anyhow::Error::from(self.0));
        if status.is_server_error() {
            tracing::error!("request failed: {message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the router over `state`, allowing the configured CORS origins.
pub fn router<A>(state: AppState<A>, cors_origins: &[String]) -> Router
where
    A: Agent,
    A::Response: Serialize,
{
    Router::new()
        .route("/messages", post(messages::<A>))
        .route("/health", get(health::<A>))
        .route("/.well-known/agent.json", get(card::<A>))
        .layer(cors(cors_origins))
        .with_state(state)
}

fn cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid cors origin {origin}");
                None
            }
        })
        .collect::<Vec<_>>();
    layer.allow_origin(origins)
}

async fn messages<A>(
    State(state): State<AppState<A>>,
    Json(request): Json<MessagesRequest>,
) -> Result<Json<A::Response>, ApiError>
where
    A: Agent,
    A::Response: Serialize,
{
    let response = state.dispatcher.handle(request.messages).await?;
    Ok(Json(response))
}

async fn health<A: Agent>(State(state): State<AppState<A>>) -> Json<Health> {
    Json(Health {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        ready: state.dispatcher.is_ready(),
    })
}

async fn card<A: Agent>(
    State(state): State<AppState<A>>,
) -> Result<Json<AgentCard>, StatusCode> {
    let card = state.card.as_deref().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(card.clone()))
}

/// Handle returned by [`serve`]: the bound port and the shutdown trigger.
pub struct ServeHandle {
    /// The port the server is listening on.
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Bind `bind` and serve the agent in a spawned task.
pub async fn serve<A>(
    dispatcher: Arc<Dispatcher<A>>,
    config: &AgentConfig,
    bind: &str,
) -> Result<ServeHandle>
where
    A: Agent,
    A::Response: Serialize,
{
    let state = AppState {
        dispatcher,
        card: config
            .deployment
            .expose
            .then(|| Arc::new(AgentCard::from(config))),
    };
    let app = router(state, &config.deployment.cors_origins);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("{} listening on {bind} (port {port})", config.name);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
