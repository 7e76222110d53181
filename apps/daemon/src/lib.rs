//! reel daemon: serves the movie recommender agent over HTTP.
//!
//! The [`Cli`] resolves `agent_config.json`, prints the banner and hands a
//! [`rcore::Dispatcher`] to [`server::serve`]. The agent itself is built
//! on the first `POST /messages`.

pub use {
    cmd::Cli,
    config::{AgentConfig, Deployment, EnvVar},
    server::{AgentCard, AppState, ServeHandle, router, serve},
};

pub mod banner;
mod cmd;
pub mod config;
pub mod server;
