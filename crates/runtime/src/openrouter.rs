//! OpenRouter chat completions client.

use crate::Http;
use anyhow::Result;
use rcore::model::{Model, Request, Response};
use reqwest::Client;

/// OpenRouter API base URL.
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// OpenAI-compatible client for OpenRouter.
#[derive(Clone, Debug)]
pub struct OpenRouter {
    http: Http,
}

impl OpenRouter {
    /// Create a client for the public OpenRouter endpoint.
    pub fn new(client: Client, key: &str) -> Result<Self> {
        Self::with_endpoint(client, key, OPENROUTER_ENDPOINT)
    }

    /// Create a client for a custom OpenAI-compatible endpoint.
    pub fn with_endpoint(client: Client, key: &str, base: &str) -> Result<Self> {
        Ok(Self {
            http: Http::bearer(client, key, base)?,
        })
    }
}

impl Model for OpenRouter {
    async fn send(&self, request: &Request) -> Result<Response> {
        self.http.post("/chat/completions", request).await
    }
}
