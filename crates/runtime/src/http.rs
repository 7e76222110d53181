//! Shared JSON-over-HTTP transport.
//!
//! `Http` wraps a `reqwest::Client` with pre-built headers (auth plus
//! content negotiation) and a base URL. The model client and both tools
//! use it.

use anyhow::{Context, Result, bail};
use reqwest::{
    Client, Method, RequestBuilder,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

/// JSON transport bound to one service.
#[derive(Clone)]
pub struct Http {
    client: Client,
    headers: HeaderMap,
    base: String,
}

impl Http {
    /// Create a transport with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, base: &str) -> Result<Self> {
        Self::custom_header(client, header::AUTHORIZATION.as_str(), &format!("Bearer {key}"), base)
    }

    /// Create a transport that authenticates with a custom header.
    pub fn custom_header(client: Client, name: &str, value: &str, base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut value: HeaderValue = value
            .parse()
            .with_context(|| format!("invalid value for header {name}"))?;
        value.set_sensitive(true);
        headers.insert(name.parse::<HeaderName>()?, value);
        Ok(Self {
            client,
            headers,
            base: base.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve `path` against the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// POST a JSON body and deserialize the JSON reply.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!("request: {}", serde_json::to_string(body)?);
        }
        let request = self.request(Method::POST, path).json(body);
        self.read(path, request).await
    }

    /// GET with query parameters and deserialize the JSON reply.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &impl Serialize) -> Result<T> {
        let request = self.request(Method::GET, path).query(query);
        self.read(path, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .headers(self.headers.clone())
    }

    async fn read<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::trace!("response {status}: {text}");
        if !status.is_success() {
            bail!("{} returned {status}: {text}", self.url(path));
        }
        serde_json::from_str(&text)
            .with_context(|| format!("unexpected response from {}", self.url(path)))
    }
}

impl std::fmt::Debug for Http {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Http").field("base", &self.base).finish()
    }
}
