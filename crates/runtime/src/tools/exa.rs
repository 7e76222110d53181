//! Exa web search.

use crate::{Http, ToolSet};
use anyhow::Result;
use rcore::{Capability, model::Tool};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Exa API base URL.
pub const EXA_ENDPOINT: &str = "https://api.exa.ai";

const DEFAULT_RESULTS: u32 = 5;
const MAX_RESULTS: u32 = 10;
const MAX_CHARACTERS: u32 = 1000;

/// Arguments of the `search_exa` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// What to search the web for, e.g. a movie title plus "reviews".
    pub query: String,
    /// How many results to return (1-10, default 5).
    #[serde(default)]
    pub num_results: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    num_results: u32,
    contents: Contents,
}

#[derive(Serialize)]
struct Contents {
    text: TextOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextOptions {
    max_characters: u32,
}

#[derive(Deserialize)]
struct SearchReply {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Exa search client.
#[derive(Clone, Debug)]
pub struct Exa {
    http: Http,
}

impl Exa {
    /// Create a client for the public Exa endpoint.
    pub fn new(client: Client, key: &str) -> Result<Self> {
        Self::with_endpoint(client, key, EXA_ENDPOINT)
    }

    /// Create a client for a custom endpoint.
    pub fn with_endpoint(client: Client, key: &str, base: &str) -> Result<Self> {
        Ok(Self {
            http: Http::custom_header(client, "x-api-key", key, base)?,
        })
    }

    /// Search the web.
    pub async fn search(&self, query: &str, num_results: Option<u32>) -> Result<Vec<SearchResult>> {
        let body = SearchBody {
            query,
            num_results: num_results.unwrap_or(DEFAULT_RESULTS).clamp(1, MAX_RESULTS),
            contents: Contents {
                text: TextOptions {
                    max_characters: MAX_CHARACTERS,
                },
            },
        };
        let reply: SearchReply = self.http.post("/search", &body).await?;
        Ok(reply.results)
    }

    /// Attach `search_exa` to `tools`.
    pub fn register(self, tools: &mut ToolSet) {
        let exa = Arc::new(self);
        tools.register(
            Capability::Search,
            Tool::new::<SearchArgs>(
                "search_exa",
                "Search the web for current information about movies, ratings, reviews and where to watch them.",
            ),
            move |args| {
                let exa = Arc::clone(&exa);
                async move { exa.call(&args).await }
            },
        );
    }

    async fn call(&self, args: &str) -> String {
        let args: SearchArgs = match serde_json::from_str(args) {
            Ok(args) => args,
            Err(e) => return format!("invalid arguments for search_exa: {e}"),
        };
        match self.search(&args.query, args.num_results).await {
            Ok(results) => serde_json::to_string(&results)
                .unwrap_or_else(|e| format!("search_exa failed: {e}")),
            Err(e) => {
                tracing::warn!("exa search failed: {e:#}");
                format!("search_exa failed: {e:#}")
            }
        }
    }
}
