//! Mem0 long-term memory.

use crate::{Http, ToolSet};
use anyhow::Result;
use rcore::{Capability, model::Tool};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{future::Future, sync::Arc};

/// Mem0 API base URL.
pub const MEM0_ENDPOINT: &str = "https://api.mem0.ai";

/// Arguments of `add_memory`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AddArgs {
    /// The fact or preference to remember, e.g. "loves slow-burn thrillers".
    pub content: String,
}

/// Arguments of `search_memory`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// What to look up in stored memories.
    pub query: String,
}

/// Arguments of `get_all_memories`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListArgs {}

#[derive(Serialize)]
struct AddBody<'a> {
    messages: [Turn<'a>; 1],
    user_id: &'a str,
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
struct ListQuery<'a> {
    user_id: &'a str,
}

/// The memory endpoints answer either a bare list or `{"results": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Records {
    List(Vec<Record>),
    Wrapped {
        #[serde(default)]
        results: Vec<Record>,
    },
}

impl Records {
    fn into_memories(self) -> Vec<String> {
        let records = match self {
            Self::List(records) | Self::Wrapped { results: records } => records,
        };
        records.into_iter().filter_map(|r| r.memory).collect()
    }
}

#[derive(Deserialize)]
struct Record {
    #[serde(default)]
    memory: Option<String>,
}

/// Mem0 memory client scoped to one user.
#[derive(Clone, Debug)]
pub struct Mem0 {
    http: Http,
    user: String,
}

impl Mem0 {
    /// Create a client for the public Mem0 endpoint.
    pub fn new(client: Client, key: &str, user: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(client, key, user, MEM0_ENDPOINT)
    }

    /// Create a client for a custom endpoint.
    pub fn with_endpoint(
        client: Client,
        key: &str,
        user: impl Into<String>,
        base: &str,
    ) -> Result<Self> {
        Ok(Self {
            http: Http::custom_header(client, "authorization", &format!("Token {key}"), base)?,
            user: user.into(),
        })
    }

    /// Store a memory.
    pub async fn add(&self, content: &str) -> Result<()> {
        let body = AddBody {
            messages: [Turn {
                role: "user",
                content,
            }],
            user_id: &self.user,
        };
        let _: Value = self.http.post("/v1/memories/", &body).await?;
        Ok(())
    }

    /// Find memories relevant to `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let body = SearchBody {
            query,
            user_id: &self.user,
        };
        let records: Records = self.http.post("/v1/memories/search/", &body).await?;
        Ok(records.into_memories())
    }

    /// List every stored memory.
    pub async fn all(&self) -> Result<Vec<String>> {
        let query = ListQuery {
            user_id: &self.user,
        };
        let records: Records = self.http.get("/v1/memories/", &query).await?;
        Ok(records.into_memories())
    }

    /// Attach `add_memory`, `search_memory` and `get_all_memories` to `tools`.
    pub fn register(self, tools: &mut ToolSet) {
        let mem0 = Arc::new(self);

        let this = Arc::clone(&mem0);
        tools.register(
            Capability::Memory,
            Tool::new::<AddArgs>(
                "add_memory",
                "Remember a user's movie preference, dislike or something they already watched.",
            ),
            move |args| {
                let this = Arc::clone(&this);
                async move {
                    call::<AddArgs, _, _>("add_memory", &args, |a| async move {
                        this.add(&a.content).await.map(|()| "memory stored".to_owned())
                    })
                    .await
                }
            },
        );

        let this = Arc::clone(&mem0);
        tools.register(
            Capability::Memory,
            Tool::new::<SearchArgs>(
                "search_memory",
                "Look up what is remembered about the user's taste.",
            ),
            move |args| {
                let this = Arc::clone(&this);
                async move {
                    call::<SearchArgs, _, _>("search_memory", &args, |a| async move {
                        this.search(&a.query).await.map(render)
                    })
                    .await
                }
            },
        );

        tools.register(
            Capability::Memory,
            Tool::new::<ListArgs>(
                "get_all_memories",
                "List everything remembered about the user.",
            ),
            move |args| {
                let this = Arc::clone(&mem0);
                async move {
                    call::<ListArgs, _, _>("get_all_memories", &args, |_| async move {
                        this.all().await.map(render)
                    })
                    .await
                }
            },
        );
    }
}

/// Parse tool arguments, run `op`, and fold any failure into the reply text.
async fn call<A, F, Fut>(tool: &str, args: &str, op: F) -> String
where
    A: DeserializeOwned + Default,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let args = if args.trim().is_empty() {
        A::default()
    } else {
        match serde_json::from_str(args) {
            Ok(args) => args,
            Err(e) => return format!("invalid arguments for {tool}: {e}"),
        }
    };
    match op(args).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("{tool} failed: {e:#}");
            format!("{tool} failed: {e:#}")
        }
    }
}

fn render(memories: Vec<String>) -> String {
    if memories.is_empty() {
        return "no memories found".to_owned();
    }
    memories
        .iter()
        .map(|memory| format!("- {memory}"))
        .collect::<Vec<_>>()
        .join("\n")
}
