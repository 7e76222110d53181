//! Tests for the agent's tool loop.

use anyhow::Result;
use rcore::{
    Agent, Capability, Conversation, Message,
    model::{
        ChatMessage, ChatRole, Choice, FunctionCall, Model, Request, Response, Tool, ToolCall,
        Usage,
    },
};
use reel_runtime::{MAX_TOOL_CALLS, Persona, ReelAgent, RunStatus, ToolSet};
use schemars::JsonSchema;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Replays canned responses and records every request.
#[derive(Clone, Default)]
struct Scripted {
    replies: Arc<Mutex<VecDeque<ChatMessage>>>,
    requests: Arc<Mutex<Vec<Request>>>,
    repeat: Option<ChatMessage>,
}

impl Scripted {
    fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            ..Default::default()
        }
    }

    fn forever(reply: ChatMessage) -> Self {
        Self {
            repeat: Some(reply),
            ..Default::default()
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl Model for Scripted {
    async fn send(&self, request: &Request) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());
        let message = match &self.repeat {
            Some(reply) => reply.clone(),
            None => self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))?,
        };
        Ok(Response {
            id: "gen".into(),
            model: "scripted".into(),
            choices: vec![Choice {
                index: 0,
                message,
                finish_reason: None,
            }],
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 2,
                total_tokens: 12,
            }),
        })
    }
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct Query {
    query: String,
}

fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.into(),
        call_type: "function".into(),
        function: FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        },
    }
}

fn search_tools() -> ToolSet {
    let mut tools = ToolSet::new();
    tools.register(
        Capability::Search,
        Tool::new::<Query>("search_exa", "search the web"),
        |args| async move { format!("results for {args}") },
    );
    tools
}

fn agent(model: Scripted, tools: ToolSet) -> ReelAgent<Scripted> {
    ReelAgent::new(
        Persona::new("PopcornPal", "You recommend movies."),
        model,
        "openai/gpt-4o",
        tools,
    )
}

fn ask(text: &str) -> Conversation {
    Conversation::new().push(Message::user(text))
}

#[tokio::test]
async fn answers_without_tools() {
    let model = Scripted::new(vec![ChatMessage::assistant("Watch Heat.", vec![])]);
    let agent = agent(model.clone(), ToolSet::new());

    let output = agent.run(ask("something like Collateral")).await.unwrap();
    assert_eq!(output.status, RunStatus::Completed);
    assert_eq!(output.content, "Watch Heat.");
    assert_eq!(output.agent, "PopcornPal");
    assert_eq!(output.model, "openai/gpt-4o");
    assert!(output.tools.is_empty());

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].tools.is_empty());
    assert_eq!(requests[0].tool_choice, None);
}

#[tokio::test]
async fn prepends_the_system_prompt() {
    let model = Scripted::new(vec![ChatMessage::assistant("ok", vec![])]);
    agent(model.clone(), ToolSet::new())
        .run(ask("hi"))
        .await
        .unwrap();

    let messages = &model.requests()[0].messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[0].content, "You recommend movies.");
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(messages[1].content, "hi");
}

#[tokio::test]
async fn keeps_a_caller_supplied_system_prompt() {
    let model = Scripted::new(vec![ChatMessage::assistant("ok", vec![])]);
    let conversation = Conversation::new()
        .push(Message::system("Only recommend documentaries."))
        .push(Message::user("hi"));
    agent(model.clone(), ToolSet::new())
        .run(conversation)
        .await
        .unwrap();

    let messages = &model.requests()[0].messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Only recommend documentaries.");
}

#[tokio::test]
async fn datetime_is_added_when_enabled() {
    let model = Scripted::new(vec![ChatMessage::assistant("ok", vec![])]);
    let agent = ReelAgent::new(
        Persona::new("PopcornPal", "You recommend movies.").with_datetime(true),
        model.clone(),
        "m",
        ToolSet::new(),
    );
    agent.run(ask("hi")).await.unwrap();

    let system = &model.requests()[0].messages[0].content;
    assert!(system.starts_with("You recommend movies."));
    assert!(system.contains("The current date and time is"));
}

#[tokio::test]
async fn runs_tool_calls_then_answers() {
    let model = Scripted::new(vec![
        ChatMessage::assistant("", vec![call("call_1", "search_exa", r#"{"query":"heat"}"#)]),
        ChatMessage::assistant("Heat (1995) is a must.", vec![]),
    ]);
    let agent = agent(model.clone(), search_tools());

    let output = agent.run(ask("crime thrillers")).await.unwrap();
    assert_eq!(output.status, RunStatus::Completed);
    assert_eq!(output.content, "Heat (1995) is a must.");
    assert_eq!(output.tools, vec!["search_exa".to_owned()]);
    assert_eq!(output.usage.total_tokens, 24);

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tools.len(), 1);
    let followup = &requests[1].messages;
    assert_eq!(followup.len(), 4);
    assert_eq!(followup[2].role, ChatRole::Assistant);
    assert_eq!(followup[2].tool_calls.len(), 1);
    assert_eq!(followup[3].role, ChatRole::Tool);
    assert_eq!(followup[3].tool_call_id, "call_1");
    assert_eq!(followup[3].content, r#"results for {"query":"heat"}"#);
}

#[tokio::test]
async fn unknown_tools_are_reported_to_the_model() {
    let model = Scripted::new(vec![
        ChatMessage::assistant("", vec![call("call_1", "book_tickets", "{}")]),
        ChatMessage::assistant("I can't book tickets.", vec![]),
    ]);
    let output = agent(model.clone(), search_tools())
        .run(ask("book Heat tonight"))
        .await
        .unwrap();

    assert_eq!(output.content, "I can't book tickets.");
    let tool_reply = &model.requests()[1].messages[3];
    assert_eq!(tool_reply.content, "function book_tickets not available");
}

#[tokio::test]
async fn tool_rounds_are_bounded() {
    let model = Scripted::forever(ChatMessage::assistant(
        "still looking",
        vec![call("call_n", "search_exa", r#"{"query":"more"}"#)],
    ));
    let output = agent(model.clone(), search_tools())
        .run(ask("everything"))
        .await
        .unwrap();

    assert_eq!(output.status, RunStatus::Truncated);
    assert_eq!(output.content, "still looking");
    assert_eq!(output.tools.len(), MAX_TOOL_CALLS);

    let requests = model.requests();
    assert_eq!(requests.len(), MAX_TOOL_CALLS + 1);
    assert!(requests.last().unwrap().tools.is_empty());
}

#[tokio::test]
async fn model_errors_propagate() {
    let model = Scripted::new(vec![]);
    let err = agent(model, ToolSet::new())
        .run(ask("hi"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("script exhausted"));
}

#[tokio::test]
async fn run_ids_are_unique() {
    let model = Scripted::forever(ChatMessage::assistant("ok", vec![]));
    let agent = agent(model, ToolSet::new());
    let first = agent.run(ask("a")).await.unwrap();
    let second = agent.run(ask("b")).await.unwrap();
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn output_serializes_status_in_upper_case() {
    let model = Scripted::new(vec![ChatMessage::assistant("ok", vec![])]);
    let output = agent(model, ToolSet::new()).run(ask("hi")).await.unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["status"], "COMPLETED");
    assert_eq!(json["content"], "ok");
    assert!(json["run_id"].is_string());
}

#[test]
fn capabilities_follow_the_tools() {
    let agent = agent(Scripted::default(), search_tools());
    assert!(agent.capabilities().is_enabled(Capability::Search));
    assert!(!agent.capabilities().is_enabled(Capability::Memory));
}
