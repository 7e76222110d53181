//! Tests for the request dispatcher.

use futures_util::future::join;
use parking_lot::Mutex;
use reel_core::{Agent, Conversation, CredentialError, Dispatcher, Error, InitError, Message, Role};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

#[derive(Debug, Clone, PartialEq)]
struct Reply {
    run_id: String,
    status: &'static str,
}

/// Records every conversation it receives and answers with a fixed run id.
#[derive(Default)]
struct Recorder {
    run_id: String,
    seen: Arc<Mutex<Vec<Conversation>>>,
    cleanups: Arc<AtomicUsize>,
}

impl Recorder {
    fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.into(),
            ..Default::default()
        }
    }
}

impl Agent for Recorder {
    type Response = Reply;

    async fn run(&self, conversation: Conversation) -> anyhow::Result<Reply> {
        self.seen.lock().push(conversation);
        Ok(Reply {
            run_id: self.run_id.clone(),
            status: "COMPLETED",
        })
    }

    async fn cleanup(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Always fails, as a collaborator outage would.
struct Unreachable;

impl Agent for Unreachable {
    type Response = ();

    async fn run(&self, _conversation: Conversation) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("model provider returned 502"))
    }
}

fn hello() -> Conversation {
    Conversation::new().push(Message::user("Hello"))
}

#[tokio::test]
async fn handle_returns_agent_response() {
    let dispatcher = Dispatcher::with_agent(Recorder::new("r1"));
    let reply = dispatcher.handle(hello()).await.unwrap();
    assert_eq!(reply.run_id, "r1");
    assert_eq!(reply.status, "COMPLETED");
}

#[tokio::test]
async fn handle_forwards_conversation_unchanged() {
    let agent = Recorder::new("r2");
    let seen = Arc::clone(&agent.seen);
    let dispatcher = Dispatcher::with_agent(agent);

    let conversation: Conversation = vec![
        Message::system("You are a helpful assistant."),
        Message::user("What's on tonight?"),
        Message::assistant("Anything in particular?"),
        Message::user("Something like Inception"),
    ]
    .into();
    dispatcher.handle(conversation.clone()).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], conversation);
    let roles: Vec<Role> = seen[0].iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [Role::System, Role::User, Role::Assistant, Role::User]
    );
}

#[tokio::test]
async fn handle_accepts_empty_conversation() {
    let agent = Recorder::new("r3");
    let seen = Arc::clone(&agent.seen);
    let dispatcher = Dispatcher::with_agent(agent);

    dispatcher.handle(Conversation::new()).await.unwrap();
    assert!(seen.lock()[0].is_empty());
}

#[tokio::test]
async fn handle_initializes_on_first_call() {
    let builds = Arc::new(AtomicUsize::new(0));
    let dispatcher = {
        let builds = Arc::clone(&builds);
        Dispatcher::new(move || {
            let builds = Arc::clone(&builds);
            async move {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok(Recorder::new("init"))
            }
        })
    };

    assert!(!dispatcher.is_ready());
    let reply = dispatcher.handle(hello()).await.unwrap();
    assert_eq!(reply.run_id, "init");
    assert!(dispatcher.is_ready());

    dispatcher.handle(hello()).await.unwrap();
    dispatcher.handle(hello()).await.unwrap();
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_first_calls_build_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let dispatcher = {
        let builds = Arc::clone(&builds);
        Dispatcher::new(move || {
            let builds = Arc::clone(&builds);
            async move {
                builds.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(Recorder::new("shared"))
            }
        })
    };

    let (a, b) = join(dispatcher.handle(hello()), dispatcher.handle(hello())).await;
    assert_eq!(a.unwrap().run_id, "shared");
    assert_eq!(b.unwrap().run_id, "shared");
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn send_without_agent_is_rejected() {
    let builds = Arc::new(AtomicUsize::new(0));
    let dispatcher = {
        let builds = Arc::clone(&builds);
        Dispatcher::new(move || {
            let builds = Arc::clone(&builds);
            async move {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok(Recorder::new("never"))
            }
        })
    };

    let err = dispatcher.send(hello()).await.unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
    assert_eq!(err.to_string(), "agent not initialized");
    assert_eq!(builds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn credential_error_reaches_the_caller() {
    let dispatcher: Dispatcher<Recorder> = Dispatcher::new(|| async {
        Err(InitError::from(CredentialError {
            name: "Exa API key",
            env: "EXA_API_KEY",
            url: "https://exa.ai",
        }))
    });

    let err = dispatcher.handle(hello()).await.unwrap_err();
    match err {
        Error::Init(InitError::Credential(e)) => assert_eq!(e.env, "EXA_API_KEY"),
        other => panic!("expected credential error, got {other:?}"),
    }
    assert!(!dispatcher.is_ready());
}

#[tokio::test]
async fn agent_errors_propagate_unchanged() {
    let dispatcher = Dispatcher::with_agent(Unreachable);
    let err = dispatcher.handle(hello()).await.unwrap_err();
    assert!(matches!(err, Error::Agent(_)));
    assert_eq!(err.to_string(), "model provider returned 502");
}

#[tokio::test]
async fn cleanup_can_be_called_repeatedly() {
    let agent = Recorder::new("c");
    let cleanups = Arc::clone(&agent.cleanups);
    let dispatcher = Dispatcher::with_agent(agent);

    dispatcher.cleanup().await;
    dispatcher.cleanup().await;
    assert_eq!(cleanups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cleanup_before_init_does_nothing() {
    let dispatcher: Dispatcher<Recorder> =
        Dispatcher::new(|| async { Ok(Recorder::new("late")) });
    dispatcher.cleanup().await;
    assert!(!dispatcher.is_ready());
}
