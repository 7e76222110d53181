//! One-time asynchronous initialization.
//!
//! A [`Gate`] runs its construction routine on the first call to
//! [`Gate::get_or_init`]. Callers that arrive while construction is in
//! flight await the same attempt. The attempt runs on its own task, so a
//! caller that gives up waiting never cancels it for the others.
//!
//! A failed attempt is not cached: everyone waiting on it receives the
//! error, and the next caller starts a fresh attempt.

use crate::InitError;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    sync::{Arc, Weak},
};

type Attempt<T> = Shared<BoxFuture<'static, Result<Arc<T>, InitError>>>;

type Init<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, InitError>> + Send + Sync>;

enum State<T> {
    Idle,
    Pending(Attempt<T>),
    Ready(Arc<T>),
}

struct Inner<T> {
    state: State<T>,
    /// Incremented on every new attempt so a stale attempt cannot settle
    /// the state of a newer one.
    generation: u64,
}

/// Lazily constructs a value exactly once.
pub struct Gate<T> {
    init: Option<Init<T>>,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T: Send + Sync + 'static> Gate<T> {
    /// Create a gate around a construction routine.
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, InitError>> + Send + 'static,
    {
        let init: Init<T> = Arc::new(move || init().boxed());
        Self {
            init: Some(init),
            inner: Arc::new(Mutex::new(Inner {
                state: State::Idle,
                generation: 0,
            })),
        }
    }

    /// Create a gate that is already initialized with `value`.
    pub fn ready(value: T) -> Self {
        Self {
            init: None,
            inner: Arc::new(Mutex::new(Inner {
                state: State::Ready(Arc::new(value)),
                generation: 0,
            })),
        }
    }

    /// Get the value if construction has completed.
    pub fn get(&self) -> Option<Arc<T>> {
        match &self.inner.lock().state {
            State::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Whether construction has completed.
    pub fn is_ready(&self) -> bool {
        matches!(self.inner.lock().state, State::Ready(_))
    }

    /// Get the value, constructing it first if no attempt has succeeded.
    pub async fn get_or_init(&self) -> Result<Arc<T>, InitError> {
        let attempt = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            match &inner.state {
                State::Ready(value) => return Ok(Arc::clone(value)),
                State::Pending(attempt) => attempt.clone(),
                State::Idle => {
                    let Some(init) = self.init.as_ref() else {
                        return Err(InitError::Aborted("gate has no initializer".into()));
                    };
                    inner.generation += 1;
                    let attempt = spawn(init, Arc::downgrade(&self.inner), inner.generation);
                    inner.state = State::Pending(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }
}

/// Start a construction attempt on its own task.
fn spawn<T: Send + Sync + 'static>(
    init: &Init<T>,
    inner: Weak<Mutex<Inner<T>>>,
    generation: u64,
) -> Attempt<T> {
    tracing::debug!("starting initialization attempt {generation}");
    let construct = init();
    let task = {
        let inner = inner.clone();
        tokio::spawn(async move {
            let result = match AssertUnwindSafe(construct).catch_unwind().await {
                Ok(result) => result.map(Arc::new),
                Err(panic) => Err(InitError::Aborted(panic_message(panic.as_ref()))),
            };
            settle(&inner, generation, &result);
            result
        })
    };

    async move {
        match task.await {
            Ok(result) => result,
            Err(e) => {
                let result = Err(InitError::Aborted(e.to_string()));
                settle(&inner, generation, &result);
                result
            }
        }
    }
    .boxed()
    .shared()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let message = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("construction panicked");
    format!("initialization panicked: {message}")
}

/// Record the outcome of an attempt, unless a newer attempt has started.
fn settle<T>(inner: &Weak<Mutex<Inner<T>>>, generation: u64, result: &Result<Arc<T>, InitError>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let mut inner = inner.lock();
    if inner.generation != generation || !matches!(inner.state, State::Pending(_)) {
        return;
    }

    inner.state = match result {
        Ok(value) => State::Ready(Arc::clone(value)),
        Err(e) => {
            tracing::warn!("initialization attempt {generation} failed: {e}");
            State::Idle
        }
    };
}

impl<T> std::fmt::Debug for Gate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        let state = match inner.state {
            State::Idle => "idle",
            State::Pending(_) => "pending",
            State::Ready(_) => "ready",
        };
        f.debug_struct("Gate")
            .field("state", &state)
            .field("generation", &inner.generation)
            .finish()
    }
}
