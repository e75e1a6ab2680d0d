//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::executor::Executor;
use crate::http::{HttpRequest, HttpResponse};
use crate::token::TokenStore;
use crate::transport::Transport;

enum Step {
    Respond(HttpResponse),
    Delayed(Duration, HttpResponse),
    Fail(String),
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push(Step::Respond(json_response(status, &body)));
    }

    pub(crate) fn push_text(&self, status: u16, body: &str) {
        self.push(Step::Respond(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: body.to_string(),
        }));
    }

    pub(crate) fn push_empty(&self, status: u16) {
        self.push(Step::Respond(HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        }));
    }

    pub(crate) fn push_delayed(&self, delay: Duration, status: u16, body: Value) {
        self.push(Step::Delayed(delay, json_response(status, &body)));
    }

    pub(crate) fn push_failure(&self, message: &str) {
        self.push(Step::Fail(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(Step::Fail(message)) => Err(TransportError(message)),
            None => Err(TransportError("no scripted response left".to_string())),
        }
    }
}

fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub(crate) fn executor(
    transport: &Arc<ScriptedTransport>,
    tokens: impl TokenStore + 'static,
) -> Executor {
    Executor::new(
        ClientConfig::new("http://localhost:8000"),
        transport.clone(),
        Arc::new(tokens),
    )
}

/// Records the level of every event emitted while installed.
#[derive(Clone, Default)]
pub(crate) struct CapturedLevels(Arc<Mutex<Vec<Level>>>);

impl CapturedLevels {
    pub(crate) fn levels(&self) -> Vec<Level> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLevels {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

/// Capture events on the current thread until the guard drops.
pub(crate) fn capture_logs() -> (CapturedLevels, DefaultGuard) {
    let capture = CapturedLevels::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    (capture, tracing::subscriber::set_default(subscriber))
}
