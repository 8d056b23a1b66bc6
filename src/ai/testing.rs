use super::model::{AiError, GenerativeModel, ModelRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Replays canned replies in order and records every request it receives.
/// A gated model holds each call until a permit is released.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<(ModelRequest, Instant)>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedModel {
    pub(crate) fn new(replies: Vec<Result<String, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    pub(crate) fn gated(replies: Vec<Result<String, AiError>>, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub(crate) fn requests(&self) -> Vec<(ModelRequest, Instant)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AiError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Transport("script exhausted".to_string())))
    }
}
