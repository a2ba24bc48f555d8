//! Scripted transport shared by the gateway and end-to-end tests.

use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use verdantd::gateway::{GenerationTransport, TransportError, TransportReply};

/// Fake transport returning pre-scripted replies and counting calls.
/// A single-entry script repeats forever, like the teacher's fake client.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportReply, TransportError>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<TransportReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(reply: Result<TransportReply, TransportError>) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GenerationTransport for ScriptedTransport {
    async fn send_prompt(
        &self,
        _system: &str,
        _prompt: &str,
    ) -> Result<TransportReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut replies = self.replies.lock().unwrap();
        if replies.len() == 1 {
            replies[0].clone()
        } else {
            replies
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
        }
    }
}

/// A 2xx reply carrying one candidate with the given text.
pub fn success(text: &str) -> Result<TransportReply, TransportError> {
    Ok(TransportReply {
        status: 200,
        body: json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }),
    })
}

/// A rate-limit reply with no useful body.
pub fn rate_limited() -> Result<TransportReply, TransportError> {
    Ok(TransportReply {
        status: 429,
        body: serde_json::Value::Null,
    })
}

/// A non-retryable HTTP error.
pub fn upstream(status: u16) -> Result<TransportReply, TransportError> {
    Ok(TransportReply {
        status,
        body: serde_json::Value::Null,
    })
}

/// A healthy reply with an empty candidate list.
pub fn empty_choices() -> Result<TransportReply, TransportError> {
    Ok(TransportReply {
        status: 200,
        body: json!({ "choices": [] }),
    })
}

/// A network-level failure.
pub fn network_failure(detail: &str) -> Result<TransportReply, TransportError> {
    Err(TransportError(detail.to_string()))
}
