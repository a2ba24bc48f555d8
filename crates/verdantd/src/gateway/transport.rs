//! Transport seam between the gateway and the generative-text API.
//!
//! The gateway only sees HTTP status plus decoded body; everything about the
//! wire (endpoint, credential, timeout) lives in the transport so tests can
//! substitute scripted replies.

use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use verdant_common::{ChatMessage, ChatRequest};

/// Network-level failure of one attempt: connect error, reset, or the
/// per-attempt timeout. Retryable, unlike an HTTP error status.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// What one completed attempt brought back.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: Value,
}

/// One outbound generation attempt. Implementations must be cheap to call
/// repeatedly; the gateway owns retry policy and attempt accounting.
pub trait GenerationTransport: Send + Sync {
    fn send_prompt(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<TransportReply, TransportError>> + Send;
}

/// Real transport: OpenAI-compatible chat completions over HTTPS.
pub struct HttpGenerationTransport {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_output_tokens: u32,
}

impl HttpGenerationTransport {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        max_output_tokens: u32,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        // The per-attempt timeout lives here so a hung call cannot stall the
        // request beyond the retry-ceiling bound.
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            max_output_tokens,
        })
    }
}

impl GenerationTransport for HttpGenerationTransport {
    async fn send_prompt(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<TransportReply, TransportError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            max_tokens: self.max_output_tokens,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError("request timed out".to_string())
            } else {
                TransportError(format!("request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        // Non-JSON bodies (error pages, empty 429s) decode as Null rather
        // than failing the attempt; status drives classification.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(TransportReply { status, body })
    }
}
