//! Wire types: browser-facing request/response and the chat-completions
//! payloads exchanged with the generative-text API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Client-facing protocol
// ============================================================================

/// Body of `POST /generate-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "plantName")]
    pub plant_name: String,

    /// Nested telemetry tree. When absent the server reads the store itself.
    #[serde(rename = "sensorData", default)]
    pub sensor_data: Option<Value>,

    /// When true the rendered document is written and linked in the response.
    #[serde(default)]
    pub document: bool,
}

/// Successful response of `POST /generate-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(rename = "plantName")]
    pub plant_name: String,

    #[serde(rename = "sensorData")]
    pub sensor_data: Value,

    pub report: String,

    /// Present only when a document was rendered.
    #[serde(rename = "reportUrl", skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

/// Structured error body returned for every failure class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl ErrorBody {
    pub fn new(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}

// ============================================================================
// Generative-text API (OpenAI-compatible chat completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}
