//! Error taxonomy for the report pipeline.
//!
//! Each variant maps to a distinct caller-visible failure class so the HTTP
//! layer can pick an appropriate status and message. No variant is ever
//! collapsed into an opaque string shared across classes.

use thiserror::Error;

/// Terminal outcomes of a report-generation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The API answered 2xx but returned no usable candidate.
    #[error("generation succeeded upstream but returned no usable candidate")]
    EmptyGeneration,

    /// Every attempt up to the retry ceiling was rate limited.
    #[error("rate limit still in effect after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// A non-retryable HTTP error from the generation API.
    #[error("generation API returned HTTP {0}")]
    UpstreamError(u16),

    /// A network-level failure (connect, reset, per-attempt timeout).
    #[error("network failure talking to generation API: {0}")]
    NetworkError(String),

    /// The caller abandoned the request; no further attempts were made.
    #[error("request cancelled before completion")]
    Cancelled,
}

impl GenerationError {
    /// Short machine-readable tag used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::EmptyGeneration => "empty_generation",
            GenerationError::RateLimitExhausted { .. } => "rate_limit_exhausted",
            GenerationError::UpstreamError(_) => "upstream_error",
            GenerationError::NetworkError(_) => "network_error",
            GenerationError::Cancelled => "cancelled",
        }
    }
}

/// Failure reading the telemetry store. Single attempt, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("telemetry store unavailable: {0}")]
    Unavailable(String),
}

/// Failure writing a rendered document. Rendering itself cannot fail.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("document sink unavailable: {0}")]
    SinkUnavailable(#[source] std::io::Error),
}
