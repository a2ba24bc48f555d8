//! Shared types for the Verdant plant-care report service.
//!
//! Wire protocol, telemetry snapshot, and the error taxonomy used by both
//! the daemon and any library consumers.

pub mod error;
pub mod protocol;
pub mod telemetry;

pub use error::{FormatError, GenerationError, StoreError};
pub use protocol::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ErrorBody, ReportRequest, ReportResponse,
};
pub use telemetry::TelemetrySnapshot;
