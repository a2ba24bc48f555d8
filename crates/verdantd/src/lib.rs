//! verdantd - plant-care report daemon.
//!
//! Reads sensor telemetry from a backing store, builds a deterministic
//! prompt, asks a generative-text API for a care report with bounded
//! retry/backoff, and optionally renders the result into a document.

pub mod config;
pub mod formatter;
pub mod gateway;
pub mod prompt;
pub mod routes;
pub mod server;
pub mod store;
