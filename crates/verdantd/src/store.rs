//! Telemetry store reader.
//!
//! A single best-effort `GET` of the store root. No retry: the caller
//! decides whether an empty or partial snapshot is acceptable.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use verdant_common::{StoreError, TelemetrySnapshot};

pub struct TelemetryReader {
    client: reqwest::Client,
    endpoint: String,
}

impl TelemetryReader {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Read the current snapshot. Unknown keys in the tree are ignored.
    pub async fn read(&self) -> Result<TelemetrySnapshot, StoreError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "store returned HTTP {}",
                response.status()
            )));
        }

        let tree: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("undecodable store body: {}", e)))?;

        let snapshot = TelemetrySnapshot::from_store_tree(&tree);
        debug!("Telemetry snapshot read: {:?}", snapshot);
        Ok(snapshot)
    }

    /// Raw store tree, for the passthrough data endpoint.
    pub async fn read_raw(&self) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "store returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("undecodable store body: {}", e)))
    }
}
