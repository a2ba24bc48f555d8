//! Point-in-time sensor telemetry.
//!
//! Every field is optional: a sensor that has never reported is `None`,
//! which is distinct from a legitimate zero reading. Snapshots are read
//! once per request and never cached across requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single read of the plant sensor tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Soil moisture in percent.
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    /// Ambient temperature in degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Light intensity in lux.
    #[serde(default)]
    pub light_lux: Option<f64>,
    /// Soil pH on the 0-14 scale.
    #[serde(default)]
    pub soil_ph: Option<f64>,
}

impl TelemetrySnapshot {
    /// Extract a snapshot from the store's JSON tree, ignoring unrelated keys.
    ///
    /// Accepts both the raw sensor layout (`dht22.temperature`, `soil`,
    /// `gy302`, `phvalue`) and the flat camelCase layout the browser client
    /// sends (`temperature`, `soilMoisture`, `lightIntensity`, `soilPH`).
    pub fn from_store_tree(tree: &Value) -> Self {
        let dht22 = tree.get("dht22");

        Self {
            soil_moisture: number_at(tree, "soil").or_else(|| number_at(tree, "soilMoisture")),
            temperature: dht22
                .and_then(|d| number_at(d, "temperature"))
                .or_else(|| number_at(tree, "temperature")),
            humidity: dht22
                .and_then(|d| number_at(d, "humidity"))
                .or_else(|| number_at(tree, "humidity")),
            light_lux: number_at(tree, "gy302").or_else(|| number_at(tree, "lightIntensity")),
            soil_ph: number_at(tree, "phvalue").or_else(|| number_at(tree, "soilPH")),
        }
    }

    /// True when no sensor reported a value.
    pub fn is_empty(&self) -> bool {
        self.soil_moisture.is_none()
            && self.temperature.is_none()
            && self.humidity.is_none()
            && self.light_lux.is_none()
            && self.soil_ph.is_none()
    }
}

fn number_at(tree: &Value, key: &str) -> Option<f64> {
    tree.get(key).and_then(Value::as_f64)
}
