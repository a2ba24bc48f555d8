//! Deterministic prompt rendering for the report gateway.
//!
//! The prompt must be byte-identical for identical input: fields render in a
//! fixed order and absent readings render an explicit marker instead of being
//! omitted, so prompt length never varies with sensor availability.

use std::fmt::Write;
use verdant_common::TelemetrySnapshot;

/// Fixed framing sent as the system message on every generation attempt.
pub const SYSTEM_INSTRUCTION: &str = "You are a plant-care assistant. Given a plant \
name and its current sensor telemetry, write a concise care report: assess each \
reading against healthy ranges for the plant, call out anything concerning, and \
give concrete watering, light, and soil recommendations. Plain prose, no markdown.";

/// Marker rendered for a sensor that has not reported.
const NOT_AVAILABLE: &str = "not available";

/// Render the user prompt for one report request.
///
/// Field order is fixed: moisture, temperature, humidity, light, pH. The pH
/// value renders with two decimals; other readings render as given.
pub fn build_prompt(plant_name: &str, snapshot: &TelemetrySnapshot) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Plant: {}", plant_name);
    let _ = writeln!(prompt, "Current sensor readings:");
    let _ = writeln!(
        prompt,
        "- Soil moisture: {}",
        render_unit(snapshot.soil_moisture, " %")
    );
    let _ = writeln!(
        prompt,
        "- Temperature: {}",
        render_unit(snapshot.temperature, " °C")
    );
    let _ = writeln!(
        prompt,
        "- Humidity: {}",
        render_unit(snapshot.humidity, " %")
    );
    let _ = writeln!(
        prompt,
        "- Light intensity: {}",
        render_unit(snapshot.light_lux, " lux")
    );
    let _ = writeln!(prompt, "- Soil pH: {}", render_ph(snapshot.soil_ph));
    let _ = write!(prompt, "Write the care report for this plant.");

    prompt
}

fn render_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn render_ph(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}
