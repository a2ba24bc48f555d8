//! Report formatter: renders a generated report into a paginated document.
//!
//! Rendering is pure and single-pass. The telemetry section uses the same
//! field order and absence convention as the prompt builder so the document
//! and the prompt never disagree about what was measured. The only failure
//! mode is the sink: rendering itself cannot fail.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use verdant_common::{FormatError, TelemetrySnapshot};

/// Lines per page, footer included.
const PAGE_LINES: usize = 50;
/// Wrap width for the report body.
const WRAP_COLUMNS: usize = 80;

const NOT_AVAILABLE: &str = "N/A";

/// Render the full document. Header, identification line, telemetry section,
/// then the generated text verbatim (wrapped), split into numbered pages.
pub fn render(plant_name: &str, snapshot: &TelemetrySnapshot, report_text: &str) -> Vec<u8> {
    let mut lines: Vec<String> = Vec::new();

    lines.push(center("SMART PLANT REPORT"));
    lines.push(String::new());
    lines.push(format!("Plant: {}", plant_name));
    lines.push(String::new());
    lines.push("Sensor readings:".to_string());
    lines.push(format!(
        "  Soil moisture:   {}",
        unit_line(snapshot.soil_moisture, " %")
    ));
    lines.push(format!(
        "  Temperature:     {}",
        unit_line(snapshot.temperature, " °C")
    ));
    lines.push(format!(
        "  Humidity:        {}",
        unit_line(snapshot.humidity, " %")
    ));
    lines.push(format!(
        "  Light intensity: {}",
        unit_line(snapshot.light_lux, " lux")
    ));
    lines.push(format!("  Soil pH:         {}", ph_line(snapshot.soil_ph)));
    lines.push(String::new());
    lines.push("Generated care report:".to_string());
    lines.push(String::new());

    for paragraph in report_text.lines() {
        if paragraph.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrap(paragraph, WRAP_COLUMNS));
        }
    }

    paginate(&lines).into_bytes()
}

/// Write a rendered document under `dir`, creating it if needed.
/// Returns the path written; fails only when the sink cannot be opened.
pub fn write_document(
    dir: &Path,
    plant_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, FormatError> {
    fs::create_dir_all(dir).map_err(FormatError::SinkUnavailable)?;

    let path = dir.join(document_file_name(plant_name));
    fs::write(&path, bytes).map_err(FormatError::SinkUnavailable)?;

    info!("Report document written to {}", path.display());
    Ok(path)
}

/// File name for a plant's document. Path separators and whitespace in the
/// plant name are flattened so the name cannot escape the reports directory.
pub fn document_file_name(plant_name: &str) -> String {
    let safe: String = plant_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_report.txt", safe)
}

fn unit_line(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn ph_line(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn center(text: &str) -> String {
    if text.len() >= WRAP_COLUMNS {
        return text.to_string();
    }
    let pad = (WRAP_COLUMNS - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Split lines into pages of `PAGE_LINES`, each ending with a numbered
/// footer and a form feed between pages.
fn paginate(lines: &[String]) -> String {
    let body_lines = PAGE_LINES - 1;
    let page_count = lines.len().div_ceil(body_lines).max(1);
    let mut out = String::new();

    for (page, chunk) in lines.chunks(body_lines).enumerate() {
        for line in chunk {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&center(&format!("- page {} of {} -", page + 1, page_count)));
        out.push('\n');
        if page + 1 < page_count {
            out.push('\x0c');
        }
    }

    if lines.is_empty() {
        out.push_str(&center("- page 1 of 1 -"));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            soil_moisture: Some(45.0),
            temperature: Some(25.0),
            humidity: None,
            light_lux: Some(1000.0),
            soil_ph: Some(6.5),
        }
    }

    #[test]
    fn test_render_contains_sections_in_order() {
        let bytes = render("Tomato", &snapshot(), "Keep the soil moist.");
        let doc = String::from_utf8(bytes).unwrap();

        let header = doc.find("SMART PLANT REPORT").unwrap();
        let ident = doc.find("Plant: Tomato").unwrap();
        let telemetry = doc.find("Soil moisture").unwrap();
        let report = doc.find("Keep the soil moist.").unwrap();

        assert!(header < ident);
        assert!(ident < telemetry);
        assert!(telemetry < report);
    }

    #[test]
    fn test_absent_field_renders_marker() {
        let doc = String::from_utf8(render("Tomato", &snapshot(), "x")).unwrap();
        assert!(doc.contains("Humidity:        N/A"));
        assert!(doc.contains("Soil pH:         6.50"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let a = render("Tomato", &snapshot(), "Same input.");
        let b = render("Tomato", &snapshot(), "Same input.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_long_report_paginates() {
        let long_text = "Water regularly.\n".repeat(120);
        let doc = String::from_utf8(render("Tomato", &snapshot(), &long_text)).unwrap();

        assert!(doc.contains('\x0c'));
        assert!(doc.contains("- page 1 of"));
        assert!(doc.contains("- page 2 of"));
    }

    #[test]
    fn test_wrap_respects_width() {
        let long_line = "word ".repeat(60);
        for line in wrap(long_line.trim(), 40) {
            assert!(line.len() <= 40);
        }
    }

    #[test]
    fn test_write_document_creates_dir_and_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("reports");

        let path = write_document(&target, "Tomato", b"doc").unwrap();
        assert_eq!(path, target.join("Tomato_report.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"doc");
    }

    #[test]
    fn test_write_document_sink_unavailable() {
        let dir = tempdir().unwrap();
        // A file where the directory should be makes the sink unopenable.
        let blocker = dir.path().join("reports");
        fs::write(&blocker, b"").unwrap();

        let err = write_document(&blocker, "Tomato", b"doc").unwrap_err();
        assert!(matches!(err, FormatError::SinkUnavailable(_)));
    }

    #[test]
    fn test_document_file_name_flattens_separators() {
        assert_eq!(document_file_name("My Plant/2"), "My_Plant_2_report.txt");
    }
}
