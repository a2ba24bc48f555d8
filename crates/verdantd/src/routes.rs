//! API routes for verdantd.
//!
//! `GET /api/data` proxies the telemetry store; `POST /generate-report`
//! drives the prompt builder, the report gateway, and optionally the
//! document formatter. Rendered documents are served statically under
//! `/reports` by the server module.

use crate::formatter;
use crate::gateway::GenerationTransport;
use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use verdant_common::{ErrorBody, GenerationError, ReportRequest, ReportResponse, TelemetrySnapshot};

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn data_routes<T: GenerationTransport + 'static>() -> Router<Arc<AppState<T>>> {
    Router::new().route("/api/data", get(get_data))
}

pub fn report_routes<T: GenerationTransport + 'static>() -> Router<Arc<AppState<T>>> {
    Router::new().route("/generate-report", post(generate_report))
}

async fn get_data<T: GenerationTransport>(
    State(state): State<Arc<AppState<T>>>,
) -> Result<Json<Value>, ApiError> {
    let tree = state.reader.read_raw().await.map_err(|e| {
        error!("Telemetry read failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("store_unavailable", "Failed to fetch data")),
        )
    })?;

    Ok(Json(tree))
}

async fn generate_report<T: GenerationTransport>(
    State(state): State<Arc<AppState<T>>>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let plant_name = req.plant_name.trim().to_string();
    if plant_name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("missing_field", "plantName must be non-empty")),
        ));
    }

    info!("Generating report for plant '{}'", plant_name);

    // Client-supplied telemetry wins; otherwise read the store once.
    let (snapshot, sensor_echo) = match req.sensor_data {
        Some(tree) => (TelemetrySnapshot::from_store_tree(&tree), tree),
        None => {
            let snapshot = state.reader.read().await.map_err(|e| {
                error!("Telemetry read failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("store_unavailable", e.to_string())),
                )
            })?;
            let echo = serde_json::to_value(&snapshot).unwrap_or(Value::Null);
            (snapshot, echo)
        }
    };

    let prompt = build_prompt(&plant_name, &snapshot);

    // axum drops the handler future on client disconnect, which cancels the
    // in-flight attempt; the token is the explicit handle for library use.
    let cancel = CancellationToken::new();
    let report = state
        .gateway
        .generate(SYSTEM_INSTRUCTION, &prompt, &cancel)
        .await
        .map_err(generation_error_response)?;

    let report_url = if req.document {
        let bytes = formatter::render(&plant_name, &snapshot, &report);
        formatter::write_document(&state.reports_dir, &plant_name, &bytes).map_err(|e| {
            error!("Document write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("sink_unavailable", e.to_string())),
            )
        })?;
        Some(format!(
            "/reports/{}",
            formatter::document_file_name(&plant_name)
        ))
    } else {
        None
    };

    Ok(Json(ReportResponse {
        plant_name,
        sensor_data: sensor_echo,
        report,
        report_url,
    }))
}

/// Map the gateway taxonomy onto HTTP statuses: exhausted rate limits pass
/// through as 429, upstream and network faults are gateway errors, an empty
/// generation is an internal failure.
fn generation_error_response(e: GenerationError) -> ApiError {
    let status = match e {
        GenerationError::RateLimitExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
        GenerationError::UpstreamError(_) | GenerationError::NetworkError(_) => {
            StatusCode::BAD_GATEWAY
        }
        GenerationError::EmptyGeneration | GenerationError::Cancelled => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    error!("Report generation failed: {}", e);
    (status, Json(ErrorBody::new(e.kind(), e.to_string())))
}
