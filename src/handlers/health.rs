use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use std::time::SystemTime;
use tracing::info;

use crate::models::{HealthResponse, ReadyResponse};
use crate::state::AppState;

/// Liveness of this process; does not touch the converter.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    let rate_limiting = state.limiter.stats();

    info!(
        total_requests = rate_limiting.total_requests,
        rejected_requests = rate_limiting.rejected_requests,
        "Health check completed"
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        converter_url: state.converter.base_url().to_string(),
        rate_limiting,
    })
}

/// Readiness check endpoint: ready only while the converter answers.
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    match state.converter.health_check().await {
        Ok(()) => {
            info!("Readiness check passed");
            (
                StatusCode::OK,
                Json(ReadyResponse {
                    ready: true,
                    converter: "healthy".to_string(),
                }),
            )
        }
        Err(e) => {
            info!(error = %e, "Readiness check failed - converter unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    converter: e.to_string(),
                }),
            )
        }
    }
}
