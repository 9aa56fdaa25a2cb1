use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "box-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready when the generator can be located and the output directory exists.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    if state.locator.locate().is_none() {
        let basis = state.locator.search_basis();
        tracing::warn!(basis = %basis, "Not ready: box generator not found");
        return Err(AppError::ServiceUnavailable(format!(
            "box generator not found; searched {}",
            basis
        )));
    }

    state.artifacts.ensure_output_dir().await.map_err(|e| {
        tracing::warn!(error = %e, "Not ready: output directory unavailable");
        AppError::ServiceUnavailable(format!("output directory unavailable: {}", e))
    })?;

    Ok(StatusCode::OK)
}
