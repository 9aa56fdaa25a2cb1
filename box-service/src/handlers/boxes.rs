use crate::dtos::{BoxRequest, GenerateBoxResponse};
use crate::services::metrics::record_generation;
use crate::services::GenerationError;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use std::time::Duration;
use validator::Validate;

pub async fn generate_box(
    State(state): State<AppState>,
    Json(request): Json<BoxRequest>,
) -> Result<Json<GenerateBoxResponse>, AppError> {
    if state.config.generator.require_positive_dimensions {
        request.validate()?;
    }

    // Resolved per request: the generator may be installed or removed while we run.
    let Some(executable) = state.locator.locate() else {
        let err = GenerationError::ExecutableNotFound {
            basis: state.locator.search_basis(),
        };
        tracing::warn!(error = %err, "Box generator not found");
        record_generation(err.outcome(), Duration::ZERO);
        return Err(err.into());
    };

    state.artifacts.ensure_output_dir().await?;
    let artifact = state.artifacts.allocate();

    state
        .generator
        .generate(&executable, &request, &artifact)
        .await?;

    Ok(Json(GenerateBoxResponse {
        svg_path: artifact.relative_path,
    }))
}
