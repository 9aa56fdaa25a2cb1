use service_core::error::AppError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("box generator executable not found; searched {basis}. Install it with 'pip install boxes' or set generator.executable")]
    ExecutableNotFound { basis: String },

    #[error("Boxes failed: {stderr}")]
    ToolFailed { status: ExitStatus, stderr: String },

    #[error("box generator exited successfully but did not write {}", path.display())]
    MissingOutput { path: PathBuf },

    #[error("box generator timed out after {secs} seconds")]
    TimedOut { secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Label for the `box_generations_total` outcome dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            GenerationError::ExecutableNotFound { .. } => "executable_not_found",
            GenerationError::ToolFailed { .. } => "tool_failure",
            GenerationError::MissingOutput { .. } => "missing_output",
            GenerationError::TimedOut { .. } => "timeout",
            GenerationError::Io(_) => "error",
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::ExecutableNotFound { .. } => {
                AppError::ConfigError(anyhow::Error::new(err))
            }
            GenerationError::ToolFailed { .. } | GenerationError::MissingOutput { .. } => {
                AppError::ExternalToolError(err.to_string())
            }
            GenerationError::TimedOut { .. } | GenerationError::Io(_) => {
                AppError::InternalError(anyhow::Error::new(err))
            }
        }
    }
}
