use crate::config::GeneratorConfig;
use crate::dtos::BoxRequest;
use crate::services::artifacts::Artifact;
use crate::services::error::GenerationError;
use crate::services::executor::CommandExecutor;
use crate::services::metrics::record_generation;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Drives the external generator for one request at a time per permit.
#[derive(Clone)]
pub struct BoxGenerator {
    executor: CommandExecutor,
    subcommand: String,
    permits: Arc<Semaphore>,
}

impl BoxGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            executor: CommandExecutor::new(config.timeout()),
            subcommand: config.subcommand.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Argument vector for the generator. The tool's footprint is `x` by `y`
    /// with height `h`, so depth maps to `--y` and height to `--h`.
    pub fn build_args(&self, request: &BoxRequest, output_path: &Path) -> Vec<OsString> {
        vec![
            self.subcommand.clone().into(),
            "--x".into(),
            request.width.to_string().into(),
            "--y".into(),
            request.depth.to_string().into(),
            "--h".into(),
            request.height.to_string().into(),
            "--thickness".into(),
            request.thickness.to_string().into(),
            "--format".into(),
            "svg".into(),
            "--output".into(),
            output_path.as_os_str().to_os_string(),
        ]
    }

    pub async fn generate(
        &self,
        executable: &Path,
        request: &BoxRequest,
        artifact: &Artifact,
    ) -> Result<(), GenerationError> {
        let start = Instant::now();
        let result = self.run(executable, request, artifact).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => {
                record_generation("success", elapsed);
                tracing::info!(
                    artifact_id = %artifact.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Box generated"
                );
            }
            Err(err) => record_generation(err.outcome(), elapsed),
        }

        result
    }

    async fn run(
        &self,
        executable: &Path,
        request: &BoxRequest,
        artifact: &Artifact,
    ) -> Result<(), GenerationError> {
        let args = self.build_args(request, &artifact.absolute_path);

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| GenerationError::Io(std::io::Error::other(e)))?;

        let output = self.executor.execute(executable, &args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                executable = %executable.display(),
                status = %output.status,
                stderr = %stderr,
                "Error generating box"
            );
            return Err(GenerationError::ToolFailed {
                status: output.status,
                stderr,
            });
        }

        if !tokio::fs::try_exists(&artifact.absolute_path).await? {
            tracing::error!(
                executable = %executable.display(),
                path = %artifact.absolute_path.display(),
                "Generator reported success without writing output"
            );
            return Err(GenerationError::MissingOutput {
                path: artifact.absolute_path.clone(),
            });
        }

        Ok(())
    }
}
