use crate::services::error::GenerationError;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Runs a program with a discrete argument vector (never through a shell),
/// capturing stdout and stderr. Exit status interpretation is left to the caller.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    timeout: Duration,
}

impl CommandExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn execute(
        &self,
        program: &Path,
        args: &[OsString],
    ) -> Result<Output, GenerationError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out child is killed when its future is dropped.
            .kill_on_drop(true);

        tracing::debug!(
            program = %program.display(),
            args = ?args,
            timeout_secs = %self.timeout.as_secs(),
            "Executing command"
        );

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| GenerationError::TimedOut {
                secs: self.timeout.as_secs(),
            })??;

        tracing::debug!(
            program = %program.display(),
            status = %output.status,
            stdout_size = output.stdout.len(),
            stderr_size = output.stderr.len(),
            "Command finished"
        );

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_output_and_status() {
        let executor = CommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute(
                Path::new("/bin/sh"),
                &["-c".into(), "echo out; echo err >&2; exit 3".into()],
            )
            .await
            .unwrap();

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "err");
    }

    #[tokio::test]
    async fn arguments_are_not_shell_interpreted() {
        let executor = CommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute(Path::new("/bin/echo"), &["$(whoami); rm -rf /".into()])
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "$(whoami); rm -rf /"
        );
    }

    #[tokio::test]
    async fn slow_commands_time_out() {
        let executor = CommandExecutor::new(Duration::from_millis(100));
        let err = executor
            .execute(Path::new("/bin/sleep"), &["5".into()])
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_an_io_error() {
        let executor = CommandExecutor::new(Duration::from_secs(5));
        let err = executor
            .execute(Path::new("/definitely/not/here"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Io(_)));
    }
}
