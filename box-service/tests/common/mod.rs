#![allow(dead_code)]

use box_service::config::{BoxServiceConfig, GeneratorConfig, StorageConfig};
use box_service::services::{CandidateLocator, ExecutableLocator};
use box_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10mm" height="10mm"/>"#;

/// A generator that records its arguments and writes a fixed SVG to `--output`.
pub fn fake_generator(dir: &Path) -> PathBuf {
    let args_log = dir.join("generator-args.log");
    write_script(
        dir,
        "boxes",
        &format!(
            r#"printf '%s\n' "$@" > '{args_log}'
out=""
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
printf '%s' '{svg}' > "$out""#,
            args_log = args_log.display(),
            svg = TEST_SVG,
        ),
    )
}

/// A generator that always fails with a diagnostic on stderr.
pub fn failing_generator(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "boxes",
        "echo 'UniversalBox: error: thickness must be smaller than x' >&2\nexit 2",
    )
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).expect("Failed to create script directory");
    let path = bin.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

pub fn test_config(output_dir: PathBuf, executable: Option<PathBuf>) -> BoxServiceConfig {
    BoxServiceConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        generator: GeneratorConfig {
            executable,
            timeout_secs: 10,
            ..GeneratorConfig::default()
        },
        storage: StorageConfig {
            output_dir,
            url_prefix: "output".to_string(),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub workdir: TempDir,
}

impl TestApp {
    /// Spawn with a working fake generator.
    pub async fn spawn() -> Self {
        let workdir = TempDir::new().expect("Failed to create temp dir");
        let exe = fake_generator(workdir.path());
        Self::spawn_with(workdir, Some(exe)).await
    }

    /// Spawn with a generator that exits non-zero.
    pub async fn spawn_failing() -> Self {
        let workdir = TempDir::new().expect("Failed to create temp dir");
        let exe = failing_generator(workdir.path());
        Self::spawn_with(workdir, Some(exe)).await
    }

    /// Spawn with no locatable generator at all.
    pub async fn spawn_without_generator() -> Self {
        let workdir = TempDir::new().expect("Failed to create temp dir");
        Self::spawn_with(workdir, None).await
    }

    async fn spawn_with(workdir: TempDir, executable: Option<PathBuf>) -> Self {
        let output_dir = workdir.path().join("output");
        let config = test_config(output_dir.clone(), executable.clone());

        // Only the explicit candidate, so a real install on the host cannot leak in.
        let locator: Arc<dyn ExecutableLocator> =
            Arc::new(CandidateLocator::new(executable.into_iter().collect()));

        let app = Application::build_with_locator(config, locator)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            output_dir,
            workdir,
        }
    }

    pub fn args_log(&self) -> PathBuf {
        self.workdir.path().join("generator-args.log")
    }

    pub fn artifact_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub async fn generate_box(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/generate-box", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
