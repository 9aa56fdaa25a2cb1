use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// A generated drawing: where the generator writes it and how clients fetch it.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub id: Uuid,
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub relative_path: String,
}

/// Owns the output directory. Append-only; files are never pruned.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
    url_prefix: String,
}

impl ArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            url_prefix: url_prefix.trim_matches('/').to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub async fn ensure_output_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_dir).await
    }

    /// Reserve a fresh, collision-resistant name. Nothing is written to disk.
    pub fn allocate(&self) -> Artifact {
        let id = Uuid::new_v4();
        let file_name = format!("box_{}.svg", id);

        Artifact {
            id,
            absolute_path: self.output_dir.join(&file_name),
            relative_path: format!("{}/{}", self.url_prefix, file_name),
            file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn allocate_builds_matching_paths() {
        let store = ArtifactStore::new("/srv/boxes/output", "output");
        let artifact = store.allocate();

        assert_eq!(artifact.file_name, format!("box_{}.svg", artifact.id));
        assert_eq!(
            artifact.absolute_path,
            PathBuf::from("/srv/boxes/output").join(&artifact.file_name)
        );
        assert_eq!(
            artifact.relative_path,
            format!("output/box_{}.svg", artifact.id)
        );
    }

    #[test]
    fn allocations_never_collide() {
        let store = ArtifactStore::new("/tmp/out", "output");
        let a = store.allocate();
        let b = store.allocate();
        assert_ne!(a.id, b.id);
        assert_ne!(a.absolute_path, b.absolute_path);
    }

    #[test]
    fn url_prefix_slashes_are_trimmed() {
        let store = ArtifactStore::new("/tmp/out", "/files/");
        assert_eq!(store.url_prefix(), "files");
        assert!(store.allocate().relative_path.starts_with("files/box_"));
    }

    #[tokio::test]
    async fn ensure_output_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested/output"), "output");

        store.ensure_output_dir().await.unwrap();
        store.ensure_output_dir().await.unwrap();
        assert!(store.output_dir().is_dir());
    }
}
