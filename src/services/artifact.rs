use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, AppResult, ArtifactError},
    models::SimilarityArtifact,
};

/// Facts about the artifact file captured when it was loaded
#[derive(Debug, Clone, Default)]
pub struct ArtifactFileInfo {
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub load_time: Duration,
}

/// A validated artifact together with its file facts
#[derive(Debug)]
pub struct LoadedArtifact {
    pub artifact: SimilarityArtifact,
    pub file: ArtifactFileInfo,
}

type LoadOutcome = Result<Arc<LoadedArtifact>, Arc<ArtifactError>>;

/// Process-wide holder for the similarity artifact.
///
/// The first call to [`ArtifactStore::get`] reads and validates the file;
/// every later call returns the same outcome, including a failed one. A new
/// artifact is only picked up by restarting the process.
#[derive(Debug)]
pub struct ArtifactStore {
    path: PathBuf,
    cell: OnceCell<LoadOutcome>,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Wraps an artifact that is already in memory
    pub fn preloaded(artifact: SimilarityArtifact) -> Self {
        let loaded = LoadedArtifact {
            artifact,
            file: ArtifactFileInfo::default(),
        };
        Self {
            path: PathBuf::new(),
            cell: OnceCell::new_with(Some(Ok(Arc::new(loaded)))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    /// Returns the artifact, loading it on first use
    pub async fn get(&self) -> AppResult<Arc<LoadedArtifact>> {
        self.cell
            .get_or_init(|| Self::load(self.path.clone()))
            .await
            .clone()
            .map_err(AppError::ArtifactUnavailable)
    }

    /// Loads eagerly at startup; a failure is logged and kept for later callers
    pub async fn preload(&self) {
        if let Err(e) = self.get().await {
            tracing::error!(error = %e, path = %self.path.display(), "Artifact preload failed");
        }
    }

    async fn load(path: PathBuf) -> LoadOutcome {
        tracing::info!(path = %path.display(), "Loading similarity artifact");
        let started = Instant::now();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Arc::new(ArtifactError::Missing(path)));
            }
            Err(source) => return Err(Arc::new(ArtifactError::Io { path, source })),
        };

        let last_modified = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);
        let size_bytes = bytes.len() as u64;

        let artifact = tokio::task::spawn_blocking(move || SimilarityArtifact::from_json_slice(&bytes))
            .await
            .map_err(|e| ArtifactError::Malformed(format!("artifact parsing task failed: {}", e)))
            .and_then(|parsed| parsed)
            .map_err(|e| {
                tracing::error!(error = %e, path = %path.display(), "Artifact rejected");
                Arc::new(e)
            })?;

        let load_time = started.elapsed();
        tracing::info!(
            movies = artifact.len(),
            version = artifact.build_info().version.as_deref().unwrap_or("unknown"),
            size_bytes,
            load_ms = load_time.as_millis() as u64,
            "Similarity artifact loaded"
        );

        Ok(Arc::new(LoadedArtifact {
            artifact,
            file: ArtifactFileInfo {
                size_bytes,
                last_modified,
                load_time,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::fixtures::{abc, ABC_JSON};

    fn temp_artifact_path() -> PathBuf {
        std::env::temp_dir().join(format!("artifact-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_loads_once_and_memoizes() {
        let path = temp_artifact_path();
        tokio::fs::write(&path, ABC_JSON).await.unwrap();

        let store = ArtifactStore::new(&path);
        assert!(!store.is_loaded());

        let first = store.get().await.unwrap();
        assert_eq!(first.artifact.len(), 3);
        assert_eq!(first.file.size_bytes, ABC_JSON.len() as u64);
        assert!(store.is_loaded());

        // The file is no longer read once cached
        tokio::fs::remove_file(&path).await.unwrap();
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_missing_file_fails_for_every_caller() {
        let path = temp_artifact_path();
        let store = ArtifactStore::new(&path);

        let err = store.get().await.unwrap_err();
        assert!(matches!(err, AppError::ArtifactUnavailable(ref e) if matches!(**e, ArtifactError::Missing(_))));

        // A file appearing later is not picked up without a restart
        tokio::fs::write(&path, ABC_JSON).await.unwrap();
        assert!(store.get().await.is_err());
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_file_is_unavailable() {
        let path = temp_artifact_path();
        tokio::fs::write(&path, r#"{"titles": ["A"], "ids": []}"#)
            .await
            .unwrap();

        let store = ArtifactStore::new(&path);
        store.preload().await;
        let err = store.get().await.unwrap_err();
        assert!(matches!(err, AppError::ArtifactUnavailable(ref e) if matches!(**e, ArtifactError::Malformed(_))));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_preloaded_store() {
        let store = ArtifactStore::preloaded(abc());
        assert!(store.is_loaded());
        assert_eq!(store.get().await.unwrap().artifact.title(0), "A");
    }
}
