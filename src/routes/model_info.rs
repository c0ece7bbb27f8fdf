use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, ArtifactError},
    models::BuildInfo,
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfoResponse {
    pub metadata: BuildInfo,
    pub file_size: String,
    pub total_movies: usize,
    pub last_modified: Option<DateTime<Utc>>,
    pub load_time_ms: u64,
    pub model_loaded: bool,
}

fn megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Descriptive information about the loaded artifact
pub async fn model_info(State(state): State<Arc<AppState>>) -> AppResult<Json<ModelInfoResponse>> {
    let loaded = state.artifacts.get().await.map_err(|e| match e {
        AppError::ArtifactUnavailable(err) if matches!(*err, ArtifactError::Missing(_)) => {
            AppError::NotFound("Model file not found".to_string())
        }
        other => other,
    })?;

    Ok(Json(ModelInfoResponse {
        metadata: loaded.artifact.build_info().clone(),
        file_size: megabytes(loaded.file.size_bytes),
        total_movies: loaded.artifact.len(),
        last_modified: loaded.file.last_modified,
        load_time_ms: loaded.file.load_time.as_millis() as u64,
        model_loaded: state.artifacts.is_loaded(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabytes() {
        assert_eq!(megabytes(0), "0.00 MB");
        assert_eq!(megabytes(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }
}
