//! Document downloads from the docs directory.
use crate::{error::AppError, telemetry, validation::validate_download_name, AppState};
use axum::{
    extract::{Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use metrics::counter;
use portal_common::DownloadQuery;
use std::io::{self, ErrorKind};
use tokio::fs;
use tracing::{info, warn};

fn file_error(err: io::Error) -> AppError {
    match err.kind() {
        ErrorKind::NotFound => AppError::NotFound("File not found".to_string()),
        ErrorKind::PermissionDenied => {
            AppError::Forbidden("Permission denied while accessing the file".to_string())
        },
        _ => AppError::Io(err),
    }
}

/// Serve a file from the docs directory as an attachment
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let name = validate_download_name(query.file.as_deref())?;

    let base = fs::canonicalize(&state.settings.docs_dir)
        .await
        .map_err(|err| {
            warn!(%err, docs_dir = %state.settings.docs_dir.display(), "docs directory unavailable");
            AppError::NotFound("File not found".to_string())
        })?;
    let path = fs::canonicalize(base.join(&name)).await.map_err(file_error)?;

    // Symlinks may still point outside the docs directory.
    if !path.starts_with(&base) {
        warn!(file = %name, "download outside docs directory refused");
        return Err(AppError::Forbidden("Unauthorized access attempt!".to_string()));
    }
    if !fs::metadata(&path).await.map_err(file_error)?.is_file() {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let bytes = fs::read(&path).await.map_err(file_error)?;
    counter!(telemetry::DOWNLOAD_SERVED).increment(1);
    info!(file = %name, size = bytes.len(), "download served");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/octet-stream".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
        ],
        bytes,
    )
        .into_response())
}
