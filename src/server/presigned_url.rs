//! `GET /api/presigned-url?filePath=<key>`
//!
//! 200 `{url}` | 400 missing key | 405 non-GET | 500 signing failure

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::Method,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::{ApiError, ServerState};
use crate::presign::PresignedUrlBody;

#[derive(Debug, Default, Deserialize)]
pub struct PresignQuery {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
}

pub async fn presigned_url(
    method: Method,
    State(state): State<ServerState>,
    query: Result<Query<PresignQuery>, QueryRejection>,
) -> Result<Json<PresignedUrlBody>, ApiError> {
    // Method first: a bad query on a POST is still a 405
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed("GET"));
    }

    let Query(query) = query.map_err(|e| {
        tracing::debug!("Rejected query string: {}", e);
        ApiError::BadRequest("filePath is required".to_string())
    })?;

    let file_path = query
        .file_path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("filePath is required".to_string()))?;

    let presigner = state.presigner.as_ref().map_err(|e| {
        tracing::error!("Presigner unavailable: {}", e);
        signing_failed()
    })?;

    let url = presigner.presign_get(&file_path, Utc::now()).map_err(|e| {
        tracing::error!("Failed to sign {}: {}", file_path, e);
        signing_failed()
    })?;

    tracing::debug!(
        file_path = %file_path,
        expires_secs = presigner.expires_secs(),
        "Issued presigned URL"
    );

    Ok(Json(PresignedUrlBody { url }))
}

fn signing_failed() -> ApiError {
    ApiError::Internal("Failed to generate presigned URL".to_string())
}
