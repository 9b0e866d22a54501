use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use vidhost_core::{AppError, ItemMetadata, Video};

/// Body required to upload a video from object storage to the video host
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoBody {
    #[serde(flatten)]
    pub metadata: ItemMetadata,
    /// Key of the content in object storage
    pub storage_key: String,
    /// Identifier progress events are published under; generated when absent
    #[serde(default)]
    pub job_id: Option<String>,
}

#[tracing::instrument(skip(state, body))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateVideoBody>,
) -> Result<Json<Video>, HttpAppError> {
    if body.storage_key.trim().is_empty() {
        return Err(AppError::validation("No storage key provided").into());
    }

    let job_id = body
        .job_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Run detached so a client disconnect does not abort a transfer in flight
    let service = state.service.clone();
    let upload = tokio::spawn(async move {
        service
            .upload_video_from_storage(&job_id, &body.storage_key, Some(&body.metadata))
            .await
    });

    let video = upload
        .await
        .map_err(|e| AppError::Internal(format!("upload task failed: {e}")))??;

    Ok(Json(video))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video = state.host().retrieve_video(&id).await?;
    Ok(Json(video))
}

#[tracing::instrument(skip(state, replacement))]
pub async fn update_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(replacement): ValidatedJson<Video>,
) -> Result<Json<Video>, HttpAppError> {
    let video = state.host().update_video(&id, &replacement).await?;
    Ok(Json(video))
}

#[tracing::instrument(skip(state))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    state.host().delete_video(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn set_video_thumbnail(
    State(state): State<Arc<AppState>>,
    Path((id, thumbnail_key)): Path<(String, String)>,
) -> Result<StatusCode, HttpAppError> {
    state
        .service
        .set_video_thumbnail_from_storage(&id, &thumbnail_key)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
