use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;
use vidhost_core::{AppError, ItemMetadata, Playlist};

#[tracing::instrument(skip(state, metadata))]
pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    ValidatedJson(metadata): ValidatedJson<ItemMetadata>,
) -> Result<Json<Playlist>, HttpAppError> {
    metadata.validate().map_err(AppError::from)?;
    let playlist = state.host().create_playlist(&metadata).await?;
    Ok(Json(playlist))
}

pub async fn get_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Playlist>, HttpAppError> {
    let playlist = state.host().retrieve_playlist(&id).await?;
    Ok(Json(playlist))
}

#[tracing::instrument(skip(state, replacement))]
pub async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(replacement): ValidatedJson<Playlist>,
) -> Result<Json<Playlist>, HttpAppError> {
    let playlist = state.host().update_playlist(&id, &replacement).await?;
    Ok(Json(playlist))
}

#[tracing::instrument(skip(state))]
pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    state.host().delete_playlist(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn add_video_to_playlist(
    State(state): State<Arc<AppState>>,
    Path((playlist_id, video_id)): Path<(String, String)>,
) -> Result<StatusCode, HttpAppError> {
    state
        .host()
        .add_video_to_playlist(&video_id, &playlist_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
