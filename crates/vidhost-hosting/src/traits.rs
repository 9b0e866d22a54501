//! Video host abstraction
//!
//! A [`VideoHost`] translates the generic domain model to one provider's native
//! representation. Every method fails with a [`RequestError`](vidhost_core::RequestError)
//! (wrapped in `AppError::Request`) when the provider answered with an error status,
//! so callers can propagate the status unchanged.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use vidhost_core::{AppResult, ItemMetadata, Playlist, Video};

/// Upload progress callback, called with `(bytes_sent, total_bytes)`.
///
/// Called from the transfer path; implementations must not block.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Upload `content` as a new video and return it with its derived attributes
    async fn create_video(
        &self,
        metadata: &ItemMetadata,
        content: Bytes,
        on_progress: Option<ProgressFn>,
    ) -> AppResult<Video>;

    /// Fetch a video. A missing video is a 404 `RequestError`.
    async fn retrieve_video(&self, id: &str) -> AppResult<Video>;

    /// Apply the mutable attributes of `replacement` (title, description,
    /// visibility) to the video `id`.
    ///
    /// Fails with a validation error, before any mutation, when `replacement`
    /// carries a different `id` or `created_at` than the stored video.
    async fn update_video(&self, id: &str, replacement: &Video) -> AppResult<Video>;

    async fn delete_video(&self, id: &str) -> AppResult<()>;

    async fn create_playlist(&self, metadata: &ItemMetadata) -> AppResult<Playlist>;

    async fn retrieve_playlist(&self, id: &str) -> AppResult<Playlist>;

    /// Same contract as [`VideoHost::update_video`], for playlists
    async fn update_playlist(&self, id: &str, replacement: &Playlist) -> AppResult<Playlist>;

    async fn delete_playlist(&self, id: &str) -> AppResult<()>;

    async fn add_video_to_playlist(&self, video_id: &str, playlist_id: &str) -> AppResult<()>;

    /// Replace the thumbnail of a video with the given image bytes
    async fn set_thumbnail(&self, video_id: &str, content: Bytes) -> AppResult<()>;

    /// URL prefix to which a video id can be appended to watch it
    fn watch_prefix(&self) -> &str;
}
