//! Conversions between YouTube resources and the generic model

use chrono::{DateTime, Utc};
use vidhost_core::{AppError, AppResult, ItemMetadata, Playlist, Video, Visibility};

use super::types::{
    PlaylistSnippet, Status, Thumbnails, VideoSnippet, YoutubePlaylist, YoutubeVideo,
};
use crate::duration::iso8601_to_seconds;

const READ_ONLY_CHANGED: &str =
    r#"Attempted to change a read-only attribute (either "id", or "createdAt")"#;

fn parse_published_at(published_at: Option<&str>) -> AppResult<DateTime<Utc>> {
    let raw = published_at
        .ok_or_else(|| AppError::Unclassified(anyhow::anyhow!("missing publishedAt")))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| AppError::Unclassified(anyhow::anyhow!("invalid publishedAt {raw:?}: {e}")))
}

fn parse_visibility(status: &Status) -> AppResult<Visibility> {
    status
        .privacy_status
        .parse()
        .map_err(AppError::Unclassified)
}

fn thumbnail_url(thumbnails: Option<&Thumbnails>) -> String {
    thumbnails
        .and_then(|t| t.default.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

fn missing_parts(kind: &str, parts: &str) -> AppError {
    AppError::Unclassified(anyhow::anyhow!(
        "{kind} is missing some required parts ({parts})"
    ))
}

/// Duration in seconds, preferring the uploaded file's own duration.
///
/// `contentDetails.duration` is only filled in once processing has finished,
/// so right after an upload only `fileDetails` is reliable.
pub fn video_duration_seconds(video: &YoutubeVideo) -> u64 {
    if let Some(ms) = video.file_details.as_ref().and_then(|f| f.duration_ms) {
        return ms / 1000;
    }

    let Some(iso) = video
        .content_details
        .as_ref()
        .and_then(|c| c.duration.as_deref())
    else {
        return 0;
    };

    iso8601_to_seconds(iso).unwrap_or_else(|e| {
        tracing::debug!(video_id = %video.id, error = %e, "Ignoring unparsable video duration");
        0
    })
}

/// Requires the `snippet` and `status` parts
pub fn to_generic_video(video: &YoutubeVideo, watch_prefix: &str) -> AppResult<Video> {
    let (Some(snippet), Some(status)) = (&video.snippet, &video.status) else {
        return Err(missing_parts("video", "snippet or status"));
    };

    Ok(Video {
        id: video.id.clone(),
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        created_at: parse_published_at(snippet.published_at.as_deref())?,
        duration_seconds: video_duration_seconds(video),
        visibility: parse_visibility(status)?,
        thumbnail_url: thumbnail_url(snippet.thumbnails.as_ref()),
        watch_prefix: watch_prefix.to_string(),
    })
}

/// Requires the `snippet`, `status` and `contentDetails` parts
pub fn to_generic_playlist(playlist: &YoutubePlaylist) -> AppResult<Playlist> {
    let (Some(snippet), Some(status), Some(details)) = (
        &playlist.snippet,
        &playlist.status,
        &playlist.content_details,
    ) else {
        return Err(missing_parts("playlist", "snippet, contentDetails or status"));
    };

    Ok(Playlist {
        id: playlist.id.clone(),
        item_count: details.item_count.unwrap_or(0),
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        created_at: parse_published_at(snippet.published_at.as_deref())?,
        visibility: parse_visibility(status)?,
        thumbnail_url: thumbnail_url(snippet.thumbnails.as_ref()),
    })
}

/// Resource sent to `videos.insert`
pub fn new_video(metadata: &ItemMetadata, category_id: &str) -> YoutubeVideo {
    YoutubeVideo {
        snippet: Some(VideoSnippet {
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            category_id: Some(category_id.to_string()),
            ..VideoSnippet::default()
        }),
        status: Some(Status {
            privacy_status: metadata.visibility.to_string(),
            ..Status::default()
        }),
        ..YoutubeVideo::default()
    }
}

/// Resource sent to `playlists.insert`
pub fn new_playlist(metadata: &ItemMetadata) -> YoutubePlaylist {
    YoutubePlaylist {
        snippet: Some(PlaylistSnippet {
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            ..PlaylistSnippet::default()
        }),
        status: Some(Status {
            privacy_status: metadata.visibility.to_string(),
            ..Status::default()
        }),
        ..YoutubePlaylist::default()
    }
}

fn ensure_same_identity(
    current_id: &str,
    current_published_at: Option<&str>,
    patch_id: &str,
    patch_created_at: &DateTime<Utc>,
) -> AppResult<()> {
    let created_at = parse_published_at(current_published_at)?;
    if patch_id != current_id || *patch_created_at != created_at {
        return Err(AppError::validation(READ_ONLY_CHANGED));
    }
    Ok(())
}

/// Copy the mutable attributes of `patch` onto `src`.
///
/// `src` is left untouched when `patch` tries to change `id` or `createdAt`.
pub fn patch_video(src: &mut YoutubeVideo, patch: &Video) -> AppResult<()> {
    let (Some(snippet), Some(status)) = (src.snippet.as_mut(), src.status.as_mut()) else {
        return Err(missing_parts("video", "snippet or status"));
    };

    ensure_same_identity(
        &src.id,
        snippet.published_at.as_deref(),
        &patch.id,
        &patch.created_at,
    )?;

    snippet.title = patch.title.clone();
    snippet.description = patch.description.clone();
    status.privacy_status = patch.visibility.to_string();
    Ok(())
}

/// Playlist counterpart of [`patch_video`]
pub fn patch_playlist(src: &mut YoutubePlaylist, patch: &Playlist) -> AppResult<()> {
    let (Some(snippet), Some(status)) = (src.snippet.as_mut(), src.status.as_mut()) else {
        return Err(missing_parts("playlist", "snippet or status"));
    };

    ensure_same_identity(
        &src.id,
        snippet.published_at.as_deref(),
        &patch.id,
        &patch.created_at,
    )?;

    snippet.title = patch.title.clone();
    snippet.description = patch.description.clone();
    status.privacy_status = patch.visibility.to_string();
    Ok(())
}
