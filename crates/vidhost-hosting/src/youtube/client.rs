use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use vidhost_core::{AppError, AppResult, ItemMetadata, Playlist, Video, YoutubeConfig};

use super::auth::{TokenSource, YoutubeCredentials};
use super::convert;
use super::types::{
    GoogleErrorResponse, ListResponse, PlaylistItem, PlaylistItemSnippet, ResourceId,
    YoutubePlaylist, YoutubeVideo,
};
use super::{
    DEFAULT_API_BASE_URL, DEFAULT_CATEGORY_ID, DEFAULT_TOKEN_URL, DEFAULT_UPLOAD_BASE_URL,
    YOUTUBE_WATCH_PREFIX,
};
use crate::error::ProviderError;
use crate::traits::{ProgressFn, VideoHost};

const VIDEO_PARTS: &str = "contentDetails,id,snippet,status,fileDetails";
const VIDEO_INSERT_PARTS: &str = "id,snippet,status,contentDetails";
const VIDEO_UPDATE_PARTS: &str = "snippet,status,contentDetails,id";
const PLAYLIST_PARTS: &str = "snippet,status,contentDetails";

/// Options of the YouTube host
#[derive(Debug, Clone)]
pub struct YoutubeOptions {
    /// Category assigned to uploaded videos
    pub category_id: String,
    pub api_base_url: String,
    pub upload_base_url: String,
    pub token_url: String,
    pub connect_timeout_seconds: u64,
    /// Size of the media chunks handed to the transport; progress is reported per chunk
    pub upload_chunk_size: usize,
}

impl Default for YoutubeOptions {
    fn default() -> Self {
        Self {
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            connect_timeout_seconds: 30,
            upload_chunk_size: 256 * 1024,
        }
    }
}

/// [`VideoHost`] backed by the YouTube Data API v3
pub struct YoutubeHost {
    http_client: Client,
    options: YoutubeOptions,
    tokens: TokenSource,
}

impl Debug for YoutubeHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("YoutubeHost")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl YoutubeHost {
    pub fn new(credentials: YoutubeCredentials, options: YoutubeOptions) -> AppResult<Self> {
        // No overall timeout: uploads take as long as the file needs
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client for YouTube: {e}")))?;

        let tokens = TokenSource::new(credentials, options.token_url.clone());

        Ok(Self {
            http_client,
            options,
            tokens,
        })
    }

    pub fn from_config(config: &YoutubeConfig) -> AppResult<Self> {
        fn required(value: &Option<String>, name: &str) -> AppResult<String> {
            value
                .clone()
                .ok_or_else(|| AppError::Config(format!("{name} is required for the youtube host")))
        }

        let credentials = YoutubeCredentials {
            client_id: required(&config.client_id, "YT_CLIENT_ID")?,
            client_secret: required(&config.client_secret, "YT_CLIENT_SECRET")?,
            refresh_token: required(&config.refresh_token, "YT_REFRESH_TOKEN")?,
        };

        let defaults = YoutubeOptions::default();
        let options = YoutubeOptions {
            category_id: config.category_id.clone(),
            api_base_url: config.api_base_url.clone().unwrap_or(defaults.api_base_url),
            upload_base_url: config
                .upload_base_url
                .clone()
                .unwrap_or(defaults.upload_base_url),
            token_url: config.token_url.clone().unwrap_or(defaults.token_url),
            ..defaults
        };

        Self::new(credentials, options)
    }

    fn api_url(&self, resource: &str) -> String {
        format!("{}/{}", self.options.api_base_url.trim_end_matches('/'), resource)
    }

    fn upload_url(&self, resource: &str) -> String {
        format!(
            "{}/{}",
            self.options.upload_base_url.trim_end_matches('/'),
            resource
        )
    }

    /// Authorize and send a request, turning error statuses into [`ProviderError::Status`]
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let token = self.tokens.access_token(&self.http_client).await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let err = error_from_response(response).await;
        tracing::warn!(error = %err, "YouTube API call failed");
        Err(err)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        self.execute(request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// Retrieve a YouTube video with every part needed by the generic model
    async fn get_youtube_video(&self, id: &str) -> Result<YoutubeVideo, ProviderError> {
        let request = self
            .http_client
            .get(self.api_url("videos"))
            .query(&[("part", VIDEO_PARTS), ("id", id)]);

        let list: ListResponse<YoutubeVideo> = self.execute_json(request).await?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::missing(format!("video {id} not found")))
    }

    async fn get_youtube_playlist(&self, id: &str) -> Result<YoutubePlaylist, ProviderError> {
        let request = self
            .http_client
            .get(self.api_url("playlists"))
            .query(&[("part", PLAYLIST_PARTS), ("id", id)]);

        let list: ListResponse<YoutubePlaylist> = self.execute_json(request).await?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::missing(format!("playlist {id} not found")))
    }
}

async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GoogleErrorResponse>(&text)
        .ok()
        .map(|body| body.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            }
        });

    ProviderError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Body of a `multipart/related` upload: the JSON resource, then the media
///
/// The media is handed to the transport in chunks and `on_progress` is called
/// with the running byte count as each chunk leaves.
struct MultipartUpload {
    boundary: String,
    body: Body,
    length: u64,
}

impl MultipartUpload {
    fn new(
        resource: &[u8],
        media: Bytes,
        chunk_size: usize,
        on_progress: Option<ProgressFn>,
    ) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let boundary = format!("vidhost_boundary_{nanos:x}");

        let mut head = format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n"
        )
        .into_bytes();
        head.extend_from_slice(resource);
        head.extend_from_slice(
            format!("\r\n--{boundary}\r\nContent-Type: application/octet-stream\r\n\r\n")
                .as_bytes(),
        );
        let tail = format!("\r\n--{boundary}--\r\n").into_bytes();

        let total = media.len() as u64;
        let length = (head.len() + tail.len()) as u64 + total;

        let chunk_size = chunk_size.max(1);
        let chunks: Vec<Bytes> = (0..media.len())
            .step_by(chunk_size)
            .map(|start| media.slice(start..(start + chunk_size).min(media.len())))
            .collect();

        let mut sent = 0u64;
        let media_stream = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            if let Some(callback) = &on_progress {
                callback(sent, total);
            }
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let stream = stream::once(async move { Ok::<Bytes, std::io::Error>(Bytes::from(head)) })
            .chain(media_stream)
            .chain(stream::once(async move {
                Ok::<Bytes, std::io::Error>(Bytes::from(tail))
            }));

        Self {
            boundary,
            body: Body::wrap_stream(stream),
            length,
        }
    }
}

/// Thumbnails must be uploaded with an image content type
fn image_content_type(content: &[u8]) -> &'static str {
    if content.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl VideoHost for YoutubeHost {
    #[tracing::instrument(skip(self, metadata, content, on_progress), fields(size_bytes = content.len()))]
    async fn create_video(
        &self,
        metadata: &ItemMetadata,
        content: Bytes,
        on_progress: Option<ProgressFn>,
    ) -> AppResult<Video> {
        let resource = convert::new_video(metadata, &self.options.category_id);
        let resource = serde_json::to_vec(&resource)
            .map_err(|e| AppError::Internal(format!("Failed to serialize video resource: {e}")))?;

        let upload = MultipartUpload::new(
            &resource,
            content,
            self.options.upload_chunk_size,
            on_progress,
        );

        let request = self
            .http_client
            .post(self.upload_url("videos"))
            .query(&[("uploadType", "multipart"), ("part", VIDEO_INSERT_PARTS)])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", upload.boundary),
            )
            .header(CONTENT_LENGTH, upload.length)
            .body(upload.body);

        let inserted: YoutubeVideo = self.execute_json(request).await?;
        tracing::info!(video_id = %inserted.id, "Video uploaded to YouTube");

        // The insert response lacks fileDetails, which carries the duration
        let video = self.get_youtube_video(&inserted.id).await?;
        convert::to_generic_video(&video, YOUTUBE_WATCH_PREFIX)
    }

    async fn retrieve_video(&self, id: &str) -> AppResult<Video> {
        let video = self.get_youtube_video(id).await?;
        convert::to_generic_video(&video, YOUTUBE_WATCH_PREFIX)
    }

    #[tracing::instrument(skip(self, replacement))]
    async fn update_video(&self, id: &str, replacement: &Video) -> AppResult<Video> {
        let mut current = self.get_youtube_video(id).await?;
        let file_details = current.file_details.clone();

        convert::patch_video(&mut current, replacement)?;

        let request = self
            .http_client
            .put(self.api_url("videos"))
            .query(&[("part", VIDEO_UPDATE_PARTS)])
            .json(&current);

        let mut updated: YoutubeVideo = self.execute_json(request).await?;
        // fileDetails cannot be requested on update; the duration must not change
        if updated.file_details.is_none() {
            updated.file_details = file_details;
        }

        convert::to_generic_video(&updated, YOUTUBE_WATCH_PREFIX)
    }

    async fn delete_video(&self, id: &str) -> AppResult<()> {
        let request = self
            .http_client
            .delete(self.api_url("videos"))
            .query(&[("id", id)]);

        self.execute(request).await?;
        tracing::info!(video_id = %id, "Video deleted from YouTube");
        Ok(())
    }

    async fn create_playlist(&self, metadata: &ItemMetadata) -> AppResult<Playlist> {
        let request = self
            .http_client
            .post(self.api_url("playlists"))
            .query(&[("part", PLAYLIST_PARTS)])
            .json(&convert::new_playlist(metadata));

        let playlist: YoutubePlaylist = self.execute_json(request).await?;
        convert::to_generic_playlist(&playlist)
    }

    async fn retrieve_playlist(&self, id: &str) -> AppResult<Playlist> {
        let playlist = self.get_youtube_playlist(id).await?;
        convert::to_generic_playlist(&playlist)
    }

    #[tracing::instrument(skip(self, replacement))]
    async fn update_playlist(&self, id: &str, replacement: &Playlist) -> AppResult<Playlist> {
        let mut current = self.get_youtube_playlist(id).await?;

        convert::patch_playlist(&mut current, replacement)?;

        let request = self
            .http_client
            .put(self.api_url("playlists"))
            .query(&[("part", PLAYLIST_PARTS)])
            .json(&current);

        let updated: YoutubePlaylist = self.execute_json(request).await?;
        convert::to_generic_playlist(&updated)
    }

    async fn delete_playlist(&self, id: &str) -> AppResult<()> {
        let request = self
            .http_client
            .delete(self.api_url("playlists"))
            .query(&[("id", id)]);

        self.execute(request).await?;
        Ok(())
    }

    async fn add_video_to_playlist(&self, video_id: &str, playlist_id: &str) -> AppResult<()> {
        let item = PlaylistItem {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        let request = self
            .http_client
            .post(self.api_url("playlistItems"))
            .query(&[("part", "snippet")])
            .json(&item);

        self.execute(request).await?;
        Ok(())
    }

    async fn set_thumbnail(&self, video_id: &str, content: Bytes) -> AppResult<()> {
        let request = self
            .http_client
            .post(self.upload_url("thumbnails/set"))
            .query(&[("videoId", video_id), ("uploadType", "media")])
            .header(CONTENT_TYPE, image_content_type(&content))
            .body(content);

        self.execute(request).await?;
        Ok(())
    }

    fn watch_prefix(&self) -> &str {
        YOUTUBE_WATCH_PREFIX
    }
}
