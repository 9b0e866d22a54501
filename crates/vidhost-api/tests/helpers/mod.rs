//! Test helpers: build the router around in-memory storage and host fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vidhost_api::setup::routes::setup_routes;
use vidhost_api::AppState;
use vidhost_core::{
    AppError, AppResult, ItemMetadata, Playlist, RequestError, StorageBackend, Video,
};
use vidhost_hosting::{ProgressFn, VideoHost};
use vidhost_service::{VideoStoreService, VideoStoreServiceOptions};
use vidhost_storage::{StorageBuffer, StorageError, StorageResult};

pub const WATCH_PREFIX: &str = "https://videos.test/watch?v=";

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn put(&self, key: &str, content: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(content));
    }
}

#[async_trait]
impl StorageBuffer for MemoryStorage {
    async fn buffer(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Host keeping videos and playlists in memory, with the same
/// read-only attribute rules as a real provider
#[derive(Default)]
pub struct MemoryHost {
    videos: Mutex<HashMap<String, Video>>,
    playlists: Mutex<HashMap<String, (Playlist, Vec<String>)>>,
    thumbnails: Mutex<HashMap<String, Bytes>>,
}

fn created_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

impl MemoryHost {
    pub fn insert_video(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id.clone(), video);
    }

    pub fn video(&self, id: &str) -> Option<Video> {
        self.videos.lock().unwrap().get(id).cloned()
    }

    pub fn thumbnail(&self, id: &str) -> Option<Bytes> {
        self.thumbnails.lock().unwrap().get(id).cloned()
    }

    pub fn playlist_items(&self, id: &str) -> Vec<String> {
        self.playlists
            .lock()
            .unwrap()
            .get(id)
            .map(|(_, items)| items.clone())
            .unwrap_or_default()
    }
}

fn not_found(kind: &str, id: &str) -> AppError {
    RequestError::not_found(format!("{kind} {id} not found")).into()
}

#[async_trait]
impl VideoHost for MemoryHost {
    async fn create_video(
        &self,
        metadata: &ItemMetadata,
        content: Bytes,
        _on_progress: Option<ProgressFn>,
    ) -> AppResult<Video> {
        let mut videos = self.videos.lock().unwrap();
        let video = Video {
            id: format!("v{}", videos.len() + 1),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            created_at: created_at(),
            duration_seconds: content.len() as u64,
            visibility: metadata.visibility,
            thumbnail_url: String::new(),
            watch_prefix: WATCH_PREFIX.to_string(),
        };
        videos.insert(video.id.clone(), video.clone());
        Ok(video)
    }

    async fn retrieve_video(&self, id: &str) -> AppResult<Video> {
        self.video(id).ok_or_else(|| not_found("video", id))
    }

    async fn update_video(&self, id: &str, replacement: &Video) -> AppResult<Video> {
        let mut videos = self.videos.lock().unwrap();
        let current = videos.get_mut(id).ok_or_else(|| not_found("video", id))?;
        if replacement.id != current.id || replacement.created_at != current.created_at {
            return Err(AppError::validation("Attempted to change a read-only attribute"));
        }
        current.title = replacement.title.clone();
        current.description = replacement.description.clone();
        current.visibility = replacement.visibility;
        Ok(current.clone())
    }

    async fn delete_video(&self, id: &str) -> AppResult<()> {
        self.videos
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("video", id))
    }

    async fn create_playlist(&self, metadata: &ItemMetadata) -> AppResult<Playlist> {
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = Playlist {
            id: format!("p{}", playlists.len() + 1),
            item_count: 0,
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            created_at: created_at(),
            visibility: metadata.visibility,
            thumbnail_url: String::new(),
        };
        playlists.insert(playlist.id.clone(), (playlist.clone(), Vec::new()));
        Ok(playlist)
    }

    async fn retrieve_playlist(&self, id: &str) -> AppResult<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .get(id)
            .map(|(playlist, items)| Playlist {
                item_count: items.len() as u64,
                ..playlist.clone()
            })
            .ok_or_else(|| not_found("playlist", id))
    }

    async fn update_playlist(&self, id: &str, replacement: &Playlist) -> AppResult<Playlist> {
        {
            let mut playlists = self.playlists.lock().unwrap();
            let (current, _) = playlists
                .get_mut(id)
                .ok_or_else(|| not_found("playlist", id))?;
            if replacement.id != current.id || replacement.created_at != current.created_at {
                return Err(AppError::validation("Attempted to change a read-only attribute"));
            }
            current.title = replacement.title.clone();
            current.description = replacement.description.clone();
            current.visibility = replacement.visibility;
        }
        self.retrieve_playlist(id).await
    }

    async fn delete_playlist(&self, id: &str) -> AppResult<()> {
        self.playlists
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("playlist", id))
    }

    async fn add_video_to_playlist(&self, video_id: &str, playlist_id: &str) -> AppResult<()> {
        if self.video(video_id).is_none() {
            return Err(not_found("video", video_id));
        }
        let mut playlists = self.playlists.lock().unwrap();
        let (_, items) = playlists
            .get_mut(playlist_id)
            .ok_or_else(|| not_found("playlist", playlist_id))?;
        items.push(video_id.to_string());
        Ok(())
    }

    async fn set_thumbnail(&self, video_id: &str, content: Bytes) -> AppResult<()> {
        if self.video(video_id).is_none() {
            return Err(not_found("video", video_id));
        }
        self.thumbnails
            .lock()
            .unwrap()
            .insert(video_id.to_string(), content);
        Ok(())
    }

    fn watch_prefix(&self) -> &str {
        WATCH_PREFIX
    }
}

/// Test application: server plus handles on the fakes behind it
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MemoryStorage>,
    pub host: Arc<MemoryHost>,
}

pub fn setup_test_app() -> TestApp {
    let storage = Arc::new(MemoryStorage::default());
    let host = Arc::new(MemoryHost::default());

    let service = VideoStoreService::new(
        storage.clone(),
        None,
        host.clone(),
        VideoStoreServiceOptions {
            storage_max_retries: 0,
            progress_interval: Duration::from_millis(10),
        },
    );

    let router = setup_routes(Arc::new(AppState::new(service)));
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        storage,
        host,
    }
}
