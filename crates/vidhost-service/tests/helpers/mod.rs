//! Test helpers: in-memory storage, publisher and host fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use vidhost_core::{
    AppError, AppResult, ItemMetadata, Playlist, ProgressEvent, RequestError, StorageBackend,
    UploadInfos, Video, Visibility,
};
use vidhost_hosting::{ProgressFn, VideoHost};
use vidhost_infra::{ProgressPublisher, PublishError};
use vidhost_service::{VideoStoreService, VideoStoreServiceOptions};
use vidhost_storage::{StorageBuffer, StorageError, StorageResult};

pub const WATCH_PREFIX: &str = "https://videos.test/watch?v=";

/// Storage that fails the first `failures` reads, then returns `content`
pub struct FlakyStorage {
    failures: u32,
    content: Bytes,
    calls: Mutex<Vec<Instant>>,
}

impl FlakyStorage {
    pub fn new(failures: u32, content: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            failures,
            content: Bytes::from_static(content),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::new(u32::MAX, b"")
    }

    pub fn attempts(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive reads
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap()
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }
}

#[async_trait]
impl StorageBuffer for FlakyStorage {
    async fn buffer(&self, storage_key: &str) -> StorageResult<Bytes> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Instant::now());
        if (calls.len() as u64) <= self.failures as u64 {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(self.content.clone())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Publisher recording every event, optionally failing every call
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<UploadInfos>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn events(&self) -> Vec<UploadInfos> {
        self.events.lock().unwrap().clone()
    }

    pub fn terminal_events(&self) -> Vec<UploadInfos> {
        self.events()
            .into_iter()
            .filter(|e| e.event.is_terminal())
            .collect()
    }
}

#[async_trait]
impl ProgressPublisher for RecordingPublisher {
    async fn publish(&self, infos: &UploadInfos) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(infos.clone());
        if self.fail {
            return Err(PublishError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

/// One step of a scripted upload
#[derive(Debug, Clone)]
pub enum Step {
    Progress(u64, u64),
    Sleep(Duration),
}

/// Host whose `create_video` plays a script of progress calls and sleeps
pub struct FakeHost {
    script: Vec<Step>,
    outcome: Result<u64, RequestError>,
    hang: bool,
    create_calls: AtomicU32,
    received_callback: Mutex<Option<bool>>,
    thumbnails: Mutex<Vec<(String, Bytes)>>,
}

impl FakeHost {
    /// Upload succeeds with a video `v1` lasting `duration_seconds`
    pub fn succeeding(duration_seconds: u64, script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self::with_outcome(Ok(duration_seconds), script))
    }

    pub fn failing(error: RequestError, script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self::with_outcome(Err(error), script))
    }

    /// Upload never completes
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Self::with_outcome(Ok(0), Vec::new())
        })
    }

    fn with_outcome(outcome: Result<u64, RequestError>, script: Vec<Step>) -> Self {
        Self {
            script,
            outcome,
            hang: false,
            create_calls: AtomicU32::new(0),
            received_callback: Mutex::new(None),
            thumbnails: Mutex::new(Vec::new()),
        }
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Whether the last `create_video` call was given a progress callback
    pub fn received_callback(&self) -> Option<bool> {
        *self.received_callback.lock().unwrap()
    }

    pub fn thumbnails(&self) -> Vec<(String, Bytes)> {
        self.thumbnails.lock().unwrap().clone()
    }
}

fn video(id: &str, metadata: &ItemMetadata, duration_seconds: u64) -> Video {
    Video {
        id: id.to_string(),
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        created_at: chrono::Utc::now(),
        duration_seconds,
        visibility: metadata.visibility,
        thumbnail_url: String::new(),
        watch_prefix: WATCH_PREFIX.to_string(),
    }
}

#[async_trait]
impl VideoHost for FakeHost {
    async fn create_video(
        &self,
        metadata: &ItemMetadata,
        _content: Bytes,
        on_progress: Option<ProgressFn>,
    ) -> AppResult<Video> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.received_callback.lock().unwrap() = Some(on_progress.is_some());

        if self.hang {
            std::future::pending::<()>().await;
        }

        for step in &self.script {
            match step {
                Step::Progress(current, total) => {
                    if let Some(callback) = &on_progress {
                        callback(*current, *total);
                    }
                }
                Step::Sleep(duration) => tokio::time::sleep(*duration).await,
            }
        }

        match &self.outcome {
            Ok(duration_seconds) => Ok(video("v1", metadata, *duration_seconds)),
            Err(e) => Err(AppError::Request(e.clone())),
        }
    }

    async fn retrieve_video(&self, id: &str) -> AppResult<Video> {
        Err(RequestError::not_found(format!("video {id} not found")).into())
    }

    async fn update_video(&self, id: &str, _replacement: &Video) -> AppResult<Video> {
        self.retrieve_video(id).await
    }

    async fn delete_video(&self, _id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn create_playlist(&self, _metadata: &ItemMetadata) -> AppResult<Playlist> {
        Err(AppError::Internal("not scripted".to_string()))
    }

    async fn retrieve_playlist(&self, id: &str) -> AppResult<Playlist> {
        Err(RequestError::not_found(format!("playlist {id} not found")).into())
    }

    async fn update_playlist(&self, id: &str, _replacement: &Playlist) -> AppResult<Playlist> {
        self.retrieve_playlist(id).await
    }

    async fn delete_playlist(&self, _id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn add_video_to_playlist(&self, _video_id: &str, _playlist_id: &str) -> AppResult<()> {
        Ok(())
    }

    async fn set_thumbnail(&self, video_id: &str, content: Bytes) -> AppResult<()> {
        self.thumbnails
            .lock()
            .unwrap()
            .push((video_id.to_string(), content));
        Ok(())
    }

    fn watch_prefix(&self) -> &str {
        WATCH_PREFIX
    }
}

pub fn metadata() -> ItemMetadata {
    ItemMetadata::new("t", "d", Visibility::Unlisted)
}

pub fn service(
    storage: Arc<FlakyStorage>,
    publisher: Option<Arc<RecordingPublisher>>,
    host: Arc<FakeHost>,
    storage_max_retries: u32,
) -> VideoStoreService {
    VideoStoreService::new(
        storage,
        publisher.map(|p| p as Arc<dyn ProgressPublisher>),
        host,
        VideoStoreServiceOptions {
            storage_max_retries,
            progress_interval: Duration::from_secs(1),
        },
    )
}

pub fn in_progress(current: u64, total: u64) -> ProgressEvent {
    ProgressEvent::InProgress { current, total }
}
