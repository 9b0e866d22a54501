use serde::{Deserialize, Serialize};

/// Lifecycle state of an upload job as seen by progress subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadState {
    InProgress,
    Done,
    Error,
}

/// Payload of a progress event, discriminated by the upload state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressEvent {
    #[serde(rename_all = "camelCase")]
    InProgress { current: u64, total: u64 },
    #[serde(rename_all = "camelCase")]
    Done {
        id: String,
        watch_prefix: String,
        duration_seconds: u64,
    },
    Error { message: String },
}

impl ProgressEvent {
    pub fn state(&self) -> UploadState {
        match self {
            ProgressEvent::InProgress { .. } => UploadState::InProgress,
            ProgressEvent::Done { .. } => UploadState::Done,
            ProgressEvent::Error { .. } => UploadState::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::InProgress { .. })
    }
}

/// Progress event as published on the pub/sub topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInfos {
    pub job_id: String,
    #[serde(flatten)]
    pub event: ProgressEvent,
}

impl UploadInfos {
    pub fn new(job_id: impl Into<String>, event: ProgressEvent) -> Self {
        Self {
            job_id: job_id.into(),
            event,
        }
    }

    pub fn in_progress(job_id: impl Into<String>, current: u64, total: u64) -> Self {
        Self::new(job_id, ProgressEvent::InProgress { current, total })
    }

    pub fn error(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            job_id,
            ProgressEvent::Error {
                message: message.into(),
            },
        )
    }

    pub fn state(&self) -> UploadState {
        self.event.state()
    }
}
