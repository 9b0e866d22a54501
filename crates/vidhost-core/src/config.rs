//! Configuration module
//!
//! Settings are read from the process environment once at startup. Values that
//! fail to parse fall back to their defaults; missing credentials are reported by
//! [`Config::validate`].

use std::env;
use std::time::Duration;

use crate::backends::{HostBackend, StorageBackend};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STORAGE_MAX_RETRIES: u32 = 10;
const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1000;
const DEFAULT_CATEGORY_ID: &str = "24";
const DEFAULT_PUBSUB_BASE_URL: &str = "http://localhost:3500";
const DEFAULT_PUBSUB_TOPIC: &str = "upload-state";

/// Object storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_path: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub s3_endpoint: Option<String>,
    pub max_retries: u32,
}

/// YouTube Data API credentials and endpoints
#[derive(Clone, Debug)]
pub struct YoutubeConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub category_id: String,
    /// Overrides the API base URL (tests, proxies)
    pub api_base_url: Option<String>,
    pub upload_base_url: Option<String>,
    pub token_url: Option<String>,
}

/// Progress relay settings
#[derive(Clone, Debug)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub pubsub_base_url: String,
    /// Pub/sub component name. Progress is not relayed when this is unset.
    pub pubsub_name: Option<String>,
    pub topic: String,
    pub signing_secret: Option<String>,
    pub interval: Duration,
}

impl ProgressConfig {
    /// Whether progress events should actually be published
    pub fn is_active(&self) -> bool {
        self.enabled && self.pubsub_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub storage: StorageConfig,
    pub video_host: HostBackend,
    pub youtube: YoutubeConfig,
    pub progress: ProgressConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let video_host = match var("VIDEO_HOST") {
            Some(s) => s.parse::<HostBackend>()?,
            None => HostBackend::Youtube,
        };

        let storage = StorageConfig {
            backend,
            local_path: var("LOCAL_STORAGE_PATH").unwrap_or_else(|| "./data".to_string()),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            max_retries: var("STORAGE_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_STORAGE_MAX_RETRIES),
        };

        let youtube = YoutubeConfig {
            client_id: var("YT_CLIENT_ID"),
            client_secret: var("YT_CLIENT_SECRET"),
            refresh_token: var("YT_REFRESH_TOKEN"),
            category_id: var("YT_CATEGORY_ID").unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
            api_base_url: var("YT_API_BASE_URL"),
            upload_base_url: var("YT_UPLOAD_BASE_URL"),
            token_url: var("YT_TOKEN_URL"),
        };

        let progress = ProgressConfig {
            enabled: var("PROGRESS_ENABLED")
                .map(|v| v.to_lowercase())
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            pubsub_base_url: var("PUBSUB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBSUB_BASE_URL.to_string()),
            pubsub_name: var("PUBSUB_NAME"),
            topic: var("PUBSUB_TOPIC_PROGRESS").unwrap_or_else(|| DEFAULT_PUBSUB_TOPIC.to_string()),
            signing_secret: var("PUBSUB_SIGNING_SECRET"),
            interval: Duration::from_millis(
                var("PROGRESS_INTERVAL_MS")
                    .and_then(|v| v.parse().ok())
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS),
            ),
        };

        Ok(Config {
            server_port: var("APP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment,
            storage,
            video_host,
            youtube,
            progress,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.backend == StorageBackend::S3 && self.storage.s3_bucket.is_none() {
            anyhow::bail!("S3_BUCKET is required when STORAGE_BACKEND=s3");
        }

        if self.video_host == HostBackend::Youtube {
            let missing: Vec<&str> = [
                ("YT_CLIENT_ID", &self.youtube.client_id),
                ("YT_CLIENT_SECRET", &self.youtube.client_secret),
                ("YT_REFRESH_TOKEN", &self.youtube.refresh_token),
            ]
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();

            if !missing.is_empty() {
                anyhow::bail!(
                    "Missing YouTube credentials: {}",
                    missing.join(", ")
                );
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
