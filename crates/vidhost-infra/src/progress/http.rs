use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use std::time::Duration;
use vidhost_core::UploadInfos;

use super::{ProgressPublisher, PublishError};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Configuration for the HTTP pub/sub publisher
#[derive(Clone, Debug)]
pub struct HttpPubSubConfig {
    /// Base URL of the pub/sub sidecar, e.g. `http://localhost:3500`
    pub base_url: String,
    pub pubsub_name: String,
    pub topic: String,
    pub signing_secret: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for HttpPubSubConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3500".to_string(),
            pubsub_name: String::new(),
            topic: "upload-state".to_string(),
            signing_secret: None,
            timeout_seconds: 10,
        }
    }
}

/// Publishes progress events to a pub/sub sidecar over HTTP
///
/// Events are POSTed as JSON to `{base_url}/v1.0/publish/{pubsub_name}/{topic}`.
/// When a signing secret is configured the body is signed with HMAC-SHA256 and
/// the hex digest is sent as `X-Signature: v1=<digest>`.
#[derive(Clone)]
pub struct HttpPubSubPublisher {
    http_client: Client,
    config: HttpPubSubConfig,
}

impl HttpPubSubPublisher {
    pub fn new(config: HttpPubSubConfig) -> Result<Self, PublishError> {
        if config.pubsub_name.is_empty() {
            return Err(PublishError::Config("pub/sub name is empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| PublishError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn publish_url(&self) -> String {
        format!(
            "{}/v1.0/publish/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.pubsub_name,
            self.config.topic
        )
    }

    /// Sign a payload with HMAC-SHA256
    pub fn sign_payload(body: &str, secret: &str) -> Result<String, PublishError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| PublishError::Signing(e.to_string()))?;

        mac.update(body.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl ProgressPublisher for HttpPubSubPublisher {
    #[tracing::instrument(skip(self, infos), fields(job_id = %infos.job_id))]
    async fn publish(&self, infos: &UploadInfos) -> Result<(), PublishError> {
        let body = serde_json::to_string(infos)?;

        let mut request = self
            .http_client
            .post(self.publish_url())
            .header("Content-Type", "application/json");

        if let Some(secret) = &self.config.signing_secret {
            let signature = Self::sign_payload(&body, secret)?;
            request = request.header(SIGNATURE_HEADER, format!("v1={}", signature));
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Failed to read response body"));

        Err(PublishError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
