//! OAuth2 refresh-token flow for the YouTube Data API

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::types::{OAuthErrorResponse, OAuthTokenResponse};
use crate::error::ProviderError;

/// Tokens are refreshed this long before they actually expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// All information required to authenticate to the YouTube Data API v3
#[derive(Clone)]
pub struct YoutubeCredentials {
    /// Client ID of a Google Cloud project
    pub client_id: String,
    pub client_secret: String,
    /// Long-lived refresh token obtained through the OAuth consent flow
    pub refresh_token: String,
}

impl std::fmt::Debug for YoutubeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Exchanges the refresh token for access tokens and caches them until
/// shortly before they expire
pub(crate) struct TokenSource {
    credentials: YoutubeCredentials,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(credentials: YoutubeCredentials, token_url: String) -> Self {
        Self {
            credentials,
            token_url,
            cached: Mutex::new(None),
        }
    }

    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String, ProviderError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let response = self.refresh(client).await?;
        let lifetime = Duration::from_secs(response.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));
        let refresh_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);

        tracing::debug!(expires_in_secs = lifetime.as_secs(), "Refreshed YouTube access token");

        *cached = Some(CachedToken {
            access_token: response.access_token.clone(),
            refresh_at,
        });
        Ok(response.access_token)
    }

    async fn refresh(&self, client: &reqwest::Client) -> Result<OAuthTokenResponse, ProviderError> {
        let response = client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OAuthErrorResponse>(&text)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                })
                .unwrap_or(text);

            // A token endpoint status says nothing about the API request itself
            tracing::error!(status = status.as_u16(), error = %message, "YouTube token refresh failed");
            return Err(ProviderError::Auth(message));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
