//! YouTube Data API v3 host
//!
//! Talks to the REST API directly with `reqwest`: OAuth2 refresh-token
//! authentication, multipart media uploads with progress reporting, and
//! conversion from and to the generic model.

mod auth;
mod client;
mod convert;
mod types;

pub use auth::YoutubeCredentials;
pub use client::{YoutubeHost, YoutubeOptions};

/// Prefix in which a video id can be plugged to watch it
pub const YOUTUBE_WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// "Entertainment"
pub const DEFAULT_CATEGORY_ID: &str = "24";

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/youtube/v3";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
