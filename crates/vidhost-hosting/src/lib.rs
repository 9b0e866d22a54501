//! Vidhost Hosting Library
//!
//! Generic video hosting capability ([`VideoHost`]) and its provider
//! implementations. Exactly one provider is active per process, chosen by
//! [`create_video_host`] from the configured [`HostBackend`](vidhost_core::HostBackend).

pub mod duration;
pub mod error;
pub mod factory;
pub mod traits;
#[cfg(feature = "host-youtube")]
pub mod youtube;

pub use factory::create_video_host;
pub use traits::{ProgressFn, VideoHost};
#[cfg(feature = "host-youtube")]
pub use youtube::{YoutubeCredentials, YoutubeHost, YoutubeOptions, YOUTUBE_WATCH_PREFIX};
