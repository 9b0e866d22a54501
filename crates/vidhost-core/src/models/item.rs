use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Maximum description size in bytes (not characters)
pub const MAX_DESCRIPTION_BYTES: usize = 1000;

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: u64 = 100;

/// Visibility of an item on the hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Unlisted,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Unlisted => "unlisted",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "unlisted" => Ok(Visibility::Unlisted),
            _ => Err(anyhow::anyhow!("Invalid visibility: {}", s)),
        }
    }
}

/// All metadata required to create an item on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ItemMetadata {
    /// Title of the item. The character limit is the strictest among supported hosts.
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    /// Short text describing the content of the item, limited in bytes
    #[serde(default)]
    #[validate(custom(function = "validate_description_bytes"))]
    pub description: String,
    pub visibility: Visibility,
}

fn validate_description_bytes(description: &str) -> Result<(), ValidationError> {
    if description.len() > MAX_DESCRIPTION_BYTES {
        let mut err = ValidationError::new("description_too_long");
        err.message = Some(
            format!("Description must be at most {} bytes", MAX_DESCRIPTION_BYTES).into(),
        );
        return Err(err);
    }
    Ok(())
}

impl ItemMetadata {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            visibility,
        }
    }
}

/// A video hosted on a video hosting platform
///
/// `id`, `created_at` and `duration_seconds` are read-only once the video exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Duration in whole seconds
    #[serde(default)]
    pub duration_seconds: u64,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail_url: String,
    /// URL prefix in which the id can be plugged to watch the video
    #[serde(default)]
    pub watch_prefix: String,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("{}{}", self.watch_prefix, self.id)
    }
}

/// A collection of videos hosted on a video hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub item_count: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail_url: String,
}
