/// Prefix of every versioned route
pub const API_PREFIX: &str = "/v1";

/// Request bodies are JSON documents; media never transits through the API
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;
