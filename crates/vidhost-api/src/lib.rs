//! Vidhost API Library
//!
//! This crate provides the HTTP handlers and application setup around the
//! upload orchestration service.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{HttpAppError, ValidatedJson};
pub use state::AppState;
