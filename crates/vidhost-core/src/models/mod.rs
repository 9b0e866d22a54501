//! Data models shared between the host adapters, the orchestrator and the API

mod item;
mod progress;

pub use item::*;
pub use progress::*;
