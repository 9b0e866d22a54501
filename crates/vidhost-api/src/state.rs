//! Application state shared by the handlers

use std::sync::Arc;
use vidhost_hosting::VideoHost;
use vidhost_service::VideoStoreService;

#[derive(Clone)]
pub struct AppState {
    pub service: VideoStoreService,
}

impl AppState {
    pub fn new(service: VideoStoreService) -> Self {
        Self { service }
    }

    pub fn host(&self) -> Arc<dyn VideoHost> {
        self.service.host()
    }
}
