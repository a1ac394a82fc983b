//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::access_key::AccessKeyService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub access_key_service: Arc<AccessKeyService>,
}

impl AppState {
    pub fn new(access_key_service: Arc<AccessKeyService>) -> Self {
        Self { access_key_service }
    }
}
